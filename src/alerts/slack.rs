use super::AlertHandler;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// Outbound delivery deadline; a webhook that takes longer counts as
/// failed.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SlackAlert {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackAlert {
    pub fn new(webhook_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            webhook_url,
            client,
        })
    }
}

/// Block Kit payload for one call alert.
fn build_payload(caller_id: &str, time_of_call: &str, target_name: &str, call_type: &str) -> Value {
    json!({
        "blocks": [
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!(
                        "🌙 *{}*\n\n• *Caller ID:* `{}`\n• *Time:* `{}`\n• *Target:* `{}`\n• *Status:* `Active Monitoring`",
                        call_type, caller_id, time_of_call, target_name
                    )
                }
            }
        ]
    })
}

#[async_trait]
impl AlertHandler for SlackAlert {
    async fn send(
        &self,
        caller_id: &str,
        time_of_call: &str,
        target_name: &str,
        call_type: &str,
    ) -> Result<()> {
        let payload = build_payload(caller_id, time_of_call, target_name, call_type);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .context("Slack webhook request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Slack webhook returned status {}", response.status());
        }

        tracing::info!(
            "Sent Slack notification for {} from caller {}",
            call_type.to_lowercase(),
            caller_id
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "slack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_single_section_block() {
        let payload = build_payload("+15551234567", "2024-01-01T20:00:00", "target-1", "After Hours Call");

        let blocks = payload["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0]["type"], "section");
        assert_eq!(blocks[0]["text"]["type"], "mrkdwn");
    }

    #[test]
    fn test_payload_text_contains_call_details() {
        let payload = build_payload("+15551234567", "2024-01-01T20:00:00", "target-1", "After Hours Call");
        let text = payload["blocks"][0]["text"]["text"].as_str().unwrap();

        assert!(text.starts_with("🌙 *After Hours Call*"));
        assert!(text.contains("*Caller ID:* `+15551234567`"));
        assert!(text.contains("*Time:* `2024-01-01T20:00:00`"));
        assert!(text.contains("*Target:* `target-1`"));
        assert!(text.contains("*Status:* `Active Monitoring`"));
    }

    #[test]
    fn test_handler_name() {
        let alert = SlackAlert::new("https://hooks.slack.com/services/T/B/X".to_string()).unwrap();
        assert_eq!(alert.name(), "slack");
    }
}
