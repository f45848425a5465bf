use super::AlertHandler;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

/// Dry-run sink: prints the alert instead of delivering it.
pub struct StdoutAlert;

#[async_trait]
impl AlertHandler for StdoutAlert {
    async fn send(
        &self,
        caller_id: &str,
        time_of_call: &str,
        target_name: &str,
        call_type: &str,
    ) -> Result<()> {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        println!(
            "[{}] {} | caller: {} | time: {} | target: {}",
            timestamp, call_type, caller_id, time_of_call, target_name
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}
