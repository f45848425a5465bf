use anyhow::{bail, Context, Result};
use chrono_tz::Tz;

/// Start of the monitored window, local wall-clock hour (6pm).
pub const MONITORING_START_HOUR: u32 = 18;
/// End of the monitored window, local wall-clock hour (9am).
pub const MONITORING_END_HOUR: u32 = 9;
/// Timezone the call platform reports timestamps in.
pub const TIMEZONE: &str = "America/New_York";

const DEFAULT_SLACK_WEBHOOK_URL: &str = "https://hooks.slack.com/services/XXXX/YYYY/ZZZZ";

#[derive(Debug, Clone)]
pub struct Config {
    pub slack_webhook_url: String,
    pub host: String,
    pub port: u16,
    pub start_hour: u32,
    pub end_hour: u32,
    pub timezone: Tz,
}

impl Config {
    /// Build the runtime configuration from environment variables,
    /// falling back to the compiled-in defaults.
    pub fn from_env() -> Result<Self> {
        let slack_webhook_url = std::env::var("SLACK_WEBHOOK_URL")
            .unwrap_or_else(|_| DEFAULT_SLACK_WEBHOOK_URL.to_string());
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("PORT") {
            Ok(value) => value.parse::<u16>().context("Invalid PORT value")?,
            Err(_) => 5000,
        };
        let timezone: Tz = TIMEZONE
            .parse()
            .map_err(|_| anyhow::anyhow!("Unknown timezone: {}", TIMEZONE))?;

        let config = Self {
            slack_webhook_url,
            host,
            port,
            start_hour: MONITORING_START_HOUR,
            end_hour: MONITORING_END_HOUR,
            timezone,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn merge_with_cli(&mut self, host: Option<String>, port: Option<u16>) {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
    }

    /// The window membership formula only models a range that wraps
    /// midnight; a start hour at or before the end hour would make every
    /// hour of the day match, so it is rejected up front.
    pub fn validate(&self) -> Result<()> {
        if self.start_hour > 23 || self.end_hour > 23 {
            bail!(
                "Monitoring hours must be in 0-23, got {} - {}",
                self.start_hour,
                self.end_hour
            );
        }
        if self.start_hour <= self.end_hour {
            bail!(
                "Monitoring window must wrap midnight: start hour {} must be later than end hour {}",
                self.start_hour,
                self.end_hour
            );
        }
        Ok(())
    }

    pub fn monitoring_hours(&self) -> String {
        format!("{}:00 - {}:00", self.start_hour, self.end_hour)
    }
}
