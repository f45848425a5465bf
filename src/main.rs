mod alerts;
mod cli;
mod config;
mod error;
mod event;
mod filter;
mod server;
mod window;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; DEBUG=true in the environment has the same
    // effect as --verbose.
    let debug_env = std::env::var("DEBUG")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let filter = if cli.verbose || debug_env {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            dry_run,
        } => {
            handle_serve(host, port, dry_run).await?;
        }
        Commands::SendTest { url } => {
            handle_send_test(url).await?;
        }
    }

    Ok(())
}

async fn handle_serve(host: Option<String>, port: Option<u16>, dry_run: bool) -> Result<()> {
    let mut config = Config::from_env()?;
    config.merge_with_cli(host, port);

    tracing::info!(
        "🌙 Starting Ringba After Hours Monitor on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        "Monitoring hours: {} {}",
        config.monitoring_hours(),
        config.timezone.name()
    );

    let alert: Arc<dyn alerts::AlertHandler> = if dry_run {
        tracing::warn!("Dry-run mode: alerts will be printed, not delivered");
        Arc::new(alerts::StdoutAlert)
    } else {
        Arc::new(alerts::SlackAlert::new(config.slack_webhook_url.clone())?)
    };
    tracing::debug!("Registered alert handler: {}", alert.name());

    let state = Arc::new(server::AppState::new(config, alert));
    server::serve(state).await
}

async fn handle_send_test(base_url: String) -> Result<()> {
    use chrono::Utc;
    use serde_json::{json, Value};

    let webhook_url = format!("{}/ringba-webhook", base_url.trim_end_matches('/'));
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("Failed to create HTTP client")?;

    let now = Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string();

    let scenarios: Vec<(&str, Option<Value>)> = vec![
        (
            "valid target",
            Some(json!({
                "targetName": "TA7a8e20272b90487c8d420370c8477992",
                "callerId": "TEST_CALLER_123",
                "timestamp": now,
                "duration": 120,
                "status": "completed"
            })),
        ),
        (
            "No value target (should be filtered)",
            Some(json!({
                "targetName": "No value",
                "callerId": "NO_VALUE_CALLER_456",
                "timestamp": now,
                "duration": 60,
                "status": "completed"
            })),
        ),
        (
            "empty target (should be filtered)",
            Some(json!({
                "targetName": "",
                "callerId": "EMPTY_TARGET_CALLER_789",
                "timestamp": now,
                "duration": 30,
                "status": "completed"
            })),
        ),
        (
            "missing timestamp",
            Some(json!({
                "targetName": "valid-target",
                "callerId": "NO_TIMESTAMP_CALLER"
            })),
        ),
        (
            "URL verification handshake",
            Some(json!({
                "type": "url_verification",
                "challenge": "test_challenge_12345"
            })),
        ),
        ("empty body", None),
    ];

    for (name, payload) in scenarios {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("Testing: {}", name);

        let request = client.post(&webhook_url);
        let request = match &payload {
            Some(body) => {
                println!("Payload: {}", serde_json::to_string_pretty(body)?);
                request.json(body)
            }
            None => request
                .header("content-type", "application/json")
                .body(""),
        };

        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {} failed", webhook_url))?;

        println!("Response status: {}", response.status());
        println!("Response body: {}", response.text().await?);
        println!();
    }

    Ok(())
}
