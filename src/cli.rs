use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "callwatcher",
    version,
    about = "A tiny after-hours call monitor that turns Ringba webhooks into Slack alerts",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the webhook server
    Serve {
        /// Bind host (overrides the HOST environment variable)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides the PORT environment variable)
        #[arg(long)]
        port: Option<u16>,

        /// Print alerts to stdout instead of delivering them to Slack
        #[arg(long)]
        dry_run: bool,
    },

    /// Fire sample webhook payloads at a running instance
    SendTest {
        /// Base URL of the running server
        #[arg(long, default_value = "http://localhost:5000")]
        url: String,
    },
}
