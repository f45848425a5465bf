mod slack;
mod stdout;

use anyhow::Result;
use async_trait::async_trait;

pub use slack::SlackAlert;
pub use stdout::StdoutAlert;

/// Delivery seam for call notifications. The server only sees this
/// trait, so tests can substitute a recording handler and dry-run mode
/// can swap in the stdout sink.
#[async_trait]
pub trait AlertHandler: Send + Sync {
    /// Deliver one notification for an admitted call. Errors mean the
    /// notification was not delivered; nothing retries it.
    async fn send(
        &self,
        caller_id: &str,
        time_of_call: &str,
        target_name: &str,
        call_type: &str,
    ) -> Result<()>;

    /// Human-readable name for this handler.
    fn name(&self) -> &str;
}
