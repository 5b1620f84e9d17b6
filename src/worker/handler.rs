//! Pluggable task execution seam.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// Executes the task body for one delivered message.
///
/// Implementations must tolerate seeing the same payload more than once:
/// delivery is at-least-once, and a crash between execution and
/// acknowledgment redelivers the message.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    /// Process one task payload. An Err follows the worker's
    /// requeue/dead-letter policy.
    async fn handle(&self, task: &serde_json::Value) -> Result<()>;
}

/// Reference handler: a fixed-duration simulated workload.
pub struct SimulatedHandler {
    pub duration: Duration,
}

impl Default for SimulatedHandler {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(1),
        }
    }
}

#[async_trait]
impl TaskHandler for SimulatedHandler {
    async fn handle(&self, task: &serde_json::Value) -> Result<()> {
        info!(%task, "processing task");
        tokio::time::sleep(self.duration).await;
        Ok(())
    }
}
