pub mod log;
pub mod recording;

pub use self::log::LogPublisher;
pub use recording::{PublishedMessage, RecordingPublisher};

use async_trait::async_trait;
use serde_json::Value;

/// Outbound side of the pipeline.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish a message.
    ///
    /// With `destinations` unset the message goes to the default next-stage
    /// subject; otherwise it is routed to the given subjects.
    async fn handle_response(
        &self,
        message: Value,
        destinations: Option<Vec<String>>,
    ) -> anyhow::Result<()>;
}
