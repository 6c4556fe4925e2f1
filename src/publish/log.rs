use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::Publisher;

/// Publisher that emits outbound messages as log events.
///
/// Used when the service runs standalone without a message bus.
#[derive(Debug, Clone)]
pub struct LogPublisher {
    default_subject: String,
}

impl LogPublisher {
    pub fn new(default_subject: impl Into<String>) -> Self {
        LogPublisher {
            default_subject: default_subject.into(),
        }
    }

    pub fn default_subject(&self) -> &str {
        &self.default_subject
    }
}

#[async_trait]
impl Publisher for LogPublisher {
    async fn handle_response(
        &self,
        message: Value,
        destinations: Option<Vec<String>>,
    ) -> anyhow::Result<()> {
        let subjects = destinations.unwrap_or_else(|| vec![self.default_subject.clone()]);
        let payload = serde_json::to_string(&message)?;

        for subject in &subjects {
            info!(subject = %subject, payload = %payload, "Published message");
        }

        Ok(())
    }
}
