use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;

use super::Publisher;

/// A message captured by [`RecordingPublisher`].
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMessage {
    pub message: Value,
    pub destinations: Option<Vec<String>>,
}

impl PublishedMessage {
    /// Returns true if the message was routed to explicit subjects.
    pub fn is_routed(&self) -> bool {
        self.destinations.is_some()
    }
}

/// Publisher that records every call, for testing.
///
/// Failures can be queued; each queued failure rejects exactly one call,
/// in call order. Rejected calls are still recorded.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<PublishedMessage>>,
    failures: Mutex<VecDeque<String>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next publish call with `reason`.
    pub fn fail_next(&self, reason: impl Into<String>) {
        self.failures.lock().push_back(reason.into());
    }

    /// All recorded calls in call order.
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.published.lock().len()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn handle_response(
        &self,
        message: Value,
        destinations: Option<Vec<String>>,
    ) -> anyhow::Result<()> {
        self.published.lock().push(PublishedMessage {
            message,
            destinations,
        });

        if let Some(reason) = self.failures.lock().pop_front() {
            anyhow::bail!(reason);
        }

        Ok(())
    }
}
