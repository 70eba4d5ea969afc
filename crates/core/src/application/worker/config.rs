// Worker Configuration

use super::constants::{DEFAULT_MAX_MESSAGES, DEFAULT_WAIT_TIME_SECONDS};
use serde::{Deserialize, Serialize};

/// Worker configuration
///
/// `queue_url` is not user-supplied: it is populated exactly once, at
/// `Worker::new`, by resolving `queue_name` through the queue client, and
/// never mutated afterward.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Name of the queue to consume
    pub queue_name: String,
    /// Resolved queue URL (empty until construction resolves it)
    pub queue_url: String,
    /// Maximum messages per receive call; 0 means "use default" (10)
    pub max_messages: i32,
    /// Long-poll wait in seconds; 0 means "use default" (20)
    pub wait_time_seconds: i32,
}

impl WorkerConfig {
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: queue_name.into(),
            ..Self::default()
        }
    }

    /// Replace unset (zero) values with defaults
    pub(crate) fn populate_default_values(&mut self) {
        if self.max_messages == 0 {
            self.max_messages = DEFAULT_MAX_MESSAGES;
        }
        if self.wait_time_seconds == 0 {
            self.wait_time_seconds = DEFAULT_WAIT_TIME_SECONDS;
        }
    }
}
