// Message Domain Model

use serde::{Deserialize, Serialize};

/// A message received from the queue.
///
/// The payload is opaque to the worker - parsing and validation belong
/// entirely to the handler. The receipt token is the handle required to
/// delete the message after processing; it is distinct from the message
/// content and never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Queue-assigned identifier, used only for logging
    pub message_id: String,
    /// Opaque payload
    pub body: String,
    /// Opaque handle required for deletion
    pub receipt_token: String,
}

impl Message {
    pub fn new(
        message_id: impl Into<String>,
        body: impl Into<String>,
        receipt_token: impl Into<String>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            body: body.into(),
            receipt_token: receipt_token.into(),
        }
    }
}

/// An ordered sequence of messages returned by one receive call.
/// Length is between 0 and the configured batch size.
pub type Batch = Vec<Message>;
