// Message Handler Port
// User-supplied capability that processes one message's payload

use crate::domain::Message;
use async_trait::async_trait;
use std::future::Future;
use thiserror::Error;

/// Handler errors
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The message is structurally invalid and can never be processed
    /// correctly, no matter how often the queue redelivers it. The worker
    /// logs it and acknowledges the message anyway.
    #[error("invalid event [{event}]: {reason}")]
    InvalidEvent { event: String, reason: String },

    /// Transient or unknown failure. The message is left unacknowledged
    /// so the queue redelivers it.
    #[error("handler failed: {0}")]
    Failed(String),
}

impl HandlerError {
    pub fn invalid_event(event: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEvent {
            event: event.into(),
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// True for failures that retry can never fix
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::InvalidEvent { .. })
    }
}

/// Message Handler trait
///
/// Delivery is at-least-once: the queue may redeliver a message that was
/// already processed (e.g. after a failed delete), so implementations must
/// be idempotent or tolerate reprocessing.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Process one message
    ///
    /// # Errors
    /// - HandlerError::InvalidEvent for permanently unprocessable payloads
    /// - HandlerError::Failed for anything retryable via redelivery
    async fn handle(&self, message: &Message) -> Result<(), HandlerError>;
}

/// Adapter that lets an async closure act as a MessageHandler
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> MessageHandler for FnHandler<F>
where
    F: Fn(Message) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HandlerError>> + Send,
{
    async fn handle(&self, message: &Message) -> Result<(), HandlerError> {
        (self.f)(message.clone()).await
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Mock handler behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed
        Success,
        /// Always report an invalid event
        InvalidEvent(String),
        /// Always fail with message
        Fail(String),
        /// Panic with message (for panic isolation testing)
        Panic(String),
    }

    /// Mock Message Handler for testing
    pub struct MockMessageHandler {
        behavior: MockBehavior,
        handled: Mutex<Vec<Message>>,
    }

    impl MockMessageHandler {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                handled: Mutex::new(Vec::new()),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_invalid_event(reason: impl Into<String>) -> Self {
            Self::new(MockBehavior::InvalidEvent(reason.into()))
        }

        pub fn new_fail(reason: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(reason.into()))
        }

        pub fn new_panic_inducing(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Panic(message.into()))
        }

        /// Messages seen by handle(), in invocation order
        pub fn handled(&self) -> Vec<Message> {
            self.handled.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.handled.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl MessageHandler for MockMessageHandler {
        async fn handle(&self, message: &Message) -> Result<(), HandlerError> {
            self.handled.lock().unwrap().push(message.clone());

            match &self.behavior {
                MockBehavior::Success => Ok(()),
                MockBehavior::InvalidEvent(reason) => {
                    Err(HandlerError::invalid_event(&message.message_id, reason))
                }
                MockBehavior::Fail(reason) => Err(HandlerError::failed(reason)),
                MockBehavior::Panic(msg) => {
                    panic!("{}", msg); // Actually panic for panic isolation testing
                }
            }
        }
    }
}
