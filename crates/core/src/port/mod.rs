// Port Layer - Interfaces for external dependencies

pub mod message_handler;
pub mod queue_client;

// Re-exports
pub use message_handler::{FnHandler, HandlerError, MessageHandler};
pub use queue_client::{QueueClient, TransportError};
