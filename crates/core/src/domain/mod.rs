// Domain Layer - Pure data model, no behavior beyond construction

pub mod message;

// Re-exports
pub use message::{Batch, Message};
