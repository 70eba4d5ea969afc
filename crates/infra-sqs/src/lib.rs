// Carrier Infrastructure - AWS SQS Adapter
// Implements: QueueClient

pub mod connection;
pub mod queue_client_impl;

pub use connection::{create_client, SqsConnectConfig};
pub use queue_client_impl::SqsQueueClient;
