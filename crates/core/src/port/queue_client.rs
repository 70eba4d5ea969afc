// Queue Client Port
// Abstraction over the remote queue transport (resolve / receive / delete)

use crate::domain::{Batch, Message};
use async_trait::async_trait;
use thiserror::Error;

/// Transport errors
///
/// Every variant is non-fatal to the worker: a failed resolve leaves the
/// queue URL empty, a failed receive skips one iteration, a failed delete
/// leaves the message for redelivery.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("queue url resolution failed: {0}")]
    Resolve(String),

    #[error("receive failed: {0}")]
    Receive(String),

    #[error("delete failed: {0}")]
    Delete(String),
}

/// Queue Client trait
///
/// Implementations:
/// - SqsQueueClient (infra-sqs): AWS SQS via aws-sdk-sqs
/// - mocks::MockQueueClient: scripted responses for tests
///
/// Calls are stateless; a single client is shared read-only across all
/// concurrent per-message tasks.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Resolve a queue name to the URL used by receive/delete
    ///
    /// # Errors
    /// - TransportError::Resolve if the queue cannot be looked up
    async fn resolve_queue_url(&self, queue_name: &str) -> Result<String, TransportError>;

    /// Receive up to `max_messages` messages, long-polling up to
    /// `wait_time_seconds` server-side when the queue is empty
    ///
    /// # Errors
    /// - TransportError::Receive on any transport failure
    async fn receive_messages(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait_time_seconds: i32,
    ) -> Result<Batch, TransportError>;

    /// Delete a message by its receipt token
    ///
    /// # Errors
    /// - TransportError::Delete on any transport failure
    async fn delete_message(
        &self,
        queue_url: &str,
        receipt_token: &str,
    ) -> Result<(), TransportError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Mock Queue Client with scripted receive responses
    ///
    /// Receive results are served in FIFO order; once the script is
    /// exhausted, every further receive returns an empty batch.
    pub struct MockQueueClient {
        queue_url: String,
        fail_resolve: bool,
        fail_deletes: bool,
        receive_script: Mutex<VecDeque<Result<Vec<Message>, TransportError>>>,
        resolve_calls: Mutex<Vec<String>>,
        receive_calls: Mutex<Vec<(String, i32, i32)>>,
        delete_calls: Mutex<Vec<(String, String)>>,
    }

    impl MockQueueClient {
        pub fn new(queue_url: impl Into<String>) -> Self {
            Self {
                queue_url: queue_url.into(),
                fail_resolve: false,
                fail_deletes: false,
                receive_script: Mutex::new(VecDeque::new()),
                resolve_calls: Mutex::new(Vec::new()),
                receive_calls: Mutex::new(Vec::new()),
                delete_calls: Mutex::new(Vec::new()),
            }
        }

        /// Make resolve_queue_url fail
        pub fn with_resolve_failure(mut self) -> Self {
            self.fail_resolve = true;
            self
        }

        /// Make every delete_message call fail
        pub fn with_failing_deletes(mut self) -> Self {
            self.fail_deletes = true;
            self
        }

        /// Script the next receive result
        pub fn push_receive(self, result: Result<Vec<Message>, TransportError>) -> Self {
            self.receive_script.lock().unwrap().push_back(result);
            self
        }

        /// Script the next receive to return a batch
        pub fn push_batch(self, batch: Vec<Message>) -> Self {
            self.push_receive(Ok(batch))
        }

        /// Queue names passed to resolve_queue_url
        pub fn resolve_calls(&self) -> Vec<String> {
            self.resolve_calls.lock().unwrap().clone()
        }

        /// (queue_url, max_messages, wait_time_seconds) per receive call
        pub fn receive_calls(&self) -> Vec<(String, i32, i32)> {
            self.receive_calls.lock().unwrap().clone()
        }

        pub fn receive_call_count(&self) -> usize {
            self.receive_calls.lock().unwrap().len()
        }

        /// (queue_url, receipt_token) per delete call
        pub fn delete_calls(&self) -> Vec<(String, String)> {
            self.delete_calls.lock().unwrap().clone()
        }

        /// Receipt tokens passed to delete_message, in call order
        pub fn deleted_tokens(&self) -> Vec<String> {
            self.delete_calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, token)| token.clone())
                .collect()
        }
    }

    #[async_trait]
    impl QueueClient for MockQueueClient {
        async fn resolve_queue_url(&self, queue_name: &str) -> Result<String, TransportError> {
            self.resolve_calls
                .lock()
                .unwrap()
                .push(queue_name.to_string());

            if self.fail_resolve {
                return Err(TransportError::Resolve(format!(
                    "no queue named {queue_name}"
                )));
            }
            Ok(self.queue_url.clone())
        }

        async fn receive_messages(
            &self,
            queue_url: &str,
            max_messages: i32,
            wait_time_seconds: i32,
        ) -> Result<Batch, TransportError> {
            self.receive_calls.lock().unwrap().push((
                queue_url.to_string(),
                max_messages,
                wait_time_seconds,
            ));

            match self.receive_script.lock().unwrap().pop_front() {
                Some(result) => result,
                None => Ok(Vec::new()),
            }
        }

        async fn delete_message(
            &self,
            queue_url: &str,
            receipt_token: &str,
        ) -> Result<(), TransportError> {
            self.delete_calls
                .lock()
                .unwrap()
                .push((queue_url.to_string(), receipt_token.to_string()));

            if self.fail_deletes {
                return Err(TransportError::Delete(format!(
                    "receipt token expired: {receipt_token}"
                )));
            }
            Ok(())
        }
    }
}
