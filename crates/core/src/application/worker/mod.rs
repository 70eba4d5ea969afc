// Worker - Poll / dispatch / acknowledge loop

pub mod constants;
mod config;
mod shutdown;


pub use config::WorkerConfig;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::domain::{Batch, Message};
use crate::error::Result;
use crate::port::{HandlerError, MessageHandler, QueueClient};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Worker consumes messages from one queue
///
/// One long-lived sequential poll loop; each non-empty batch fans out into
/// one task per message and the loop waits for the whole batch before the
/// next receive. Batches are strictly sequential, messages within a batch
/// are fully parallel.
pub struct Worker {
    config: Arc<WorkerConfig>,
    client: Arc<dyn QueueClient>,
}

impl Worker {
    /// Create a new worker
    ///
    /// Applies config defaults and resolves the queue name to a URL through
    /// the client, exactly once. A failed resolution is logged and leaves
    /// the URL empty; the worker is still returned and every subsequent
    /// receive will fail (and be logged) until the queue exists. This is a
    /// deliberate soft-failure mode, not a hard error.
    pub async fn new(client: Arc<dyn QueueClient>, mut config: WorkerConfig) -> Self {
        config.populate_default_values();
        config.queue_url = match client.resolve_queue_url(&config.queue_name).await {
            Ok(url) => url,
            Err(err) => {
                error!(queue = %config.queue_name, "worker: {err}");
                String::new()
            }
        };

        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Run the poll loop until the shutdown token fires
    ///
    /// No failure inside the loop ever propagates to the caller: transport
    /// errors skip one iteration, handler errors leave one message for
    /// redelivery. Only the shutdown token ends the loop; it is checked at
    /// the top of every iteration, so an in-flight receive or dispatch
    /// always completes first.
    pub async fn start(&self, handler: Arc<dyn MessageHandler>, shutdown: ShutdownToken) {
        info!(queue = %self.config.queue_name, "worker: started");

        loop {
            if shutdown.is_shutdown() {
                info!(queue = %self.config.queue_name, "worker: stopping polling, shutdown signal received");
                break;
            }
            debug!("worker: start polling");

            let received = self
                .client
                .receive_messages(
                    &self.config.queue_url,
                    self.config.max_messages,
                    self.config.wait_time_seconds,
                )
                .await;

            match received {
                Ok(batch) => {
                    if !batch.is_empty() {
                        self.dispatch(Arc::clone(&handler), batch).await;
                    }
                    // Empty batch: the long poll already paced us, go again
                }
                Err(err) => {
                    // Non-fatal: the long-poll wait provides natural pacing,
                    // so no extra backoff before the next attempt
                    error!("worker: {err}");
                }
            }
        }

        info!(queue = %self.config.queue_name, "worker: stopped");
    }

    /// Process a batch: one task per message, join on all before returning
    ///
    /// Per-message failures are isolated from each other and from the loop.
    /// A panicking handler is contained by the task boundary; its message is
    /// simply left unacknowledged for redelivery.
    async fn dispatch(&self, handler: Arc<dyn MessageHandler>, batch: Batch) {
        info!("worker: received {} messages", batch.len());

        let mut tasks = Vec::with_capacity(batch.len());
        for message in batch {
            let client = Arc::clone(&self.client);
            let config = Arc::clone(&self.config);
            let handler = Arc::clone(&handler);

            tasks.push(tokio::spawn(async move {
                if let Err(err) = Self::handle_message(client, config, handler, message).await {
                    error!("worker: {err}");
                }
            }));
        }

        for result in futures::future::join_all(tasks).await {
            if let Err(err) = result {
                error!("worker: message task aborted: {err}");
            }
        }
    }

    /// Handle one message and acknowledge it on success
    ///
    /// An invalid-event outcome is acknowledged like a success: redelivering
    /// a structurally broken message can never help. Any other handler error
    /// skips the delete so the queue redelivers the message. Delivery is
    /// therefore at-least-once, never exactly-once.
    async fn handle_message(
        client: Arc<dyn QueueClient>,
        config: Arc<WorkerConfig>,
        handler: Arc<dyn MessageHandler>,
        message: Message,
    ) -> Result<()> {
        match handler.handle(&message).await {
            Ok(()) => {}
            Err(err @ HandlerError::InvalidEvent { .. }) => {
                error!(message_id = %message.message_id, "worker: {err}");
            }
            Err(err) => return Err(err.into()),
        }

        client
            .delete_message(&config.queue_url, &message.receipt_token)
            .await?;
        debug!(
            message_id = %message.message_id,
            "worker: deleted message from queue: {}", message.receipt_token
        );

        Ok(())
    }
}
