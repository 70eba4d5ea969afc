// Batch dispatch tests: fan-out, failure isolation, acknowledgement rules

use async_trait::async_trait;
use carrier_core::application::{shutdown_channel, ShutdownSender, Worker, WorkerConfig};
use carrier_core::domain::Message;
use carrier_core::port::queue_client::mocks::MockQueueClient;
use carrier_core::port::{HandlerError, MessageHandler, QueueClient};
use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

const QUEUE_URL: &str = "https://queue.test/orders";

/// Handler with per-message behavior, keyed by message id.
///
/// Records every invocation first, signals shutdown once the whole batch has
/// been seen, then acts out the configured outcome for that message.
struct BatchHandler {
    fail_ids: HashSet<String>,
    invalid_ids: HashSet<String>,
    panic_ids: HashSet<String>,
    barrier: Option<Arc<Barrier>>,
    stop_after: usize,
    shutdown: Mutex<Option<ShutdownSender>>,
    handled: Mutex<Vec<Message>>,
}

impl BatchHandler {
    fn new(stop_after: usize, sender: ShutdownSender) -> Self {
        Self {
            fail_ids: HashSet::new(),
            invalid_ids: HashSet::new(),
            panic_ids: HashSet::new(),
            barrier: None,
            stop_after,
            shutdown: Mutex::new(Some(sender)),
            handled: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, id: &str) -> Self {
        self.fail_ids.insert(id.to_string());
        self
    }

    fn invalid_on(mut self, id: &str) -> Self {
        self.invalid_ids.insert(id.to_string());
        self
    }

    fn panicking_on(mut self, id: &str) -> Self {
        self.panic_ids.insert(id.to_string());
        self
    }

    fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    fn handled_ids(&self) -> Vec<String> {
        self.handled
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.message_id.clone())
            .collect()
    }
}

#[async_trait]
impl MessageHandler for BatchHandler {
    async fn handle(&self, message: &Message) -> Result<(), HandlerError> {
        let count = {
            let mut handled = self.handled.lock().unwrap();
            handled.push(message.clone());
            handled.len()
        };
        if count >= self.stop_after {
            if let Some(sender) = self.shutdown.lock().unwrap().take() {
                sender.shutdown();
            }
        }

        // Rendezvous point: only reachable if the batch runs in parallel
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }

        if self.panic_ids.contains(&message.message_id) {
            panic!("handler exploded on {}", message.message_id);
        }
        if self.invalid_ids.contains(&message.message_id) {
            return Err(HandlerError::invalid_event(
                &message.message_id,
                "unparseable payload",
            ));
        }
        if self.fail_ids.contains(&message.message_id) {
            return Err(HandlerError::failed("downstream unavailable"));
        }
        Ok(())
    }
}

fn message(id: &str) -> Message {
    Message::new(id, format!("payload-{id}"), format!("receipt-{id}"))
}

fn batch(ids: &[&str]) -> Vec<Message> {
    ids.iter().map(|id| message(id)).collect()
}

#[tokio::test]
async fn test_all_success_batch_deletes_every_message() {
    let ids = ["m1", "m2", "m3", "m4", "m5"];
    let client = Arc::new(MockQueueClient::new(QUEUE_URL).push_batch(batch(&ids)));
    let (sender, token) = shutdown_channel();
    let handler = Arc::new(BatchHandler::new(ids.len(), sender));

    let worker = Worker::new(
        Arc::clone(&client) as Arc<dyn QueueClient>,
        WorkerConfig::new("orders"),
    )
    .await;
    tokio::time::timeout(
        Duration::from_secs(5),
        worker.start(Arc::clone(&handler) as Arc<dyn MessageHandler>, token),
    )
    .await
    .expect("worker did not stop");

    // Exactly N deletes, one per receipt token, order unconstrained
    let deleted: BTreeSet<String> = client.deleted_tokens().into_iter().collect();
    let expected: BTreeSet<String> = ids.iter().map(|id| format!("receipt-{id}")).collect();
    assert_eq!(deleted, expected);
    assert_eq!(client.delete_calls().len(), ids.len());
}

#[tokio::test]
async fn test_mixed_batch_acknowledges_success_and_invalid_only() {
    let ids = ["ok", "bad-payload", "flaky"];
    let client = Arc::new(MockQueueClient::new(QUEUE_URL).push_batch(batch(&ids)));
    let (sender, token) = shutdown_channel();
    let handler = Arc::new(
        BatchHandler::new(ids.len(), sender)
            .invalid_on("bad-payload")
            .failing_on("flaky"),
    );

    let worker = Worker::new(
        Arc::clone(&client) as Arc<dyn QueueClient>,
        WorkerConfig::new("orders"),
    )
    .await;
    tokio::time::timeout(
        Duration::from_secs(5),
        worker.start(Arc::clone(&handler) as Arc<dyn MessageHandler>, token),
    )
    .await
    .expect("worker did not stop");

    let deleted: BTreeSet<String> = client.deleted_tokens().into_iter().collect();
    let expected: BTreeSet<String> = ["receipt-ok", "receipt-bad-payload"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    // Invalid events are acknowledged; the flaky message stays for redelivery
    assert_eq!(deleted, expected);
}

#[tokio::test]
async fn test_delete_failure_does_not_stop_the_loop() {
    let client = Arc::new(
        MockQueueClient::new(QUEUE_URL)
            .with_failing_deletes()
            .push_batch(batch(&["m1"]))
            .push_batch(batch(&["m2"])),
    );
    let (sender, token) = shutdown_channel();
    let handler = Arc::new(BatchHandler::new(2, sender));

    let worker = Worker::new(
        Arc::clone(&client) as Arc<dyn QueueClient>,
        WorkerConfig::new("orders"),
    )
    .await;
    tokio::time::timeout(
        Duration::from_secs(5),
        worker.start(Arc::clone(&handler) as Arc<dyn MessageHandler>, token),
    )
    .await
    .expect("worker did not stop");

    // Both deletes were attempted and failed; both batches were still handled
    assert_eq!(client.delete_calls().len(), 2);
    assert_eq!(handler.handled_ids().len(), 2);
    assert_eq!(client.receive_call_count(), 2);
}

#[tokio::test]
async fn test_batch_messages_run_concurrently() {
    // Every handler parks on the barrier until all of them arrive; this
    // deadlocks unless the batch is dispatched in parallel
    let ids = ["m1", "m2", "m3", "m4"];
    let client = Arc::new(MockQueueClient::new(QUEUE_URL).push_batch(batch(&ids)));
    let (sender, token) = shutdown_channel();
    let barrier = Arc::new(Barrier::new(ids.len()));
    let handler = Arc::new(BatchHandler::new(ids.len(), sender).with_barrier(barrier));

    let worker = Worker::new(
        Arc::clone(&client) as Arc<dyn QueueClient>,
        WorkerConfig::new("orders"),
    )
    .await;
    tokio::time::timeout(
        Duration::from_secs(5),
        worker.start(Arc::clone(&handler) as Arc<dyn MessageHandler>, token),
    )
    .await
    .expect("batch did not run in parallel");

    assert_eq!(client.delete_calls().len(), ids.len());
}

#[tokio::test]
async fn test_panicking_handler_is_isolated() {
    let ids = ["boom", "ok"];
    let client = Arc::new(MockQueueClient::new(QUEUE_URL).push_batch(batch(&ids)));
    let (sender, token) = shutdown_channel();
    let handler = Arc::new(BatchHandler::new(ids.len(), sender).panicking_on("boom"));

    let worker = Worker::new(
        Arc::clone(&client) as Arc<dyn QueueClient>,
        WorkerConfig::new("orders"),
    )
    .await;
    tokio::time::timeout(
        Duration::from_secs(5),
        worker.start(Arc::clone(&handler) as Arc<dyn MessageHandler>, token),
    )
    .await
    .expect("worker did not survive the panic");

    // The panicked message is left unacknowledged, the other one is deleted
    assert_eq!(client.deleted_tokens(), vec!["receipt-ok".to_string()]);
}
