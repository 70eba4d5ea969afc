// QueueClient implementation backed by AWS SQS

use async_trait::async_trait;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::QueueAttributeName;
use tracing::debug;

use carrier_core::domain::{Batch, Message};
use carrier_core::port::{QueueClient, TransportError};

use crate::connection::{create_client, SqsConnectConfig};

/// QueueClient implementation using aws-sdk-sqs
pub struct SqsQueueClient {
    client: aws_sdk_sqs::Client,
}

impl SqsQueueClient {
    pub fn new(client: aws_sdk_sqs::Client) -> Self {
        Self { client }
    }

    /// Build a client from environment config plus optional overrides
    pub async fn connect(config: &SqsConnectConfig) -> Self {
        Self::new(create_client(config).await)
    }
}

#[async_trait]
impl QueueClient for SqsQueueClient {
    async fn resolve_queue_url(&self, queue_name: &str) -> Result<String, TransportError> {
        let output = self
            .client
            .get_queue_url()
            .queue_name(queue_name)
            .send()
            .await
            .map_err(|err| TransportError::Resolve(DisplayErrorContext(&err).to_string()))?;

        output
            .queue_url()
            .map(str::to_owned)
            .ok_or_else(|| TransportError::Resolve(format!("no url returned for {queue_name}")))
    }

    async fn receive_messages(
        &self,
        queue_url: &str,
        max_messages: i32,
        wait_time_seconds: i32,
    ) -> Result<Batch, TransportError> {
        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(wait_time_seconds)
            .attribute_names(QueueAttributeName::All)
            .send()
            .await
            .map_err(|err| TransportError::Receive(DisplayErrorContext(&err).to_string()))?;

        let messages = output.messages.unwrap_or_default();
        debug!("sqs: received {} messages", messages.len());

        Ok(messages.into_iter().map(to_domain_message).collect())
    }

    async fn delete_message(
        &self,
        queue_url: &str,
        receipt_token: &str,
    ) -> Result<(), TransportError> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_token)
            .send()
            .await
            .map_err(|err| TransportError::Delete(DisplayErrorContext(&err).to_string()))?;

        Ok(())
    }
}

/// Map an SDK message into the domain model
///
/// SDK fields are all optional; empty strings keep the core free of Options
/// it would only ever log or pass back verbatim.
fn to_domain_message(message: aws_sdk_sqs::types::Message) -> Message {
    Message::new(
        message.message_id.unwrap_or_default(),
        message.body.unwrap_or_default(),
        message.receipt_handle.unwrap_or_default(),
    )
}
