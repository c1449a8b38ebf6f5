use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sqs::{Client, types::Message};
use tracing::{info, warn};

use crate::{
    config::config_model::Queue, domain::repositories::message_queue::MessageQueue,
    domain::value_objects::queue_messages::QueueMessage,
};

pub struct SqsQueue {
    client: Client,
    queue_name: String,
    queue_url: String,
    max_messages: i32,
    wait_time_seconds: i32,
}

impl SqsQueue {
    /// Resolves the queue url once; an unknown queue aborts startup.
    pub async fn new(sdk_config: &SdkConfig, queue: &Queue) -> Result<Self> {
        let client = Client::new(sdk_config);

        let output = client
            .get_queue_url()
            .queue_name(&queue.name)
            .send()
            .await
            .with_context(|| format!("failed to resolve url of queue {}", queue.name))?;
        let queue_url = output
            .queue_url()
            .with_context(|| format!("queue {} has no url", queue.name))?
            .to_string();

        info!(queue = %queue.name, %queue_url, "sqs: queue resolved");

        Ok(Self {
            client,
            queue_name: queue.name.clone(),
            queue_url,
            max_messages: queue.max_messages,
            wait_time_seconds: queue.wait_time_seconds,
        })
    }
}

fn to_queue_message(message: &Message) -> Option<QueueMessage> {
    let Some(receipt_handle) = message.receipt_handle() else {
        warn!(message_id = ?message.message_id(), "sqs: message without receipt handle skipped");
        return None;
    };

    Some(QueueMessage {
        message_id: message.message_id().unwrap_or_default().to_string(),
        receipt_handle: receipt_handle.to_string(),
        body: message.body().unwrap_or_default().to_string(),
    })
}

#[async_trait]
impl MessageQueue for SqsQueue {
    fn queue_name(&self) -> String {
        self.queue_name.clone()
    }

    async fn receive_messages(&self) -> Result<Vec<QueueMessage>> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(self.max_messages)
            .wait_time_seconds(self.wait_time_seconds)
            .send()
            .await
            .with_context(|| format!("failed to receive messages from {}", self.queue_name))?;

        Ok(output
            .messages()
            .iter()
            .filter_map(to_queue_message)
            .collect())
    }

    async fn delete_message(&self, receipt_handle: String) -> Result<()> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .with_context(|| format!("failed to delete message from {}", self.queue_name))?;
        Ok(())
    }
}
