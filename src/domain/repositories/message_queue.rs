use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::queue_messages::QueueMessage;

#[automock]
#[async_trait]
pub trait MessageQueue {
    fn queue_name(&self) -> String;
    /// Long-polls for the next batch. An empty batch is not an error.
    async fn receive_messages(&self) -> Result<Vec<QueueMessage>>;
    async fn delete_message(&self, receipt_handle: String) -> Result<()>;
}
