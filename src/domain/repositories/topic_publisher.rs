use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

#[automock]
#[async_trait]
pub trait TopicPublisher {
    fn topic_name(&self) -> String;
    /// Publishes an already serialized body and returns the broker's message id, if any.
    async fn publish(&self, body: String) -> Result<Option<String>>;
}
