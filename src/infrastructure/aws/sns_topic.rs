use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sns::Client;
use tracing::info;

use crate::{
    config::config_model::Topic,
    domain::{errors::PaymentError, repositories::topic_publisher::TopicPublisher},
};

pub struct SnsTopic {
    client: Client,
    topic_name: String,
    topic_arn: String,
}

impl SnsTopic {
    /// Uses the configured ARN when there is one, otherwise looks the topic up by name.
    pub async fn new(sdk_config: &SdkConfig, topic: &Topic) -> Result<Self> {
        let client = Client::new(sdk_config);

        let topic_arn = match &topic.arn {
            Some(arn) => arn.clone(),
            None => find_topic_arn(&client, &topic.name).await?,
        };

        info!(topic = %topic.name, %topic_arn, "sns: topic resolved");

        Ok(Self {
            client,
            topic_name: topic.name.clone(),
            topic_arn,
        })
    }
}

async fn find_topic_arn(client: &Client, topic_name: &str) -> Result<String> {
    let mut next_token: Option<String> = None;

    loop {
        let output = client
            .list_topics()
            .set_next_token(next_token.take())
            .send()
            .await
            .context("failed to list topics")?;

        let arns = output.topics().iter().filter_map(|topic| topic.topic_arn());
        if let Some(arn) = match_topic_arn(arns, topic_name) {
            return Ok(arn);
        }

        match output.next_token() {
            Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
            _ => return Err(PaymentError::TopicNotFound(topic_name.to_string()).into()),
        }
    }
}

/// First ARN containing `topic_name`.
pub fn match_topic_arn<'a>(
    arns: impl IntoIterator<Item = &'a str>,
    topic_name: &str,
) -> Option<String> {
    arns.into_iter()
        .find(|arn| arn.contains(topic_name))
        .map(str::to_string)
}

#[async_trait]
impl TopicPublisher for SnsTopic {
    fn topic_name(&self) -> String {
        self.topic_name.clone()
    }

    async fn publish(&self, body: String) -> Result<Option<String>> {
        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .message(body)
            .send()
            .await
            .with_context(|| format!("failed to publish to {}", self.topic_arn))?;

        Ok(output.message_id().map(str::to_string))
    }
}
