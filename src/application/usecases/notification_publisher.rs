use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::domain::{
    repositories::topic_publisher::TopicPublisher,
    value_objects::{
        notifications::{OrderProductionContract, OrderUpdateContract},
        payments::PaymentModel,
    },
};

/// Fans payment outcomes out to the order-production and update-order topics.
pub struct NotificationPublisher {
    order_production_topic: Arc<dyn TopicPublisher + Send + Sync>,
    update_order_topic: Arc<dyn TopicPublisher + Send + Sync>,
}

impl NotificationPublisher {
    pub fn new(
        order_production_topic: Arc<dyn TopicPublisher + Send + Sync>,
        update_order_topic: Arc<dyn TopicPublisher + Send + Sync>,
    ) -> Self {
        Self {
            order_production_topic,
            update_order_topic,
        }
    }

    pub async fn publish_order_production(&self, payment: &PaymentModel) -> Result<Option<String>> {
        let contract = OrderProductionContract::from(payment);
        publish_json(self.order_production_topic.as_ref(), &contract).await
    }

    pub async fn publish_order_update(&self, payment: &PaymentModel) -> Result<Option<String>> {
        let contract = OrderUpdateContract::from(payment);
        publish_json(self.update_order_topic.as_ref(), &contract).await
    }
}

async fn publish_json<T: Serialize>(
    topic: &(dyn TopicPublisher + Send + Sync),
    contract: &T,
) -> Result<Option<String>> {
    let topic_name = topic.topic_name();
    let body = serde_json::to_string(contract)
        .with_context(|| format!("failed to serialize contract for topic {topic_name}"))?;

    let message_id = topic
        .publish(body)
        .await
        .with_context(|| format!("failed to publish to topic {topic_name}"))?;

    if let Some(message_id) = &message_id {
        info!(topic = %topic_name, %message_id, "notification_publisher: message published");
    }
    Ok(message_id)
}
