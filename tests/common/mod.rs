#![allow(dead_code)]

use std::{collections::VecDeque, sync::Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;
use payment_management::domain::{
    repositories::{
        message_queue::MessageQueue, payment_gateway::PaymentGateway,
        topic_publisher::TopicPublisher,
    },
    value_objects::{payments::GatewayPaymentModel, queue_messages::QueueMessage},
};
use serde_json::json;
use tokio::sync::watch;

pub const PAYMENT_REQUEST: &str = r#"{"order_id":"O1","payment_id":"P1","items":[{"id":"I1","name":"Burger","quantity":1}],"total_items":1,"amount":59.98}"#;

pub fn notification_body(message_type: &str, inner: &str) -> String {
    json!({"type": message_type, "message": inner}).to_string()
}

pub fn queue_message(id: &str, body: String) -> QueueMessage {
    QueueMessage {
        message_id: id.to_string(),
        receipt_handle: format!("rh-{id}"),
        body,
    }
}

/// Serves the queued batches in order, then flips `shutdown` and returns empty batches.
pub struct ScriptedQueue {
    batches: Mutex<VecDeque<Vec<QueueMessage>>>,
    deleted: Mutex<Vec<String>>,
    shutdown: watch::Sender<bool>,
}

impl ScriptedQueue {
    pub fn new(batches: Vec<Vec<QueueMessage>>) -> (Self, watch::Receiver<bool>) {
        let (shutdown, receiver) = watch::channel(false);
        let queue = Self {
            batches: Mutex::new(batches.into()),
            deleted: Mutex::new(Vec::new()),
            shutdown,
        };
        (queue, receiver)
    }

    pub fn deleted(&self) -> Vec<String> {
        let mut deleted = self.deleted.lock().unwrap().clone();
        deleted.sort();
        deleted
    }
}

#[async_trait]
impl MessageQueue for ScriptedQueue {
    fn queue_name(&self) -> String {
        "OrderPaymentQueue".to_string()
    }

    async fn receive_messages(&self) -> Result<Vec<QueueMessage>> {
        let next = self.batches.lock().unwrap().pop_front();
        match next {
            Some(batch) => Ok(batch),
            None => {
                self.shutdown.send_replace(true);
                Ok(vec![])
            }
        }
    }

    async fn delete_message(&self, receipt_handle: String) -> Result<()> {
        self.deleted.lock().unwrap().push(receipt_handle);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingTopic {
    name: String,
    fail: bool,
    published: Mutex<Vec<String>>,
}

impl RecordingTopic {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail: true,
            ..Default::default()
        }
    }

    pub fn published(&self) -> Vec<serde_json::Value> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|body| serde_json::from_str(body).unwrap())
            .collect()
    }
}

#[async_trait]
impl TopicPublisher for RecordingTopic {
    fn topic_name(&self) -> String {
        self.name.clone()
    }

    async fn publish(&self, body: String) -> Result<Option<String>> {
        if self.fail {
            bail!("topic {} is unavailable", self.name);
        }
        let mut published = self.published.lock().unwrap();
        published.push(body);
        Ok(Some(format!("msg-{}", published.len())))
    }
}

#[derive(Default)]
pub struct RecordingGateway {
    requests: Mutex<Vec<GatewayPaymentModel>>,
}

impl RecordingGateway {
    pub fn requests(&self) -> Vec<GatewayPaymentModel> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn request_payment(&self, request: GatewayPaymentModel) -> Result<String> {
        let reference = format!("ref-{}", request.payment_id);
        self.requests.lock().unwrap().push(request);
        Ok(reference)
    }
}
