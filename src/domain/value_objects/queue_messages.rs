use serde::{Deserialize, Serialize};

pub const NOTIFICATION_TYPE: &str = "Notification";

/// A message received from the inbound channel, channel-agnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: String,
}

/// Outer envelope fanned out by the notification topic into the queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicNotification {
    #[serde(rename = "Type", alias = "type")]
    pub type_: String,
    #[serde(rename = "Message", alias = "message", default)]
    pub message: String,
}

impl TopicNotification {
    pub fn is_notification(&self) -> bool {
        self.type_.eq_ignore_ascii_case(NOTIFICATION_TYPE)
    }
}
