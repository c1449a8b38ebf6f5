pub mod message_queue;
pub mod payment_gateway;
pub mod payments;
pub mod topic_publisher;
