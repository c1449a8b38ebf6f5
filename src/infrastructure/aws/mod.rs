pub mod sdk_config;
pub mod sns_topic;
pub mod sqs_queue;
