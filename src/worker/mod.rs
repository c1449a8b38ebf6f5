pub mod keyed_lock;
pub mod queue_consumer;
