pub mod enums;
pub mod identifiers;
pub mod notifications;
pub mod payments;
pub mod queue_messages;
