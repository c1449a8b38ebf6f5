pub mod create_payment;
pub mod gateway_dispatch;
pub mod get_payments;
pub mod notification_publisher;
pub mod payment_webhook;
pub mod update_payment;
