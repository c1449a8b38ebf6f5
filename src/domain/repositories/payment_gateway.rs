use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::payments::GatewayPaymentModel;

#[automock]
#[async_trait]
pub trait PaymentGateway {
    /// Hands the payment to the external processor and returns its reference.
    async fn request_payment(&self, request: GatewayPaymentModel) -> Result<String>;
}
