use anyhow::Result;
use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    repositories::payment_gateway::PaymentGateway, value_objects::payments::GatewayPaymentModel,
};

/// Accepts every request and hands back a fresh reference. No processor is contacted.
#[derive(Debug, Default, Clone)]
pub struct StubPaymentGateway;

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    async fn request_payment(&self, request: GatewayPaymentModel) -> Result<String> {
        let reference = Uuid::new_v4().to_string();
        info!(
            payment_id = %request.payment_id,
            amount = %request.amount,
            %reference,
            "stub_gateway: payment accepted"
        );
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn every_request_gets_a_distinct_reference() {
        let gateway = StubPaymentGateway;
        let request = GatewayPaymentModel {
            payment_id: "P1".to_string(),
            amount: dec!(59.98),
        };

        let first = gateway.request_payment(request.clone()).await.unwrap();
        let second = gateway.request_payment(request).await.unwrap();

        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }
}
