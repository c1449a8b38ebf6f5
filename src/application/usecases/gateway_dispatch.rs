use std::sync::Arc;

use tracing::{error, info};

use crate::domain::{
    errors::{PaymentError, PaymentResult},
    repositories::payment_gateway::PaymentGateway,
    value_objects::payments::GatewayPaymentModel,
};

pub struct GatewayDispatchUseCase {
    payment_gateway: Arc<dyn PaymentGateway + Send + Sync>,
}

impl GatewayDispatchUseCase {
    pub fn new(payment_gateway: Arc<dyn PaymentGateway + Send + Sync>) -> Self {
        Self { payment_gateway }
    }

    /// Returns the processor reference. A failure here never touches the stored payment.
    pub async fn dispatch(&self, request: GatewayPaymentModel) -> PaymentResult<String> {
        request.validate()?;

        let reference = self
            .payment_gateway
            .request_payment(request.clone())
            .await
            .map_err(|err| {
                error!(
                    payment_id = %request.payment_id,
                    error = ?err,
                    "gateway_dispatch: payment processor rejected the request"
                );
                PaymentError::Internal(err)
            })?;

        info!(
            payment_id = %request.payment_id,
            amount = %request.amount,
            %reference,
            "gateway_dispatch: payment sent to processor"
        );
        Ok(reference)
    }
}
