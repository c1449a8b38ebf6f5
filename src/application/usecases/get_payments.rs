use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    errors::{PaymentError, PaymentResult},
    repositories::payments::PaymentRepository,
    value_objects::{identifiers::ensure_identifier, payments::PaymentModel},
};

pub struct GetPaymentsUseCase {
    payment_repository: Arc<dyn PaymentRepository + Send + Sync>,
}

impl GetPaymentsUseCase {
    pub fn new(payment_repository: Arc<dyn PaymentRepository + Send + Sync>) -> Self {
        Self { payment_repository }
    }

    pub async fn get_by_id(&self, payment_id: String) -> PaymentResult<PaymentModel> {
        ensure_identifier("payment_id", &payment_id)?;

        self.payment_repository
            .get_by_id(payment_id.clone())
            .await
            .map_err(|err| {
                warn!(%payment_id, error = %err, "get_payments: failed to load payment");
                PaymentError::from(err)
            })
    }

    pub async fn get_by_order_id(&self, order_id: String) -> PaymentResult<Vec<PaymentModel>> {
        ensure_identifier("order_id", &order_id)?;

        let payments = self
            .payment_repository
            .get_by_order_id(order_id.clone())
            .await
            .map_err(|err| {
                warn!(%order_id, error = %err, "get_payments: failed to load order payments");
                PaymentError::from(err)
            })?;

        info!(%order_id, count = payments.len(), "get_payments: order payments loaded");
        Ok(payments)
    }
}
