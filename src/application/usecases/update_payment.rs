use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::domain::{
    errors::{PaymentError, PaymentResult},
    repositories::payments::PaymentRepository,
    value_objects::{
        enums::payment_states::PaymentState,
        payments::{PaymentModel, UpdatePaymentModel},
    },
};

pub struct UpdatePaymentUseCase {
    payment_repository: Arc<dyn PaymentRepository + Send + Sync>,
}

impl UpdatePaymentUseCase {
    pub fn new(payment_repository: Arc<dyn PaymentRepository + Send + Sync>) -> Self {
        Self { payment_repository }
    }

    /// Applies the webhook outcome. With `resend` set the stored payment is returned as-is.
    pub async fn update(&self, request: UpdatePaymentModel) -> PaymentResult<PaymentModel> {
        request.validate()?;

        let mut payment = self
            .payment_repository
            .get_by_id(request.payment_id.clone())
            .await
            .map_err(|err| {
                warn!(
                    payment_id = %request.payment_id,
                    error = %err,
                    "update_payment: failed to load payment"
                );
                PaymentError::from(err)
            })?;

        if request.resend {
            info!(
                payment_id = %payment.payment_id,
                state = %payment.state(),
                "update_payment: resend requested, keeping current state"
            );
            return Ok(payment);
        }

        if payment.is_in_state(&[PaymentState::Approved, PaymentState::Rejected]) {
            warn!(
                payment_id = %payment.payment_id,
                state = %payment.state(),
                "update_payment: payment already in a final state"
            );
            return Err(PaymentError::PaymentAlreadyInState);
        }

        let target = request.target_state();
        payment.update_state(target, Utc::now())?;

        self.payment_repository
            .update(payment.clone())
            .await
            .map_err(|err| {
                error!(
                    payment_id = %payment.payment_id,
                    db_error = ?err,
                    "update_payment: failed to persist new state"
                );
                PaymentError::from(err)
            })?;

        info!(
            payment_id = %payment.payment_id,
            state = %payment.state(),
            "update_payment: payment state updated"
        );
        Ok(payment)
    }
}
