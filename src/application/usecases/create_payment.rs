use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::domain::{
    errors::{PaymentError, PaymentResult, RepositoryError},
    repositories::payments::PaymentRepository,
    value_objects::payments::{CreatePaymentModel, PaymentModel},
};

pub struct CreatePaymentUseCase {
    payment_repository: Arc<dyn PaymentRepository + Send + Sync>,
}

impl CreatePaymentUseCase {
    pub fn new(payment_repository: Arc<dyn PaymentRepository + Send + Sync>) -> Self {
        Self { payment_repository }
    }

    pub async fn create(&self, request: CreatePaymentModel) -> PaymentResult<PaymentModel> {
        request.validate().map_err(|err| {
            warn!(
                payment_id = %request.payment_id,
                error = %err,
                "create_payment: request not valid"
            );
            err
        })?;

        info!(payment_id = %request.payment_id, "create_payment: checking if payment already exists");
        match self
            .payment_repository
            .get_by_id(request.payment_id.clone())
            .await
        {
            Ok(existing) if existing.exists() => {
                warn!(payment_id = %request.payment_id, "create_payment: payment already exists");
                return Err(PaymentError::PaymentAlreadyExists);
            }
            Ok(_) | Err(RepositoryError::NotFound) => {}
            Err(err) => {
                error!(
                    payment_id = %request.payment_id,
                    db_error = ?err,
                    "create_payment: failed to look up payment"
                );
                return Err(err.into());
            }
        }

        info!(
            payment_id = %request.payment_id,
            order_id = %request.order_id,
            "create_payment: payment not found, creating new payment"
        );
        let payment = request.to_model(Utc::now());

        // A concurrent create for the same id can slip past the lookup above; the store's
        // uniqueness constraint is what settles it.
        match self.payment_repository.create(payment.clone()).await {
            Ok(()) => {}
            Err(RepositoryError::AlreadyExists) => {
                warn!(
                    payment_id = %payment.payment_id,
                    "create_payment: lost insert race, payment already exists"
                );
                return Err(PaymentError::PaymentAlreadyExists);
            }
            Err(err) => {
                error!(
                    payment_id = %payment.payment_id,
                    db_error = ?err,
                    "create_payment: failed to persist payment"
                );
                return Err(err.into());
            }
        }

        info!(payment_id = %payment.payment_id, "create_payment: payment created");
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        repositories::payments::MockPaymentRepository,
        value_objects::{enums::payment_states::PaymentState, payments::PaymentItemModel},
    };
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn request(payment_id: &str) -> CreatePaymentModel {
        CreatePaymentModel {
            order_id: Uuid::new_v4().to_string(),
            payment_id: payment_id.to_string(),
            items: vec![PaymentItemModel {
                id: Uuid::new_v4().to_string(),
                name: "item1".to_string(),
                quantity: 1,
            }],
            total_items: 1,
            amount: dec!(100),
        }
    }

    #[tokio::test]
    async fn creates_payment_waiting_for_approval() {
        let payment_id = Uuid::new_v4().to_string();
        let mut repository = MockPaymentRepository::new();

        repository
            .expect_get_by_id()
            .with(eq(payment_id.clone()))
            .times(1)
            .returning(|_| Err(RepositoryError::NotFound));
        repository
            .expect_create()
            .withf(|payment| payment.state() == PaymentState::WaitingForApproval)
            .times(1)
            .returning(|_| Ok(()));

        let usecase = CreatePaymentUseCase::new(Arc::new(repository));
        let payment = usecase.create(request(&payment_id)).await.unwrap();

        assert_eq!(payment.payment_id, payment_id);
        assert_eq!(payment.state(), PaymentState::WaitingForApproval);
        assert_eq!(payment.state_title(), "WaitingForApproval");
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_the_repository() {
        let repository = MockPaymentRepository::new();
        let usecase = CreatePaymentUseCase::new(Arc::new(repository));

        let mut req = request("P1");
        req.total_items = -1;

        let err = usecase.create(req).await.unwrap_err();
        assert!(matches!(err, PaymentError::RequestNotValid(_)));
    }

    #[tokio::test]
    async fn existing_payment_is_rejected() {
        let mut repository = MockPaymentRepository::new();
        repository.expect_get_by_id().times(1).returning(|id| {
            Ok(PaymentModel::new(
                "O1".to_string(),
                id,
                vec![],
                1,
                dec!(1),
                Utc::now(),
            ))
        });
        repository.expect_create().never();

        let usecase = CreatePaymentUseCase::new(Arc::new(repository));
        let err = usecase.create(request("P1")).await.unwrap_err();

        assert!(matches!(err, PaymentError::PaymentAlreadyExists));
    }

    #[tokio::test]
    async fn lookup_failure_other_than_not_found_is_fatal() {
        let mut repository = MockPaymentRepository::new();
        repository
            .expect_get_by_id()
            .returning(|_| Err(RepositoryError::Internal(anyhow::anyhow!("connection reset"))));
        repository.expect_create().never();

        let usecase = CreatePaymentUseCase::new(Arc::new(repository));
        let err = usecase.create(request("P1")).await.unwrap_err();

        assert!(matches!(err, PaymentError::Internal(_)));
    }

    #[tokio::test]
    async fn uniqueness_violation_on_insert_means_already_exists() {
        let mut repository = MockPaymentRepository::new();
        repository
            .expect_get_by_id()
            .returning(|_| Err(RepositoryError::NotFound));
        repository
            .expect_create()
            .times(1)
            .returning(|_| Err(RepositoryError::AlreadyExists));

        let usecase = CreatePaymentUseCase::new(Arc::new(repository));
        let err = usecase.create(request("P1")).await.unwrap_err();

        assert!(matches!(err, PaymentError::PaymentAlreadyExists));
    }

    #[tokio::test]
    async fn persistence_failure_propagates() {
        let mut repository = MockPaymentRepository::new();
        repository
            .expect_get_by_id()
            .returning(|_| Err(RepositoryError::NotFound));
        repository
            .expect_create()
            .returning(|_| Err(RepositoryError::Internal(anyhow::anyhow!("item insert failed"))));

        let usecase = CreatePaymentUseCase::new(Arc::new(repository));
        let err = usecase.create(request("P1")).await.unwrap_err();

        assert!(matches!(err, PaymentError::Internal(_)));
    }
}
