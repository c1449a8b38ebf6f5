use async_trait::async_trait;
use mockall::automock;

use crate::domain::{errors::RepositoryResult, value_objects::payments::PaymentModel};

/// Each call is one transaction. No locking across calls: duplicate creates are caught by
/// the `payment_id` uniqueness constraint and surface as `RepositoryError::AlreadyExists`.
#[automock]
#[async_trait]
pub trait PaymentRepository {
    /// Inserts the payment and all of its items, or nothing at all.
    async fn create(&self, payment: PaymentModel) -> RepositoryResult<()>;
    /// `RepositoryError::NotFound` when no payment has this id.
    async fn get_by_id(&self, payment_id: String) -> RepositoryResult<PaymentModel>;
    async fn get_by_order_id(&self, order_id: String) -> RepositoryResult<Vec<PaymentModel>>;
    /// Writes `state` and `updated_at` only.
    async fn update(&self, payment: PaymentModel) -> RepositoryResult<()>;
}
