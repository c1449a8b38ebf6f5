use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    errors::{RepositoryError, RepositoryResult},
    repositories::payments::PaymentRepository,
    value_objects::payments::PaymentModel,
};

/// Process-local payment store keyed by `payment_id`.
///
/// Holds the same contract as the Postgres store: inserts are unique per `payment_id`,
/// lookups of unknown ids are `NotFound` and updates only touch `state` and `updated_at`.
#[derive(Default, Clone)]
pub struct PaymentInMemory {
    payments: Arc<RwLock<HashMap<String, PaymentModel>>>,
}

impl PaymentInMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for PaymentInMemory {
    async fn create(&self, payment: PaymentModel) -> RepositoryResult<()> {
        let mut payments = self.payments.write().await;
        if payments.contains_key(&payment.payment_id) {
            return Err(RepositoryError::AlreadyExists);
        }
        payments.insert(payment.payment_id.clone(), payment);
        Ok(())
    }

    async fn get_by_id(&self, payment_id: String) -> RepositoryResult<PaymentModel> {
        let payments = self.payments.read().await;
        payments
            .get(&payment_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_order_id(&self, order_id: String) -> RepositoryResult<Vec<PaymentModel>> {
        let payments = self.payments.read().await;
        let mut found: Vec<PaymentModel> = payments
            .values()
            .filter(|payment| payment.order_id == order_id)
            .cloned()
            .collect();
        found.sort_by_key(|payment| payment.created_at);
        Ok(found)
    }

    async fn update(&self, payment: PaymentModel) -> RepositoryResult<()> {
        let mut payments = self.payments.write().await;
        let stored = payments
            .get_mut(&payment.payment_id)
            .ok_or(RepositoryError::NotFound)?;

        *stored = PaymentModel::with_state(
            stored.order_id.clone(),
            stored.payment_id.clone(),
            stored.items.clone(),
            stored.total_items,
            stored.amount,
            payment.state(),
            stored.created_at,
            payment.updated_at,
        );
        Ok(())
    }
}
