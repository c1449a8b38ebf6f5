use std::{collections::HashMap, sync::Arc};

use anyhow::anyhow;
use async_trait::async_trait;
use diesel::{
    RunQueryDsl, insert_into,
    prelude::*,
    r2d2::{ConnectionManager, PooledConnection},
    result::{DatabaseErrorKind, Error as DieselError},
    update,
};
use tokio::task;

use crate::{
    domain::{
        entities::{payment_items::PaymentItemEntity, payments::PaymentEntity},
        errors::{RepositoryError, RepositoryResult},
        repositories::payments::PaymentRepository,
        value_objects::payments::PaymentModel,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{payment_items, payments},
    },
};

/// Only this constraint identifies an existing payment; other unique violations are faults.
const PAYMENTS_PRIMARY_KEY: &str = "payments_pkey";

type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    /// Diesel is synchronous, so each call runs on the blocking threadpool with its own
    /// pooled connection.
    async fn run_blocking<T, F>(&self, work: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgPooledConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let db_pool = Arc::clone(&self.db_pool);

        task::spawn_blocking(move || {
            let mut conn = db_pool.get().map_err(|err| {
                RepositoryError::Internal(anyhow!(err).context("postgres pool exhausted"))
            })?;
            work(&mut conn)
        })
        .await
        .map_err(|err| RepositoryError::Internal(anyhow!(err).context("postgres task failed")))?
    }
}

fn map_diesel_error(err: DieselError) -> RepositoryError {
    match err {
        DieselError::NotFound => RepositoryError::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if info.constraint_name() == Some(PAYMENTS_PRIMARY_KEY) =>
        {
            RepositoryError::AlreadyExists
        }
        other => RepositoryError::Internal(other.into()),
    }
}

fn into_model(
    entity: PaymentEntity,
    items: Vec<PaymentItemEntity>,
) -> RepositoryResult<PaymentModel> {
    PaymentModel::from_entities(entity, items).map_err(RepositoryError::Internal)
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn create(&self, payment: PaymentModel) -> RepositoryResult<()> {
        let payment_entity = payment.to_insert_entity();
        let item_entities = payment.to_insert_item_entities();

        self.run_blocking(move |conn| {
            conn.transaction::<(), DieselError, _>(|tx| {
                insert_into(payments::table)
                    .values(&payment_entity)
                    .execute(tx)?;

                insert_into(payment_items::table)
                    .values(&item_entities)
                    .execute(tx)?;

                Ok(())
            })
            .map_err(map_diesel_error)
        })
        .await
    }

    async fn get_by_id(&self, payment_id: String) -> RepositoryResult<PaymentModel> {
        let (entity, items) = self
            .run_blocking(move |conn| {
                conn.transaction::<_, DieselError, _>(|tx| {
                    let entity = payments::table
                        .find(&payment_id)
                        .select(PaymentEntity::as_select())
                        .first::<PaymentEntity>(tx)?;

                    let items = payment_items::table
                        .filter(payment_items::payment_id.eq(&payment_id))
                        .select(PaymentItemEntity::as_select())
                        .order(payment_items::id.asc())
                        .load::<PaymentItemEntity>(tx)?;

                    Ok((entity, items))
                })
                .map_err(map_diesel_error)
            })
            .await?;

        into_model(entity, items)
    }

    async fn get_by_order_id(&self, order_id: String) -> RepositoryResult<Vec<PaymentModel>> {
        let (entities, items) = self
            .run_blocking(move |conn| {
                conn.transaction::<_, DieselError, _>(|tx| {
                    let entities = payments::table
                        .filter(payments::order_id.eq(&order_id))
                        .select(PaymentEntity::as_select())
                        .order(payments::created_at.asc())
                        .load::<PaymentEntity>(tx)?;

                    let payment_ids: Vec<String> = entities
                        .iter()
                        .map(|entity| entity.payment_id.clone())
                        .collect();

                    let items = payment_items::table
                        .filter(payment_items::payment_id.eq_any(payment_ids))
                        .select(PaymentItemEntity::as_select())
                        .order(payment_items::id.asc())
                        .load::<PaymentItemEntity>(tx)?;

                    Ok((entities, items))
                })
                .map_err(map_diesel_error)
            })
            .await?;

        let mut items_by_payment: HashMap<String, Vec<PaymentItemEntity>> = HashMap::new();
        for item in items {
            items_by_payment
                .entry(item.payment_id.clone())
                .or_default()
                .push(item);
        }

        entities
            .into_iter()
            .map(|entity| {
                let items = items_by_payment
                    .remove(&entity.payment_id)
                    .unwrap_or_default();
                into_model(entity, items)
            })
            .collect()
    }

    async fn update(&self, payment: PaymentModel) -> RepositoryResult<()> {
        let payment_id = payment.payment_id.clone();
        let changeset = payment.to_state_changeset();

        let affected = self
            .run_blocking(move |conn| {
                update(payments::table)
                    .filter(payments::payment_id.eq(&payment_id))
                    .set(&changeset)
                    .execute(conn)
                    .map_err(map_diesel_error)
            })
            .await?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
