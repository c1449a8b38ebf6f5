use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::infrastructure::postgres::schema::payments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments, primary_key(payment_id))]
pub struct PaymentEntity {
    pub payment_id: String,
    pub order_id: String,
    pub total_items: i32,
    pub amount: Decimal,
    pub state: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub payment_id: String,
    pub order_id: String,
    pub total_items: i32,
    pub amount: Decimal,
    pub state: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Items are immutable after creation, so only state and the timestamp are ever written back.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = payments)]
pub struct UpdatePaymentStateEntity {
    pub state: i32,
    pub updated_at: DateTime<Utc>,
}
