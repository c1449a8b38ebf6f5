use diesel::prelude::*;

use crate::infrastructure::postgres::schema::payment_items;

#[derive(Debug, Clone, Selectable, Queryable)]
#[diesel(table_name = payment_items)]
pub struct PaymentItemEntity {
    pub id: String,
    pub order_id: String,
    pub payment_id: String,
    pub name: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payment_items)]
pub struct InsertPaymentItemEntity {
    pub id: String,
    pub order_id: String,
    pub payment_id: String,
    pub name: String,
    pub quantity: i32,
}
