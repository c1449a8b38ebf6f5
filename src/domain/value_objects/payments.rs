use std::collections::HashSet;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{
        payment_items::{InsertPaymentItemEntity, PaymentItemEntity},
        payments::{InsertPaymentEntity, PaymentEntity, UpdatePaymentStateEntity},
    },
    errors::{PaymentError, PaymentResult},
    value_objects::{enums::payment_states::PaymentState, identifiers::ensure_identifier},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentItemModel {
    pub id: String,
    pub name: String,
    pub quantity: i32,
}

impl PaymentItemModel {
    pub fn validate(&self) -> PaymentResult<()> {
        ensure_identifier("items.id", &self.id)?;
        if self.name.trim().is_empty() {
            return Err(PaymentError::RequestNotValid(
                "items.name is required".to_string(),
            ));
        }
        if self.quantity < 1 {
            return Err(PaymentError::RequestNotValid(
                "items.quantity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A payment and its line items. `state_title` is only ever derived from `state`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentModel {
    pub order_id: String,
    pub payment_id: String,
    pub items: Vec<PaymentItemModel>,
    pub total_items: i32,
    pub amount: Decimal,
    state: PaymentState,
    state_title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentModel {
    pub fn new(
        order_id: String,
        payment_id: String,
        items: Vec<PaymentItemModel>,
        total_items: i32,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        Self::with_state(
            order_id,
            payment_id,
            items,
            total_items,
            amount,
            PaymentState::WaitingForApproval,
            now,
            now,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_state(
        order_id: String,
        payment_id: String,
        items: Vec<PaymentItemModel>,
        total_items: i32,
        amount: Decimal,
        state: PaymentState,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id,
            payment_id,
            items,
            total_items,
            amount,
            state,
            state_title: state.title().to_string(),
            created_at,
            updated_at,
        }
    }

    pub fn state(&self) -> PaymentState {
        self.state
    }

    pub fn state_title(&self) -> &str {
        &self.state_title
    }

    pub fn exists(&self) -> bool {
        !self.order_id.is_empty() && !self.payment_id.is_empty()
    }

    pub fn is_in_state(&self, states: &[PaymentState]) -> bool {
        states.contains(&self.state)
    }

    pub fn update_state(&mut self, new_state: PaymentState, now: DateTime<Utc>) -> PaymentResult<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(PaymentError::InvalidStateTransition {
                from: self.state,
                to: new_state,
            });
        }

        self.state = new_state;
        self.state_title = new_state.title().to_string();
        self.updated_at = now;
        Ok(())
    }

    pub fn from_entities(entity: PaymentEntity, items: Vec<PaymentItemEntity>) -> Result<Self> {
        let state = PaymentState::from_code(entity.state).ok_or_else(|| {
            anyhow!(
                "payment {} has unknown state code {} ({})",
                entity.payment_id,
                entity.state,
                PaymentState::title_for_code(entity.state)
            )
        })?;

        Ok(Self::with_state(
            entity.order_id,
            entity.payment_id,
            items
                .into_iter()
                .map(|item| PaymentItemModel {
                    id: item.id,
                    name: item.name,
                    quantity: item.quantity,
                })
                .collect(),
            entity.total_items,
            entity.amount,
            state,
            entity.created_at,
            entity.updated_at,
        ))
    }

    pub fn to_insert_entity(&self) -> InsertPaymentEntity {
        InsertPaymentEntity {
            payment_id: self.payment_id.clone(),
            order_id: self.order_id.clone(),
            total_items: self.total_items,
            amount: self.amount,
            state: self.state.code(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn to_insert_item_entities(&self) -> Vec<InsertPaymentItemEntity> {
        self.items
            .iter()
            .map(|item| InsertPaymentItemEntity {
                id: item.id.clone(),
                order_id: self.order_id.clone(),
                payment_id: self.payment_id.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
            })
            .collect()
    }

    pub fn to_state_changeset(&self) -> UpdatePaymentStateEntity {
        UpdatePaymentStateEntity {
            state: self.state.code(),
            updated_at: self.updated_at,
        }
    }
}

/// Decimal places kept by the `amount NUMERIC(12, 2)` column.
const AMOUNT_SCALE: u32 = 2;

/// Amounts must stay below 10^10 to fit `NUMERIC(12, 2)`.
const AMOUNT_INTEGER_DIGITS: u32 = 10;

fn ensure_amount(amount: Decimal) -> PaymentResult<()> {
    if amount <= Decimal::ZERO {
        return Err(PaymentError::RequestNotValid(
            "amount must be greater than zero".to_string(),
        ));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(PaymentError::RequestNotValid(format!(
            "amount must have at most {AMOUNT_SCALE} decimal places"
        )));
    }
    if amount >= Decimal::from(10_i64.pow(AMOUNT_INTEGER_DIGITS)) {
        return Err(PaymentError::RequestNotValid(format!(
            "amount must be below 10^{AMOUNT_INTEGER_DIGITS}"
        )));
    }
    Ok(())
}

/// Inner payload of a queued payment-creation notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePaymentModel {
    pub order_id: String,
    pub payment_id: String,
    #[serde(default)]
    pub items: Vec<PaymentItemModel>,
    #[serde(default)]
    pub total_items: i32,
    #[serde(default)]
    pub amount: Decimal,
}

impl CreatePaymentModel {
    pub fn validate(&self) -> PaymentResult<()> {
        ensure_identifier("order_id", &self.order_id)?;
        ensure_identifier("payment_id", &self.payment_id)?;

        if self.items.is_empty() {
            return Err(PaymentError::RequestNotValid(
                "items must not be empty".to_string(),
            ));
        }
        let mut item_ids = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            item.validate()?;
            if !item_ids.insert(item.id.as_str()) {
                return Err(PaymentError::RequestNotValid(format!(
                    "items.id {} is repeated",
                    item.id
                )));
            }
        }

        if self.total_items < 1 {
            return Err(PaymentError::RequestNotValid(
                "total_items must be at least 1".to_string(),
            ));
        }
        ensure_amount(self.amount)
    }

    pub fn to_model(&self, now: DateTime<Utc>) -> PaymentModel {
        PaymentModel::new(
            self.order_id.clone(),
            self.payment_id.clone(),
            self.items.clone(),
            self.total_items,
            self.amount,
            now,
        )
    }
}

/// Webhook outcome for a payment: path id, `resend` query flag and `approved` body flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePaymentModel {
    pub payment_id: String,
    pub approved: bool,
    pub resend: bool,
}

impl UpdatePaymentModel {
    pub fn validate(&self) -> PaymentResult<()> {
        ensure_identifier("payment_id", &self.payment_id)
    }

    pub fn target_state(&self) -> PaymentState {
        if self.approved {
            PaymentState::Approved
        } else {
            PaymentState::Rejected
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayPaymentModel {
    pub payment_id: String,
    pub amount: Decimal,
}

impl GatewayPaymentModel {
    pub fn validate(&self) -> PaymentResult<()> {
        ensure_identifier("payment_id", &self.payment_id)?;
        ensure_amount(self.amount)
    }
}

impl From<&PaymentModel> for GatewayPaymentModel {
    fn from(value: &PaymentModel) -> Self {
        Self {
            payment_id: value.payment_id.clone(),
            amount: value.amount,
        }
    }
}
