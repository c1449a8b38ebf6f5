use serde::{Deserialize, Serialize};

use crate::domain::value_objects::payments::PaymentModel;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderProductionItemContract {
    pub id: String,
    pub name: String,
    pub quantity: i32,
}

/// Sent to the order-production topic once a payment is approved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderProductionContract {
    pub order_id: String,
    pub items: Vec<OrderProductionItemContract>,
}

impl From<&PaymentModel> for OrderProductionContract {
    fn from(payment: &PaymentModel) -> Self {
        Self {
            order_id: payment.order_id.clone(),
            items: payment
                .items
                .iter()
                .map(|item| OrderProductionItemContract {
                    id: item.id.clone(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderUpdatePaymentContract {
    pub id: String,
    pub state: String,
}

/// Sent to the update-order topic after every webhook outcome and on resend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderUpdateContract {
    pub order_id: String,
    pub payment: OrderUpdatePaymentContract,
}

impl From<&PaymentModel> for OrderUpdateContract {
    fn from(payment: &PaymentModel) -> Self {
        Self {
            order_id: payment.order_id.clone(),
            payment: OrderUpdatePaymentContract {
                id: payment.payment_id.clone(),
                state: payment.state().title().to_string(),
            },
        }
    }
}
