pub mod payment_items;
pub mod payments;
