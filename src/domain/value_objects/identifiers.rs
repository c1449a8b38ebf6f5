use crate::domain::errors::{PaymentError, PaymentResult};

pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Opaque identifiers: 1..=64 ASCII letters, digits, `-` or `_`. Covers canonical UUIDs.
pub fn is_well_formed_identifier(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_IDENTIFIER_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

pub fn ensure_identifier(field: &str, value: &str) -> PaymentResult<()> {
    if is_well_formed_identifier(value) {
        Ok(())
    } else {
        Err(PaymentError::RequestNotValid(format!(
            "{field} must be a well-formed identifier"
        )))
    }
}
