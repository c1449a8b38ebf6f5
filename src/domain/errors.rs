use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::value_objects::enums::payment_states::PaymentState;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("request not valid: {0}")]
    RequestNotValid(String),
    #[error("payment already exists")]
    PaymentAlreadyExists,
    #[error("payment already in a final state")]
    PaymentAlreadyInState,
    #[error("payment not found")]
    PaymentNotFound,
    #[error("cannot move payment from {from} to {to}")]
    InvalidStateTransition { from: PaymentState, to: PaymentState },
    #[error("topic not found: {0}")]
    TopicNotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PaymentError::RequestNotValid(_) => StatusCode::BAD_REQUEST,
            PaymentError::PaymentAlreadyExists
            | PaymentError::PaymentAlreadyInState
            | PaymentError::InvalidStateTransition { .. } => StatusCode::CONFLICT,
            PaymentError::PaymentNotFound | PaymentError::TopicNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Validation and business-rule errors; everything else is infrastructure.
    pub fn is_business(&self) -> bool {
        !matches!(self, PaymentError::Internal(_))
    }
}

impl From<RepositoryError> for PaymentError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => PaymentError::PaymentNotFound,
            RepositoryError::AlreadyExists => PaymentError::PaymentAlreadyExists,
            RepositoryError::Internal(err) => PaymentError::Internal(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    AlreadyExists,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type PaymentResult<T> = std::result::Result<T, PaymentError>;
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;
