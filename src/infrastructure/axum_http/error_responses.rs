use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::domain::errors::PaymentError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if self.is_business() {
            self.to_string()
        } else {
            error!(error = ?self, "http: request failed with internal error");
            "Internal server error".to_string()
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}
