use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde::Deserialize;
use tracing::info;

use crate::{
    application::usecases::{get_payments::GetPaymentsUseCase, payment_webhook::PaymentWebhookUseCase},
    domain::{errors::PaymentError, value_objects::payments::UpdatePaymentModel},
};

#[derive(Clone)]
pub struct PaymentsState {
    pub payment_webhook_usecase: Arc<PaymentWebhookUseCase>,
    pub get_payments_usecase: Arc<GetPaymentsUseCase>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookQuery {
    #[serde(default)]
    pub resend: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub approved: bool,
}

pub fn routes(state: PaymentsState) -> Router {
    Router::new()
        .route("/webhook/:payment_id", patch(payment_webhook))
        .route("/order/:order_id", get(get_payments_by_order_id))
        .route("/:payment_id", get(get_payment_by_id))
        .with_state(state)
}

pub async fn payment_webhook(
    State(state): State<PaymentsState>,
    Path(payment_id): Path<String>,
    Query(query): Query<WebhookQuery>,
    Json(body): Json<WebhookBody>,
) -> Result<Response, PaymentError> {
    info!(
        %payment_id,
        approved = body.approved,
        resend = query.resend,
        "payments router: webhook received"
    );

    let payment = state
        .payment_webhook_usecase
        .handle(UpdatePaymentModel {
            payment_id,
            approved: body.approved,
            resend: query.resend,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(payment)).into_response())
}

pub async fn get_payment_by_id(
    State(state): State<PaymentsState>,
    Path(payment_id): Path<String>,
) -> Result<Response, PaymentError> {
    let payment = state.get_payments_usecase.get_by_id(payment_id).await?;
    Ok((StatusCode::OK, Json(payment)).into_response())
}

pub async fn get_payments_by_order_id(
    State(state): State<PaymentsState>,
    Path(order_id): Path<String>,
) -> Result<Response, PaymentError> {
    let payments = state.get_payments_usecase.get_by_order_id(order_id).await?;
    if payments.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok((StatusCode::OK, Json(payments)).into_response())
}
