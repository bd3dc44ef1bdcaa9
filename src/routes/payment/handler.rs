use axum::{
    Json,
    extract::{Extension, State},
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use super::model::{PaymentLinkResponse, PaymentRequest, PaymentResponse};
use crate::{
    AppState,
    error::AppError,
    ledger::UsageRecord,
    middleware::ClientIdentity,
    today,
    utils::{ApiResponse, success_to_api_response},
};

/// Simulated checkout: marks the caller as paid without contacting any payment processor.
#[axum::debug_handler]
pub async fn pay(
    State(state): State<AppState>,
    Extension(identity): Extension<ClientIdentity>,
    WithRejection(Json(req), _): WithRejection<Json<PaymentRequest>, AppError>,
) -> Result<Json<ApiResponse<PaymentResponse>>, AppError> {
    if !req.is_complete() {
        return Err(AppError::IncompletePayment);
    }

    let email = req.email.trim();
    let record = UsageRecord::mark_paid(&state.pool, identity.as_str(), email, today()).await?;
    let receipt_id = Uuid::new_v4();

    tracing::info!(identifier = %record.identifier, %receipt_id, "Marked account as paid");

    Ok(success_to_api_response(PaymentResponse {
        receipt_id,
        identifier: record.identifier,
        is_paid: record.is_paid,
        contact_email: record.contact_email,
    }))
}

#[axum::debug_handler]
pub async fn payment_link(State(state): State<AppState>) -> Json<ApiResponse<PaymentLinkResponse>> {
    success_to_api_response(PaymentLinkResponse {
        payment_link: state.config.payment_link_url.clone(),
    })
}
