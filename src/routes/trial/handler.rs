use axum::{
    Json,
    extract::{Extension, State},
};

use super::model::TrialStatusResponse;
use crate::{
    AppState,
    error::AppError,
    ledger::UsageRecord,
    middleware::ClientIdentity,
    today,
    utils::{ApiResponse, success_to_api_response},
};

#[axum::debug_handler]
pub async fn status(
    State(state): State<AppState>,
    Extension(identity): Extension<ClientIdentity>,
) -> Result<Json<ApiResponse<TrialStatusResponse>>, AppError> {
    let policy = state.config.trial_policy;
    let record = UsageRecord::reconcile(&state.pool, identity.as_str(), &policy, today()).await?;

    Ok(success_to_api_response(TrialStatusResponse::new(
        record,
        &policy,
        state.config.payment_link_url.clone(),
    )))
}
