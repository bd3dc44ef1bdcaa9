use axum::{
    Json,
    extract::{Extension, State},
};
use axum_extra::extract::WithRejection;

use super::model::{GenerateHooksRequest, GenerateHooksResponse};
use crate::{
    AppState,
    error::AppError,
    ledger::{GateDecision, UsageRecord, evaluate},
    middleware::ClientIdentity,
    prompt::compose_prompt,
    today,
    utils::{ApiResponse, success_to_api_response},
};

/// Gate check, increment and the upstream call run in that order. None of it is atomic.
#[axum::debug_handler]
pub async fn generate(
    State(state): State<AppState>,
    Extension(identity): Extension<ClientIdentity>,
    WithRejection(Json(req), _): WithRejection<Json<GenerateHooksRequest>, AppError>,
) -> Result<Json<ApiResponse<GenerateHooksResponse>>, AppError> {
    let identifier = identity.as_str();

    // input checks run before any ledger write
    let api_key = state
        .config
        .resolve_api_key(req.api_key.as_deref())
        .ok_or(AppError::MissingCredential)?
        .to_string();
    let hook_request = req.to_hook_request()?;

    let policy = state.config.trial_policy;
    let mut record = UsageRecord::reconcile(&state.pool, identifier, &policy, today()).await?;

    if evaluate(&record, &policy) == GateDecision::Blocked {
        tracing::info!(identifier, usage_count = record.usage_count, "Trial exhausted");
        return Err(AppError::TrialExhausted {
            payment_link: state.config.payment_link_url.clone(),
        });
    }

    let charge_up_front = !record.is_paid && state.config.charge_failed_generations;
    if charge_up_front {
        record = UsageRecord::increment(&state.pool, identifier, today()).await?;
    }

    let prompt = compose_prompt(&hook_request);
    let hooks = match state.generator.generate(&api_key, &prompt).await {
        Ok(hooks) => hooks,
        Err(e) => {
            tracing::warn!(identifier, charged = charge_up_front, "Generation failed: {}", e);
            return Err(e.into());
        }
    };

    if !record.is_paid && !charge_up_front {
        record = UsageRecord::increment(&state.pool, identifier, today()).await?;
    }

    tracing::info!(
        identifier,
        usage_count = record.usage_count,
        topic = %hook_request.topic,
        "Generated hooks"
    );

    Ok(success_to_api_response(GenerateHooksResponse {
        hooks,
        usage_count: record.usage_count,
        is_paid: record.is_paid,
        remaining_uses: evaluate(&record, &policy).remaining_uses(),
    }))
}
