use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::generation::GenerationError;
use crate::utils::{error_codes, error_to_api_response};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    #[error("Please enter a topic!")]
    MissingTopic,

    #[error("Please provide a Gemini API key to proceed.")]
    MissingCredential,

    #[error("Hook count must be between 1 and {max}")]
    InvalidHookCount { max: u8 },

    #[error("Please fill in all payment fields.")]
    IncompletePayment,

    #[error("Free trial used up. Upgrade to keep generating hooks.")]
    TrialExhausted { payment_link: Option<String> },

    #[error("An error occurred: {0}")]
    Generation(#[from] GenerationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, i32) {
        match self {
            AppError::InvalidPayload(_)
            | AppError::MissingTopic
            | AppError::MissingCredential
            | AppError::InvalidHookCount { .. }
            | AppError::IncompletePayment => {
                (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR)
            }
            AppError::TrialExhausted { .. } => {
                (StatusCode::PAYMENT_REQUIRED, error_codes::TRIAL_EXHAUSTED)
            }
            AppError::Generation(_) => (StatusCode::BAD_GATEWAY, error_codes::GENERATION_FAILED),
            AppError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidPayload(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let msg = match &self {
            // keep database details out of the response
            AppError::Database(e) => {
                tracing::error!("Ledger query failed: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        match self {
            AppError::TrialExhausted { payment_link } => {
                let mut body = error_to_api_response(code, msg);
                body.0.resp_data = Some(serde_json::json!({ "payment_link": payment_link }));
                (status, body).into_response()
            }
            _ => (status, error_to_api_response::<()>(code, msg)).into_response(),
        }
    }
}
