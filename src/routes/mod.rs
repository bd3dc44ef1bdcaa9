use axum::Json;

use crate::utils::{ApiResponse, success_to_api_response};

pub mod hooks;
pub mod payment;
pub mod trial;

pub async fn health() -> Json<ApiResponse<&'static str>> {
    success_to_api_response("ok")
}
