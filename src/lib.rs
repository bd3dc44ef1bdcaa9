use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use config::Config;
use generation::TextGenerator;
use sqlx::SqlitePool;

pub mod config;
pub mod database;
pub mod error;
pub mod generation;
pub mod ledger;
pub mod middleware;
pub mod prompt;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub generator: Arc<dyn TextGenerator>,
}

/// Calendar date used for ledger bookkeeping.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(routes::health))
        .route("/trial/status", get(routes::trial::status))
        .route("/hooks/generate", post(routes::hooks::generate))
        .route("/payments", post(routes::payment::pay))
        .route("/payments/link", get(routes::payment::payment_link))
        // every route needs a visitor identity
        .layer(axum::middleware::from_fn(middleware::identify_client));

    let base = state.config.api_base_uri.trim_matches('/');
    let router = if base.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&format!("/{base}"), api)
    };

    let router = router.layer(axum::middleware::from_fn(middleware::log_errors));

    // permissive CORS in debug builds only
    #[cfg(debug_assertions)]
    let router = router.layer(tower_http::cors::CorsLayer::permissive());

    router.with_state(state)
}
