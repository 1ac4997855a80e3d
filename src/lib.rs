pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppError;
use crate::state::{AppState, SharedState};
use crate::store::Store;

pub fn build_app(store: Arc<dyn Store>, config: Config) -> Router {
    let max_body_size = config.max_body_size;
    let state: SharedState = Arc::new(AppState { store, config });

    Router::new()
        .nest("/api", routes::api_routes())
        .route("/health", axum::routing::get(health))
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

/// One-time startup work: default categories and the optional bootstrap admin.
pub async fn initialize(store: &dyn Store, config: &Config) -> Result<(), AppError> {
    services::categories::seed_defaults(store).await?;

    if let Some(admin) = &config.admin {
        services::accounts::ensure_admin(store, config.password_cost, admin).await?;
    }

    Ok(())
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(json!({ "status": "ok" }))
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}
