use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extract::JsonBody;
use crate::models::UserIdentity;
use crate::services::accounts::{self, TokenSettings};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserIdentity,
}

pub async fn register(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<UserIdentity>), AppError> {
    let user = accounts::register(
        state.store.as_ref(),
        state.config.password_cost,
        req.name.as_deref().unwrap_or_default(),
        req.email.as_deref().unwrap_or_default(),
        req.password.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let session = accounts::login(
        state.store.as_ref(),
        state.config.password_cost,
        TokenSettings {
            secret: &state.config.jwt_secret,
            ttl: state.config.jwt_ttl,
        },
        req.email.as_deref().unwrap_or_default(),
        req.password.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(Json(LoginResponse {
        token: session.token,
        user: session.user,
    }))
}
