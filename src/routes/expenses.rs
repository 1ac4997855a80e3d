use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::extract::{IdPath, JsonBody};
use crate::models::ExpenseView;
use crate::services::expenses::{self, ExpensePayload};
use crate::state::SharedState;

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<ExpenseView>>, AppError> {
    let expenses = expenses::list(state.store.as_ref(), auth.user_id).await?;
    Ok(Json(expenses))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<ExpensePayload>,
) -> Result<(StatusCode, Json<ExpenseView>), AppError> {
    let expense = expenses::create(state.store.as_ref(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    IdPath(id): IdPath<Uuid>,
) -> Result<Json<ExpenseView>, AppError> {
    let expense = expenses::get(state.store.as_ref(), auth.user_id, id).await?;
    Ok(Json(expense))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    IdPath(id): IdPath<Uuid>,
    JsonBody(req): JsonBody<ExpensePayload>,
) -> Result<Json<ExpenseView>, AppError> {
    let expense = expenses::update(state.store.as_ref(), auth.user_id, id, req).await?;
    Ok(Json(expense))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    IdPath(id): IdPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    expenses::delete(state.store.as_ref(), auth.user_id, id).await?;
    Ok(Json(json!({ "message": "Expense deleted" })))
}
