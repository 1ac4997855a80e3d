use axum::extract::State;
use axum::Json;

use crate::auth::extractor::AdminUser;
use crate::error::AppError;
use crate::models::{AdminExpenseView, User};
use crate::services::dashboard::{self, AdminSummary, CategoryBreakdown};
use crate::state::SharedState;

pub async fn list_users(
    _admin: AdminUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = state.store.list_users().await?;
    Ok(Json(users))
}

pub async fn list_expenses(
    _admin: AdminUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<AdminExpenseView>>, AppError> {
    let expenses = state.store.list_all_expenses().await?;
    Ok(Json(expenses))
}

pub async fn summary(
    _admin: AdminUser,
    State(state): State<SharedState>,
) -> Result<Json<AdminSummary>, AppError> {
    let summary = dashboard::admin_summary(state.store.as_ref()).await?;
    Ok(Json(summary))
}

pub async fn categories(
    _admin: AdminUser,
    State(state): State<SharedState>,
) -> Result<Json<CategoryBreakdown>, AppError> {
    let breakdown = dashboard::admin_categories(state.store.as_ref()).await?;
    Ok(Json(breakdown))
}
