use axum::extract::State;
use axum::Json;
use chrono::Local;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::services::dashboard::{self, MonthlyTrend, UserSummary};
use crate::state::SharedState;

pub async fn summary(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<UserSummary>, AppError> {
    let today = Local::now().date_naive();
    let summary = dashboard::user_summary(state.store.as_ref(), auth.user_id, today).await?;
    Ok(Json(summary))
}

pub async fn monthly(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<MonthlyTrend>, AppError> {
    let today = Local::now().date_naive();
    let trend = dashboard::user_monthly(state.store.as_ref(), auth.user_id, today).await?;
    Ok(Json(trend))
}
