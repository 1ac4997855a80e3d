use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::extract::{IdPath, JsonBody};
use crate::models::Category;
use crate::services::categories;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = categories::list(state.store.as_ref()).await?;
    Ok(Json(categories))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<CreateCategory>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = categories::create(
        state.store.as_ref(),
        &auth,
        req.name.as_deref(),
        req.description.as_deref(),
    )
    .await?;

    tracing::info!(category_id = %category.id, user_id = %auth.user_id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    IdPath(id): IdPath<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    categories::delete(state.store.as_ref(), &auth, id).await?;

    tracing::info!(category_id = %id, user_id = %auth.user_id, "Category deleted");
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
