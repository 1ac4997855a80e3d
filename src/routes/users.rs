use axum::extract::State;
use axum::Json;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::models::User;
use crate::services::accounts;
use crate::state::SharedState;

pub async fn me(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<User>, AppError> {
    let user = accounts::profile(state.store.as_ref(), auth.user_id).await?;
    Ok(Json(user))
}
