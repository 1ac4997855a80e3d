use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `axum::Json` whose rejection renders as an [`AppError`] body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Path` whose rejection renders as an [`AppError`] body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct IdPath<T>(pub T);

/// An id that does not even parse cannot name an existing row.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Path rejected: {}", rejection.body_text());
        AppError::NotFound("Resource not found".to_string())
    }
}
