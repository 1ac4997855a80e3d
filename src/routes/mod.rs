pub mod admin;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod expenses;
pub mod users;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::SharedState;

/// Routes mounted under `/api`.
pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // Current user
        .route("/user/me", get(users::me))
        .route(
            "/user/expenses",
            get(expenses::list).post(expenses::create),
        )
        .route(
            "/user/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route(
            "/user/categories",
            get(categories::list).post(categories::create),
        )
        // Expenses (same handlers under the paths the web client calls)
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/categories", get(categories::list))
        .route(
            "/expenses/{id}",
            put(expenses::update).delete(expenses::delete),
        )
        // Categories
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route("/categories/{id}", axum::routing::delete(categories::delete))
        // Dashboard
        .route("/dashboard/summary", get(dashboard::summary))
        .route("/dashboard/monthly", get(dashboard::monthly))
        // Admin
        .route("/admin/users", get(admin::list_users))
        .route("/admin/expenses", get(admin::list_expenses))
        .route("/admin/summary", get(admin::summary))
        .route("/admin/categories", get(admin::categories))
}
