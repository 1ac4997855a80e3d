//! Runs against a real database when `DATABASE_URL` is set; otherwise each test is a no-op.

mod common;

use reqwest::StatusCode;
use serde_json::json;

macro_rules! pg_app {
    () => {
        match common::spawn_pg_app().await {
            Some(app) => app,
            None => {
                eprintln!("DATABASE_URL not set, skipping");
                return;
            }
        }
    };
}

#[tokio::test]
async fn register_login_and_profile() {
    let app = pg_app!();

    let token = app.signup("Ann", "ann@x.com").await;
    let (body, status) = app.get_auth("/api/user/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "USER");

    let (_, status) = app.register("Ann", "ann@x.com", "again").await;
    assert_eq!(status, StatusCode::CONFLICT);

    common::cleanup(app).await;
}

#[tokio::test]
async fn expense_lifecycle() {
    let app = pg_app!();
    let token = app.signup("Ann", "ann@x.com").await;
    let food = app.category_id(&token, "Food").await;
    let bills = app.category_id(&token, "Bills").await;

    let created = app.create_expense(&token, &food, json!("12.50"), "2024-03-15").await;
    assert_eq!(created["amount"], json!(12.5));
    assert_eq!(created["categoryName"], "Food");
    let path = format!("/api/user/expenses/{}", created["id"].as_str().unwrap());

    let (updated, status) = app
        .put_auth(
            &path,
            &token,
            &json!({ "categoryId": bills, "description": "power" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["categoryName"], "Bills");
    assert_eq!(updated["description"], "power");
    assert_eq!(updated["amount"], json!(12.5));

    let (cleared, status) = app
        .put_auth(&path, &token, &json!({ "description": null }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["description"].is_null());
    assert_eq!(cleared["categoryName"], "Bills");

    let (_, status) = app.delete_auth(&path, &token).await;
    assert_eq!(status, StatusCode::OK);
    let (_, status) = app.get_auth(&path, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}

#[tokio::test]
async fn amounts_outside_column_range_rejected() {
    let app = pg_app!();
    let token = app.signup("Ann", "ann@x.com").await;
    let food = app.category_id(&token, "Food").await;

    let (body, status) = app
        .post_auth(
            "/api/user/expenses",
            &token,
            &json!({ "categoryId": food, "amount": 10000000000u64, "date": "2024-03-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let largest = app
        .create_expense(&token, &food, json!("9999999999.99"), "2024-03-01")
        .await;
    assert!(largest["amount"].as_f64().unwrap() > 9_999_999_999.0);

    let path = format!("/api/user/expenses/{}", largest["id"].as_str().unwrap());
    let (_, status) = app
        .put_auth(&path, &token, &json!({ "amount": "12345678901.5" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}

#[tokio::test]
async fn category_constraints() {
    let app = pg_app!();
    let token = app.signup("Ann", "ann@x.com").await;
    let food = app.category_id(&token, "Food").await;
    app.create_expense(&token, &food, json!(3), "2024-03-15").await;
    app.create_expense(&token, &food, json!(4), "2024-03-16").await;

    let (body, status) = app
        .delete_auth(&format!("/api/categories/{food}"), &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("2 expense(s)"));

    let (_, status) = app
        .post_auth("/api/categories", &token, &json!({ "name": "Food" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    common::cleanup(app).await;
}

#[tokio::test]
async fn reports_aggregate_in_sql() {
    let app = pg_app!();
    let ann = app.signup("Ann", "ann@x.com").await;
    let bob = app.signup("Bob", "bob@x.com").await;
    let food = app.category_id(&ann, "Food").await;

    app.create_expense(&ann, &food, json!("0.10"), "2024-03-15").await;
    app.create_expense(&ann, &food, json!("0.20"), "2024-03-16").await;
    app.create_expense(&bob, &food, json!(5), "2024-03-16").await;

    let (summary, status) = app.get_auth("/api/dashboard/summary", &ann).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalExpense"], json!(0.3));
    assert_eq!(summary["categoryBreakdown"][0]["name"], "Food");
    assert_eq!(summary["categoryBreakdown"][0]["total"], json!(0.3));

    let (monthly, status) = app.get_auth("/api/dashboard/monthly", &ann).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(monthly["months"].as_array().unwrap().len(), 6);

    let admin = app.admin_token().await;
    let (admin_summary, status) = app.get_auth("/api/admin/summary", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(admin_summary["totalTransactions"], 3);
    assert_eq!(admin_summary["totalExpenses"], json!(5.3));

    common::cleanup(app).await;
}
