#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use expense_tracker::auth::password::PasswordCost;
use expense_tracker::config::{AdminBootstrap, Config};
use expense_tracker::store::{MemoryStore, PgStore, Store};

pub const ADMIN_EMAIL: &str = "admin@test.com";
pub const ADMIN_PASSWORD: &str = "password123";
pub const JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough";

/// Temporary database backing a Postgres-flavoured test app.
pub struct TestDb {
    pub pool: PgPool,
    pub name: String,
}

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<dyn Store>,
    pub db: Option<TestDb>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("register request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Register a user and return a bearer token for them.
    pub async fn signup(&self, name: &str, email: &str) -> String {
        let (body, status) = self.register(name, email, "password123").await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        let (body, status) = self.login(email, "password123").await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Token for the bootstrap administrator.
    pub async fn admin_token(&self) -> String {
        let (body, status) = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Look up a category id by name through the API.
    pub async fn category_id(&self, token: &str, name: &str) -> String {
        let (body, status) = self.get_auth("/api/categories", token).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array()
            .unwrap()
            .iter()
            .find(|c| c["name"] == name)
            .unwrap_or_else(|| panic!("category {name} not found in {body}"))["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Create an expense, return the expense JSON.
    pub async fn create_expense(
        &self,
        token: &str,
        category_id: &str,
        amount: Value,
        date: &str,
    ) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/user/expenses",
                token,
                &json!({ "categoryId": category_id, "amount": amount, "date": date }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create expense failed: {body}");
        body
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated POST request with JSON body.
    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated PUT request with JSON body.
    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated DELETE request.
    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

fn test_config(database_url: String) -> Config {
    Config {
        database_url,
        database_max_connections: 5,
        jwt_secret: JWT_SECRET.to_string(),
        jwt_ttl: chrono::Duration::hours(1),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 1_048_576,
        // Minimum argon2 cost keeps the suite fast.
        password_cost: PasswordCost {
            memory_kib: 8,
            iterations: 1,
        },
        log_level: "warn".to_string(),
        admin: Some(AdminBootstrap {
            name: "Admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        }),
    }
}

async fn serve(store: Arc<dyn Store>, config: Config, db: Option<TestDb>) -> TestApp {
    expense_tracker::initialize(store.as_ref(), &config)
        .await
        .expect("Failed to initialize store");

    let app = expense_tracker::build_app(store.clone(), config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        store,
        db,
    }
}

/// Spawn a test app backed by an in-memory store.
pub async fn spawn_app() -> TestApp {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    serve(store, test_config("memory".to_string()), None).await
}

fn database_url_for(base_url: &str, db_name: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Spawn a test app with a fresh temporary Postgres database, or `None` when
/// `DATABASE_URL` is not configured.
pub async fn spawn_pg_app() -> Option<TestApp> {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").ok()?;

    // Create a unique test database
    let db_name = format!(
        "expense_tracker_test_{}",
        Uuid::now_v7().to_string().replace('-', "")
    );

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url_for(&base_url, "postgres"))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = database_url_for(&base_url, &db_name);
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool.clone()));
    let db = TestDb {
        pool,
        name: db_name,
    };
    Some(serve(store, test_config(test_url), Some(db)).await)
}

/// Drop the temporary database, if the app had one.
pub async fn cleanup(app: TestApp) {
    let Some(db) = app.db else {
        return;
    };
    db.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url_for(&base_url, "postgres"))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!(
        "DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)",
        db.name
    ))
    .execute(&admin_pool)
    .await;

    admin_pool.close().await;
}
