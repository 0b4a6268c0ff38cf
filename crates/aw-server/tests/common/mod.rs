//! Shared helpers for the HTTP integration tests
//!
//! The router is built exactly as in production. Tests that never reach a
//! handler's SQL use a lazy pool, so no database is needed to run them.
//!
//! Building the mediator blocks in place, so every test that builds a router
//! runs on the multi-threaded runtime:
//!
//! ```rust,ignore
//! #[tokio::test(flavor = "multi_thread")]
//! ```

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

use aw_server::api::{create_router, AppState};
use aw_server::auth::JwtConfig;
use aw_server::config::Config;
use aw_server::db::run_migrations;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub fn jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET.as_bytes(), None, None)
}

/// Pool that never connects until a query runs, and then fails fast
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("postgres://aw:aw@127.0.0.1:1/adventureworks")
        .unwrap()
}

/// Fresh, migrated database on the server named by `DATABASE_URL`
pub async fn fresh_database() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let admin = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("connect to DATABASE_URL");

    let name = format!("aw_test_{}", Uuid::new_v4().simple());
    sqlx::query(&format!("CREATE DATABASE {name}"))
        .execute(&admin)
        .await
        .expect("create test database");
    admin.close().await;

    let options = PgConnectOptions::from_str(&url)
        .expect("parse DATABASE_URL")
        .database(&name);
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("connect to test database");
    run_migrations(&pool).await.expect("run migrations");
    pool
}

pub fn app_with_pool(pool: PgPool) -> Router {
    let mut config = Config::default();
    config.auth.jwt_secret = TEST_SECRET.to_string();
    create_router(AppState::new(pool, jwt_config()), &config)
}

pub fn app() -> Router {
    app_with_pool(lazy_pool())
}

pub fn token() -> String {
    jwt_config()
        .issue_token("hr-admin", &["hr"], Duration::from_secs(600))
        .unwrap()
}

pub fn bearer() -> String {
    format!("Bearer {}", token())
}

/// Send a request and return the status with the parsed JSON body (`Null` when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Authenticated request
pub async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send(app, method, uri, Some(&bearer()), body).await
}
