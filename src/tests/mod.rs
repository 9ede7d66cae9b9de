//! Integration and unit tests for the Menutree application.
//!
//! ## Test Modules
//!
//! - **menu_service_tests**: ordering, reparenting, cascade delete and tree reads against SQLite
//! - **menu_api_tests**: `/api/menus` endpoints through the full router
//! - **error_tests**: error mapping and the error envelope
//! - **config_tests**: configuration loading and validation
//! - **db_tests**: schema initialization and constraints
//! - **health_api_tests**: health, readiness and metrics endpoints
//!
//! Individual test modules can be run with:
//! ```bash
//! cargo test menu_service_tests
//! ```


use std::collections::HashMap;

use axum::{body::Body, response::Response, Router};
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::config::{AppConfig, DatabaseConfig, LoggingConfig, ServerConfig};
use crate::menu::MenuService;
use crate::state::AppState;
use crate::types::{Menu, NewMenu};

/// Single-connection in-memory database with the schema applied.
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    crate::db::init_db(&pool).await.unwrap();
    pool
}

pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 8080, body_limit_bytes: 64 * 1024 },
        database: DatabaseConfig { url: "sqlite::memory:".to_string(), max_connections: 1, busy_timeout_ms: 1000 },
        logging: LoggingConfig {
            dir: "logs".to_string(),
            file_name: "menutree-test.log".to_string(),
            filter: "debug".to_string(),
        },
    }
}

pub(crate) async fn test_app() -> (Router, AppState) {
    let state = AppState::new(memory_pool().await, test_config());
    (crate::routes::router(state.clone()), state)
}

/// Creates a node the same way the API does.
pub(crate) async fn seed(svc: &MenuService, title: &str, parent: Option<Uuid>, order_index: i64) -> Menu {
    svc.create(NewMenu {
        parent_id: parent,
        title: title.to_string(),
        order_index: Some(order_index),
        ..Default::default()
    })
    .await
    .unwrap()
}

/// `(title, order_index)` of a sibling group, in stored order.
pub(crate) async fn group(pool: &SqlitePool, parent: Option<Uuid>) -> Vec<(String, i64)> {
    sqlx::query_as(
        "SELECT title, order_index FROM menus WHERE parent_id IS ?1 ORDER BY order_index ASC, title ASC",
    )
    .bind(parent.map(|p| p.to_string()))
    .fetch_all(pool)
    .await
    .unwrap()
}

pub(crate) async fn titles(pool: &SqlitePool, parent: Option<Uuid>) -> Vec<String> {
    group(pool, parent).await.into_iter().map(|(t, _)| t).collect()
}

/// Asserts that every sibling group holds exactly `0..n`.
pub(crate) async fn assert_dense(pool: &SqlitePool) {
    let rows: Vec<(Option<String>, i64)> =
        sqlx::query_as("SELECT parent_id, order_index FROM menus").fetch_all(pool).await.unwrap();
    let mut groups: HashMap<Option<String>, Vec<i64>> = HashMap::new();
    for (parent, idx) in rows {
        groups.entry(parent).or_default().push(idx);
    }
    for (parent, mut indices) in groups {
        indices.sort_unstable();
        let expected: Vec<i64> = (0..indices.len() as i64).collect();
        assert_eq!(indices, expected, "sibling group {:?} is not dense", parent);
    }
}

pub(crate) async fn row_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM menus").fetch_one(pool).await.unwrap()
}

pub(crate) async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub(crate) fn json_request(method: &str, uri: &str, body: serde_json::Value) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) fn empty_request(method: &str, uri: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}
