use crate::{state::AppState, types::ApiResponse};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Liveness probe - no database access
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let data = serde_json::json!({
        "app": env!("CARGO_PKG_NAME"),
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "listen": format!("{}:{}", state.config.server.host, state.config.server.port),
        "time": chrono::Utc::now().to_rfc3339(),
    });
    (StatusCode::OK, Json(ApiResponse::success(200, "API is running", data)))
}

// Readiness probe: checks DB connectivity with timeout protection
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let query = sqlx::query("SELECT 1").fetch_one(&state.db);
    match tokio::time::timeout(std::time::Duration::from_secs(5), query).await {
        Ok(Ok(_)) => (StatusCode::OK, Json(ApiResponse::message(200, "ready"))),
        Ok(Err(e)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::failure(503, "not ready", e.to_string())),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::failure(503, "not ready", "database check timed out")),
        ),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.get_snapshot())
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.metrics.get_snapshot().to_prometheus();
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}
