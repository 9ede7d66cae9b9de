//! HTTP route handlers.
//!
//! - `health`: liveness, readiness and metrics endpoints
//! - `menus`: the `/api/menus` resource

pub mod health;
pub mod menus;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::state::AppState;

/// The full application router, minus CORS which depends on the build profile.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/api/menus", get(menus::get_menus).post(menus::create_menu))
        .route(
            "/api/menus/{id}",
            get(menus::get_menu).put(menus::update_menu).delete(menus::delete_menu),
        )
        .route("/api/menus/{id}/move", patch(menus::move_menu))
        .route("/api/menus/{id}/reorder", patch(menus::reorder_menu))
        .fallback(menus::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
