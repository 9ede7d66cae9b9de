use std::sync::Arc;

use crate::config::AppConfig;
use crate::menu::MenuService;
use crate::metrics::Metrics;

/// The shared application state.
///
/// Cloned into every handler by axum. It owns no menu data itself; the
/// database pool inside [`MenuService`] is the only shared mutable resource.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool, also used by the readiness probe.
    pub db: sqlx::SqlitePool,
    /// Menu tree operations over `db`.
    pub menus: MenuService,
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// Operation counters.
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(db: sqlx::SqlitePool, config: AppConfig) -> Self {
        Self {
            menus: MenuService::new(db.clone()),
            db,
            config: Arc::new(config),
            metrics: Metrics::new(),
        }
    }
}
