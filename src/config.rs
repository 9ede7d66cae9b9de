use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub dir: String,
    pub file_name: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

const DEFAULTS: &str = include_str!("../config/default.toml");

/// Loads the configuration: embedded defaults -> `menutree.toml` -> `MENUTREE_CONFIG` -> env.
pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        // Optional local file: menutree.toml (in CWD)
        .add_source(::config::File::with_name("menutree").required(false));

    if let Ok(custom_path) = std::env::var("MENUTREE_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("MENUTREE").separator("__"));

    let app_cfg: AppConfig = builder.build()?.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

/// Embedded defaults overlaid with a single TOML file. Does not read the environment.
pub fn load_from_file(path: &Path) -> anyhow::Result<AppConfig> {
    let app_cfg: AppConfig = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        .add_source(::config::File::from(path).format(::config::FileFormat::Toml))
        .build()?
        .try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }
    if cfg.server.body_limit_bytes == 0 {
        return Err(anyhow::anyhow!("server.body_limit_bytes must be > 0"));
    }

    // Database
    if cfg.database.url.trim().is_empty() {
        return Err(anyhow::anyhow!("database.url must not be empty"));
    }
    if cfg.database.max_connections == 0 || cfg.database.max_connections > 256 {
        return Err(anyhow::anyhow!("database.max_connections must be in 1..=256"));
    }

    // Logging
    if cfg.logging.file_name.trim().is_empty() {
        return Err(anyhow::anyhow!("logging.file_name must not be empty"));
    }

    Ok(())
}

pub fn ensure_sqlite_parent_dir(url: &str) -> anyhow::Result<()> {
    if let Some(path) = url.strip_prefix("sqlite://") {
        // sqlite:///C:/... -> C:/...
        #[cfg(windows)]
        let path = {
            let bytes = path.as_bytes();
            if bytes.len() >= 3 && bytes[0] == b'/' && bytes[2] == b':' && bytes[1].is_ascii_alphabetic() {
                &path[1..]
            } else {
                path
            }
        };
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}
