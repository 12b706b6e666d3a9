//! Application settings.
//!
//! Settings come from an optional TOML file (`config.toml` by default, or the
//! path in `APP_CONFIG`) and are then overridden by environment variables:
//! `HOST`, `PORT` (lowercase `port` is also accepted), `CORS_ENABLED` and
//! `DATABASE_URL`. Every field has a default, so an empty environment is valid.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use tracing::{debug, info};

/// Port used when neither the file nor the environment names one.
pub const DEFAULT_PORT: u16 = 4000;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerSettings,
    /// Store settings
    pub database: DatabaseSettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Whether to answer cross-origin requests permissively
    pub cors: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            cors: true,
        }
    }
}

impl ServerSettings {
    /// Socket address built from `host` and `port`.
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config {
                message: format!("Invalid listen address {}:{}: {e}", self.host, self.port),
            })
    }
}

/// Store settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// `SeaORM` connection string
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: super::database::DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse TOML from config file {path_ref:?}: {e}"),
    })
}

fn env_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| std::env::var(name).ok())
}

/// Applies environment overrides on top of `config`.
///
/// `lookup` receives a list of accepted variable names and returns the first
/// one that is set; taking it as a parameter keeps tests independent of the
/// process environment.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> Result<AppConfig>
where
    F: Fn(&[&str]) -> Option<String>,
{
    if let Some(host) = lookup(&["HOST"]) {
        config.server.host = host;
    }
    if let Some(port) = lookup(&["PORT", "port"]) {
        config.server.port = port.trim().parse().map_err(|e| Error::Config {
            message: format!("PORT must be a number between 0 and 65535, got {port:?}: {e}"),
        })?;
    }
    if let Some(cors) = lookup(&["CORS_ENABLED"]) {
        config.server.cors = matches!(cors.trim(), "1" | "true" | "yes" | "on");
    }
    if let Some(url) = lookup(&["DATABASE_URL"]) {
        config.database.url = url;
    }
    Ok(config)
}

/// Loads the full application configuration: the TOML file when present, then
/// environment overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = env_var(&["APP_CONFIG"]).unwrap_or_else(|| "config.toml".to_string());
    let base = if Path::new(&path).exists() {
        info!("Loading configuration file {}", path);
        load_config(&path)?
    } else {
        debug!("No configuration file at {}, using defaults", path);
        AppConfig::default()
    };

    apply_env_overrides(base, env_var)
}
