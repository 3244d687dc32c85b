//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If a required variable is missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `ERPGATE_ERP_BASE_URL`: ERP REST base URL
//! - `ERPGATE_SESSION_SECRET`: Session token signing secret
//! - `ERPGATE_DB_PATH`: SQLite database file path
//!
//! Optional:
//! - `ERPGATE_BIND_ADDR`, `ERPGATE_ERP_ORDER_PATH`, `ERPGATE_ERP_TOKEN_PATH`,
//!   `ERPGATE_ERP_PROBE_PATH`, `ERPGATE_ERP_PROBE_ENABLED`,
//!   `ERPGATE_ERP_PROBE_POLICY` (`lenient`/`strict`),
//!   `ERPGATE_ERP_TOKEN_ENCODING` (`form`/`query`),
//!   `ERPGATE_ERP_PASSWORD_BASE64`, `ERPGATE_ERP_COLLECTOR_KEY`,
//!   `ERPGATE_ERP_AUTH_TIMEOUT_MS`, `ERPGATE_ERP_SUBMIT_TIMEOUT_MS`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./erpgate.json` or `./erpgate.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use erpgate_domain::{
    Config, DatabaseConfig, ErpConfig, ErpGateError, Result, ServerConfig, SessionConfig,
};

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `ErpGateError::Config` if neither source yields a complete,
/// parseable configuration.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `ErpGateError::Config` if required variables are missing
/// or optional ones have invalid values.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("ERPGATE_ERP_BASE_URL")?;
    let secret = env_var("ERPGATE_SESSION_SECRET")?;
    let db_path = env_var("ERPGATE_DB_PATH")?;

    let mut erp = ErpConfig::with_base_url(base_url);
    if let Some(path) = env_opt("ERPGATE_ERP_ORDER_PATH") {
        erp.order_path = path;
    }
    if let Some(path) = env_opt("ERPGATE_ERP_TOKEN_PATH") {
        erp.token_path = path;
    }
    if let Some(path) = env_opt("ERPGATE_ERP_PROBE_PATH") {
        erp.probe_path = path;
    }
    erp.probe_enabled = env_bool("ERPGATE_ERP_PROBE_ENABLED", erp.probe_enabled);
    erp.encode_password_base64 =
        env_bool("ERPGATE_ERP_PASSWORD_BASE64", erp.encode_password_base64);
    erp.probe_policy = env_parse("ERPGATE_ERP_PROBE_POLICY", erp.probe_policy)?;
    erp.token_encoding = env_parse("ERPGATE_ERP_TOKEN_ENCODING", erp.token_encoding)?;
    erp.collector_key = env_opt("ERPGATE_ERP_COLLECTOR_KEY");
    erp.auth_timeout_ms = env_parse("ERPGATE_ERP_AUTH_TIMEOUT_MS", erp.auth_timeout_ms)?;
    erp.submission_timeout_ms =
        env_parse("ERPGATE_ERP_SUBMIT_TIMEOUT_MS", erp.submission_timeout_ms)?;

    let mut server = ServerConfig::default();
    if let Some(addr) = env_opt("ERPGATE_BIND_ADDR") {
        server.bind_addr = addr;
    }

    Ok(Config {
        server,
        erp,
        session: SessionConfig { secret },
        database: DatabaseConfig { path: db_path },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ErpGateError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ErpGateError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ErpGateError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ErpGateError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ErpGateError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ErpGateError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ErpGateError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 6] = [
        "config.json",
        "config.toml",
        "erpgate.json",
        "erpgate.toml",
        "../config.json",
        "../config.toml",
    ];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable; blank counts as missing.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        ErpGateError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse an optional variable with `FromStr`, keeping `default` when unset.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| ErpGateError::Config(format!("Invalid value for {}: {}", key, e))),
        None => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
