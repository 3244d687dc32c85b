//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUTH_TIMEOUT_MS, DEFAULT_BIND_ADDR, DEFAULT_ORDER_PATH, DEFAULT_PROBE_PATH,
    DEFAULT_SUBMISSION_TIMEOUT_MS, DEFAULT_TOKEN_PATH,
};
use crate::impl_domain_enum_conversions;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub erp: ErpConfig,
    pub session: SessionConfig,
    pub database: DatabaseConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: default_bind_addr() }
    }
}

/// Connection settings for the upstream ERP REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErpConfig {
    /// Base REST URL, e.g. `http://erp-host:4003/rest`. Must not already
    /// contain any of the endpoint paths below.
    pub base_url: String,
    #[serde(default = "default_order_path")]
    pub order_path: String,
    #[serde(default = "default_token_path")]
    pub token_path: String,
    #[serde(default = "default_probe_path")]
    pub probe_path: String,
    #[serde(default = "default_true")]
    pub probe_enabled: bool,
    #[serde(default)]
    pub probe_policy: ProbePolicy,
    #[serde(default)]
    pub token_encoding: TokenRequestEncoding,
    #[serde(default = "default_true")]
    pub encode_password_base64: bool,
    /// Shared key sent as `X-Cliente-Token` when the deployment requires it.
    #[serde(default, skip_serializing)]
    pub collector_key: Option<String>,
    #[serde(default = "default_auth_timeout_ms")]
    pub auth_timeout_ms: u64,
    #[serde(default = "default_submission_timeout_ms")]
    pub submission_timeout_ms: u64,
}

impl ErpConfig {
    /// Configuration pointing at `base_url` with every other field defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            order_path: default_order_path(),
            token_path: default_token_path(),
            probe_path: default_probe_path(),
            probe_enabled: true,
            probe_policy: ProbePolicy::default(),
            token_encoding: TokenRequestEncoding::default(),
            encode_password_base64: true,
            collector_key: None,
            auth_timeout_ms: DEFAULT_AUTH_TIMEOUT_MS,
            submission_timeout_ms: DEFAULT_SUBMISSION_TIMEOUT_MS,
        }
    }
}

/// How a failed credential probe affects the login handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbePolicy {
    /// Log probe failures and always continue to token issuance.
    #[default]
    Lenient,
    /// Fail fast on explicit 401/403 and on transport failures.
    Strict,
}

impl_domain_enum_conversions!(ProbePolicy {
    Lenient => "lenient",
    Strict => "strict",
});

/// Where credentials are placed on the token request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenRequestEncoding {
    /// `application/x-www-form-urlencoded` body fields.
    #[default]
    Form,
    /// URL query parameters.
    Query,
}

impl_domain_enum_conversions!(TokenRequestEncoding {
    Form => "form",
    Query => "query",
});

/// Session token signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(skip_serializing)]
    pub secret: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_order_path() -> String {
    DEFAULT_ORDER_PATH.to_string()
}

fn default_token_path() -> String {
    DEFAULT_TOKEN_PATH.to_string()
}

fn default_probe_path() -> String {
    DEFAULT_PROBE_PATH.to_string()
}

fn default_true() -> bool {
    true
}

fn default_auth_timeout_ms() -> u64 {
    DEFAULT_AUTH_TIMEOUT_MS
}

fn default_submission_timeout_ms() -> u64 {
    DEFAULT_SUBMISSION_TIMEOUT_MS
}
