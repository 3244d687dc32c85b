//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Session
pub const SESSION_TTL_HOURS: i64 = 8;
pub const SESSION_COOKIE_NAME: &str = "token";
pub const SESSION_COOKIE_MAX_AGE_SECS: i64 = SESSION_TTL_HOURS * 3600;

// ERP defaults
pub const DEFAULT_ORDER_PATH: &str = "/mmacdw02/ordem_separacao_fabrica/";
pub const DEFAULT_TOKEN_PATH: &str = "/auth";
pub const DEFAULT_PROBE_PATH: &str = "/auth/probe";
pub const DEFAULT_AUTH_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_SUBMISSION_TIMEOUT_MS: u64 = 60_000;
pub const COLLECTOR_KEY_HEADER: &str = "X-Cliente-Token";

// Server
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const SERVICE_NAME: &str = "ERPGate Projects API";

// Diagnostics
pub const TOKEN_LOG_PREFIX_LEN: usize = 8;
pub const UPSTREAM_BODY_LOG_LIMIT: usize = 500;
