use erpgate_domain::ErpGateError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Honours `RUST_LOG`; falls back to `info` when it is unset or invalid.
/// Must be called once, from the binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(true)
        .init();
}

/// Log the outcome of a route handler with structured fields.
///
/// `route` should be the static route template, never the concrete path, so
/// project or cell codes do not end up in the field.
#[inline]
pub fn log_route_outcome(route: &str, user: &str, success: bool) {
    if success {
        info!(route, user, "route_success");
    } else {
        warn!(route, user, "route_failure");
    }
}

/// Convert an `ErpGateError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &ErpGateError) -> &'static str {
    match error {
        ErpGateError::Database(_) => "database",
        ErpGateError::Config(_) => "config",
        ErpGateError::Network(_) => "network",
        ErpGateError::Auth(_) => "auth",
        ErpGateError::NotFound(_) => "not_found",
        ErpGateError::InvalidInput(_) => "invalid_input",
        ErpGateError::Internal(_) => "internal",
    }
}
