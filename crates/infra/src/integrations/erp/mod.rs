//! ERP REST integration
//!
//! Adapters for the two ERP-facing ports: [`ErpAuthClient`] performs the
//! login handshake and [`ErpOrderClient`] forwards requisitions.

pub mod auth;
pub mod orders;
pub mod endpoint;

pub use auth::{parse_credential, ErpAuthClient};
pub use orders::{interpret_response, ErpOrderClient};
pub use endpoint::{build_endpoint_url, InvalidEndpoint};

use erpgate_domain::constants::UPSTREAM_BODY_LOG_LIMIT;

/// Bound upstream bodies before they reach the logs.
pub(crate) fn truncate_for_log(body: &str) -> &str {
    match body.char_indices().nth(UPSTREAM_BODY_LOG_LIMIT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
