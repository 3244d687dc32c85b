//! Credentials obtained from the ERP and the identity carried by a session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::TOKEN_LOG_PREFIX_LEN;

/// Token pair returned by the ERP token endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamCredential {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl UpstreamCredential {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token }
    }
}

impl fmt::Debug for UpstreamCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamCredential")
            .field("access_token", &token_prefix(&self.access_token))
            .field("refresh_token", &self.refresh_token.as_deref().map(token_prefix))
            .finish()
    }
}

/// Identity recovered from a verified session token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user: String,
    pub upstream_token: String,
}

impl fmt::Debug for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionIdentity")
            .field("user", &self.user)
            .field("upstream_token", &token_prefix(&self.upstream_token))
            .finish()
    }
}

/// Short, log-safe prefix of a bearer token.
pub fn token_prefix(token: &str) -> String {
    let prefix: String = token.chars().take(TOKEN_LOG_PREFIX_LEN).collect();
    format!("{prefix}...")
}
