//! Login: ERP handshake followed by session token issuance

use std::sync::Arc;

use erpgate_domain::{token_prefix, LoginError};
use tracing::{info, warn};

use crate::ports::UpstreamAuthenticator;
use crate::session::SessionTokenCodec;

/// Successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    pub user: String,
    pub token: String,
}

/// Authenticates users against the ERP and issues session tokens.
pub struct LoginService {
    authenticator: Arc<dyn UpstreamAuthenticator>,
    codec: Arc<SessionTokenCodec>,
}

impl LoginService {
    pub fn new(authenticator: Arc<dyn UpstreamAuthenticator>, codec: Arc<SessionTokenCodec>) -> Self {
        Self { authenticator, codec }
    }

    /// Authenticate `username` upstream and sign a session for them.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginSuccess, LoginError> {
        let username = username.trim();

        let credential = match self.authenticator.authenticate(username, password).await {
            Ok(credential) => credential,
            Err(err) => {
                warn!(user = %username, error = %err, "login failed");
                return Err(err.into());
            }
        };

        let token = self.codec.issue(username, &credential)?;
        info!(
            user = %username,
            upstream_token = %token_prefix(&credential.access_token),
            "login succeeded"
        );

        Ok(LoginSuccess { user: username.to_string(), token })
    }
}
