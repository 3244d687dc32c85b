use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use erpgate_domain::constants::SESSION_TTL_HOURS;
use erpgate_domain::{ErpGateError, SessionIdentity, TokenError, UpstreamCredential};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;

/// Claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user: String,
    pub upstream_token: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 issuer/verifier for session tokens.
///
/// Expiry is checked against the injected clock rather than inside
/// `jsonwebtoken`, which reads the system time directly.
pub struct SessionTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for SessionTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokenCodec").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl SessionTokenCodec {
    /// Build a codec signing with `secret`. An empty secret is rejected.
    pub fn new(secret: &str, clock: Arc<dyn Clock>) -> erpgate_domain::Result<Self> {
        if secret.trim().is_empty() {
            return Err(ErpGateError::Config("session secret must not be empty".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(SESSION_TTL_HOURS),
            clock,
        })
    }

    /// Lifetime of issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user` embedding the upstream access token.
    pub fn issue(
        &self,
        user: &str,
        credential: &UpstreamCredential,
    ) -> Result<String, TokenError> {
        let issued_at = self.clock.now();
        let claims = SessionClaims {
            user: user.to_string(),
            upstream_token: credential.access_token.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded identity.
    pub fn verify(&self, token: &str) -> Result<SessionIdentity, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })?;

        let claims = data.claims;
        if self.clock.now().timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(SessionIdentity { user: claims.user, upstream_token: claims.upstream_token })
    }
}
