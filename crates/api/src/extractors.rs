//! Session extraction for protected routes
//!
//! A request is authenticated when it carries a valid session token either as
//! `Authorization: Bearer <token>` or as the `token` cookie. The header wins
//! when both are present.
//!
//! Usage:
//! ```ignore
//! async fn handler(AuthenticatedUser(identity): AuthenticatedUser) -> ... {
//!     let user = identity.user;
//! }
//! ```

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use erpgate_domain::constants::SESSION_COOKIE_NAME;
use erpgate_domain::{SessionIdentity, TokenError};
use serde_json::json;

use crate::context::AppContext;

/// Identity of the caller, verified from the session token.
///
/// Lives only for the request that produced it.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionIdentity);

impl FromRequestParts<Arc<AppContext>> for AuthenticatedUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &Arc<AppContext>,
    ) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path();

        let Some(token) = session_token(&parts.headers) else {
            tracing::debug!(method = %parts.method, path, "request without session token");
            return Err(unauthorized(path, "authentication required"));
        };

        match ctx.codec.verify(&token) {
            Ok(identity) => {
                tracing::info!(
                    user = %identity.user,
                    method = %parts.method,
                    path,
                    "authenticated access"
                );
                Ok(AuthenticatedUser(identity))
            }
            Err(err) => {
                tracing::warn!(method = %parts.method, path, error = %err, "session rejected");
                let message = match err {
                    TokenError::Expired => "session expired, please log in again",
                    _ => "invalid session token",
                };
                Err(unauthorized(path, message))
            }
        }
    }
}

/// Pull the session token from the `Authorization` header or the cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE_NAME && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// API callers get a JSON error; page requests are told where to log in.
fn unauthorized(path: &str, message: &str) -> Response {
    let body = if path.starts_with("/api/") {
        json!({ "message": message })
    } else {
        json!({ "redirect": "/login" })
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
