//! Login and logout

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderValue;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::Json;
use erpgate_domain::constants::{SESSION_COOKIE_MAX_AGE_SECS, SESSION_COOKIE_NAME};
use erpgate_domain::ErpGateError;
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: String,
}

/// `POST /api/auth/login`
pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable login body");
        ApiError::BadRequest("username and password are required".into())
    })?;

    if request.username.trim().is_empty() || request.password.trim().is_empty() {
        return Err(ApiError::BadRequest("username and password are required".into()));
    }

    let session = ctx.login.login(&request.username, &request.password).await?;
    let cookie = session_cookie(&session.token, SESSION_COOKIE_MAX_AGE_SECS)?;

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse { success: true, token: session.token, user: session.user }),
    )
        .into_response())
}

/// `GET /logout` - drop the cookie and send the browser to the login page.
pub async fn logout() -> Result<Response, ApiError> {
    let cookie = session_cookie("", 0)?;
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to("/login")).into_response())
}

fn session_cookie(token: &str, max_age: i64) -> Result<HeaderValue, ApiError> {
    let cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Max-Age={max_age}; Path=/; HttpOnly; SameSite=Lax"
    );
    HeaderValue::from_str(&cookie).map_err(|err| {
        ApiError::Service(ErpGateError::Internal(format!("invalid session cookie: {err}")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_attributes() {
        let cookie = session_cookie("abc", 28_800).unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "token=abc; Max-Age=28800; Path=/; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let cookie = session_cookie("", 0).unwrap();
        assert!(cookie.to_str().unwrap().starts_with("token=; Max-Age=0;"));
    }
}
