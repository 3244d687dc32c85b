//! ERP authentication handshake
//!
//! Login against the ERP is two requests:
//! 1. an optional credential probe (GET with HTTP Basic credentials), whose
//!    failure is tolerated or fatal depending on [`ProbePolicy`];
//! 2. token issuance (POST with `username`/`password` as form fields or
//!    query parameters), whose JSON body is run through an ordered chain of
//!    parsers until one yields an access token.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use erpgate_core::UpstreamAuthenticator;
use erpgate_domain::constants::COLLECTOR_KEY_HEADER;
use erpgate_domain::{
    token_prefix, ErpConfig, ErpGateError, ProbePolicy, TokenRequestEncoding, UpstreamAuthError,
    UpstreamCredential,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::endpoint::build_endpoint_url;
use super::truncate_for_log;
use crate::http::{HttpClient, HttpFailure};

/// A parser tries to read an [`UpstreamCredential`] out of one known
/// response shape.
type TokenParser = fn(&Value) -> Option<UpstreamCredential>;

/// Response shapes seen from ERP token endpoints, most specific first.
const TOKEN_PARSERS: &[TokenParser] = &[parse_nested_credential, parse_top_level_credential];

/// HTTP adapter for [`UpstreamAuthenticator`].
#[derive(Debug, Clone)]
pub struct ErpAuthClient {
    http: HttpClient,
    probe_url: Option<String>,
    token_url: String,
    probe_policy: ProbePolicy,
    token_encoding: TokenRequestEncoding,
    encode_password_base64: bool,
}

impl ErpAuthClient {
    /// Build a client from configuration. Endpoint URLs are validated here
    /// so a broken base URL fails at startup instead of on first login.
    pub fn new(config: &ErpConfig) -> Result<Self, ErpGateError> {
        let token_url = build_endpoint_url(&config.base_url, &config.token_path)
            .map_err(|e| ErpGateError::Config(e.to_string()))?;
        let probe_url = if config.probe_enabled {
            Some(
                build_endpoint_url(&config.base_url, &config.probe_path)
                    .map_err(|e| ErpGateError::Config(e.to_string()))?,
            )
        } else {
            None
        };

        let mut headers = HeaderMap::new();
        if let Some(key) = config.collector_key.as_deref().filter(|k| !k.trim().is_empty()) {
            let value = HeaderValue::from_str(key.trim()).map_err(|_| {
                ErpGateError::Config("collector key is not a valid header value".into())
            })?;
            let name = HeaderName::from_bytes(COLLECTOR_KEY_HEADER.as_bytes())
                .map_err(|e| ErpGateError::Config(format!("invalid collector header: {e}")))?;
            headers.insert(name, value);
        }

        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.auth_timeout_ms))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            probe_url,
            token_url,
            probe_policy: config.probe_policy,
            token_encoding: config.token_encoding,
            encode_password_base64: config.encode_password_base64,
        })
    }

    /// Step 1: check the credentials with HTTP Basic auth.
    async fn probe(&self, url: &str, username: &str, password: &str) -> Result<(), UpstreamAuthError> {
        let request = self.http.request(Method::GET, url).basic_auth(username, Some(password));

        let failure = match self.http.send(request).await {
            Ok(response) if response.status().is_success() => {
                debug!(user = %username, "credential probe accepted");
                return Ok(());
            }
            Ok(response) => {
                let status = response.status();
                let body = self.http.read_text(response).await.unwrap_or_default();
                let explicit_rejection =
                    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN);
                warn!(
                    user = %username,
                    status = status.as_u16(),
                    body = %truncate_for_log(&body),
                    "credential probe returned non-success status"
                );

                if explicit_rejection {
                    UpstreamAuthError::Rejected { status: status.as_u16(), body }
                } else {
                    return Ok(());
                }
            }
            Err(err) => {
                warn!(user = %username, error = %err, "credential probe failed");
                transport_error(err)
            }
        };

        match self.probe_policy {
            ProbePolicy::Lenient => Ok(()),
            ProbePolicy::Strict => Err(failure),
        }
    }

    /// Step 2: exchange the credentials for a token pair.
    async fn request_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UpstreamCredential, UpstreamAuthError> {
        let password = if self.encode_password_base64 {
            BASE64.encode(password.as_bytes())
        } else {
            password.to_string()
        };
        let params = [("username", username), ("password", password.as_str())];

        let request = self.http.request(Method::POST, &self.token_url);
        let request = match self.token_encoding {
            TokenRequestEncoding::Form => request.form(&params),
            TokenRequestEncoding::Query => request.query(&params),
        };

        let response = self.http.send(request).await.map_err(transport_error)?;
        let status = response.status();
        let body = self.http.read_text(response).await.map_err(transport_error)?;

        // Success bodies carry the token pair and are never logged.
        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            warn!(
                user = %username,
                status = status.as_u16(),
                body = %truncate_for_log(&body),
                "token endpoint rejected the credentials"
            );
            return Err(UpstreamAuthError::Rejected { status: status.as_u16(), body });
        }
        debug!(user = %username, status = status.as_u16(), "token endpoint responded");

        let json: Value = serde_json::from_str(&body).map_err(|e| {
            UpstreamAuthError::InvalidResponse(format!("token response is not JSON: {e}"))
        })?;

        parse_credential(&json).ok_or_else(|| {
            UpstreamAuthError::InvalidResponse(format!(
                "no access token in response (fields: {})",
                field_names(&json)
            ))
        })
    }
}

#[async_trait]
impl UpstreamAuthenticator for ErpAuthClient {
    #[instrument(skip(self, password), fields(url = %self.token_url))]
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UpstreamCredential, UpstreamAuthError> {
        if let Some(probe_url) = &self.probe_url {
            self.probe(probe_url, username, password).await?;
        }

        let credential = self.request_token(username, password).await?;
        info!(
            user = %username,
            access_token = %token_prefix(&credential.access_token),
            "ERP token issued"
        );
        Ok(credential)
    }
}

fn transport_error(failure: HttpFailure) -> UpstreamAuthError {
    match failure {
        HttpFailure::Timeout(after) => UpstreamAuthError::Timeout(after),
        HttpFailure::Connect(msg) | HttpFailure::Request(msg) => UpstreamAuthError::Connection(msg),
    }
}

/// Run the parser chain; the first non-empty access token wins.
pub fn parse_credential(body: &Value) -> Option<UpstreamCredential> {
    TOKEN_PARSERS.iter().find_map(|parser| parser(body))
}

fn parse_nested_credential(body: &Value) -> Option<UpstreamCredential> {
    let nested = body.get("dados_autenticacao")?;
    let access = non_empty_str(nested, "token").or_else(|| non_empty_str(nested, "access_token"))?;
    Some(UpstreamCredential::new(access, non_empty_str(nested, "refresh_token")))
}

fn parse_top_level_credential(body: &Value) -> Option<UpstreamCredential> {
    let access = non_empty_str(body, "access_token")?;
    Some(UpstreamCredential::new(access, non_empty_str(body, "refresh_token")))
}

/// Top-level keys of a response, for diagnostics that must not echo values.
fn field_names(body: &Value) -> String {
    match body.as_object() {
        Some(map) if !map.is_empty() => {
            map.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
        }
        Some(_) => "none".into(),
        None => "not an object".into(),
    }
}

fn non_empty_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn nested_shape_wins_over_top_level() {
        let body = json!({
            "dados_autenticacao": { "token": "nested", "refresh_token": "r1" },
            "access_token": "top"
        });
        let credential = parse_credential(&body).unwrap();
        assert_eq!(credential.access_token, "nested");
        assert_eq!(credential.refresh_token.as_deref(), Some("r1"));
    }

    #[test]
    fn nested_access_token_alias_is_accepted() {
        let body = json!({ "dados_autenticacao": { "access_token": "nested" } });
        assert_eq!(parse_credential(&body).unwrap().access_token, "nested");
    }

    #[test]
    fn empty_nested_token_falls_through_to_top_level() {
        let body = json!({ "dados_autenticacao": { "token": "" }, "access_token": "top" });
        let credential = parse_credential(&body).unwrap();
        assert_eq!(credential.access_token, "top");
        assert_eq!(credential.refresh_token, None);
    }

    #[test]
    fn unknown_shape_yields_none() {
        assert!(parse_credential(&json!({ "status": "ok" })).is_none());
        assert!(parse_credential(&json!([])).is_none());
    }

    #[test]
    fn field_names_list_keys_only() {
        let body = json!({ "status": "ok", "jwt": "SECRETVALUE" });
        let names = field_names(&body);
        assert!(names.contains("status") && names.contains("jwt"));
        assert!(!names.contains("SECRETVALUE"));
        assert_eq!(field_names(&json!([1, 2])), "not an object");
    }

    #[test]
    fn duplicated_base_url_fails_construction() {
        let config = ErpConfig::with_base_url("http://erp/rest/http://erp/rest");
        assert!(matches!(ErpAuthClient::new(&config), Err(ErpGateError::Config(_))));
    }
}
