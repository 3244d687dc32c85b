//! ERP order submission
//!
//! Forwards a sanitized requisition to the order endpoint and folds every
//! HTTP answer, including transport failures, into a [`SubmissionResult`].

use std::time::Duration;

use async_trait::async_trait;
use erpgate_core::OrderSubmitter;
use erpgate_domain::{
    token_prefix, ErpConfig, ErpGateError, OrderPayload, SubmissionError, SubmissionOutcome,
    SubmissionResult,
};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::truncate_for_log;
use super::endpoint::build_endpoint_url;
use crate::http::{HttpClient, HttpFailure};

/// HTTP adapter for [`OrderSubmitter`].
#[derive(Debug, Clone)]
pub struct ErpOrderClient {
    http: HttpClient,
    base_url: String,
    order_path: String,
}

impl ErpOrderClient {
    pub fn new(config: &ErpConfig) -> Result<Self, ErpGateError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.submission_timeout_ms))
            .build()?;

        Ok(Self { http, base_url: config.base_url.clone(), order_path: config.order_path.clone() })
    }

    /// Fully qualified order endpoint.
    pub fn endpoint(&self) -> Result<String, SubmissionError> {
        build_endpoint_url(&self.base_url, &self.order_path)
            .map_err(|e| SubmissionError::Configuration(e.to_string()))
    }
}

#[async_trait]
impl OrderSubmitter for ErpOrderClient {
    #[instrument(skip_all, fields(project = %payload.project))]
    async fn submit(
        &self,
        payload: OrderPayload,
        upstream_token: &str,
    ) -> Result<SubmissionResult, SubmissionError> {
        let upstream_token = upstream_token.trim();
        if upstream_token.is_empty() {
            warn!("order submission attempted without an upstream token");
            return Err(SubmissionError::MissingToken);
        }

        let payload = payload.sanitized();
        let url = self.endpoint()?;

        info!(
            %url,
            lines = payload.line_count(),
            upstream_token = %token_prefix(upstream_token),
            "submitting order to ERP"
        );

        let request = self.http.request(Method::POST, &url).bearer_auth(upstream_token).json(&payload);

        let response = match self.http.send(request).await {
            Ok(response) => response,
            Err(failure) => return Ok(transport_result(failure)),
        };

        let status = response.status();
        let body = match self.http.read_text(response).await {
            Ok(body) => body,
            Err(failure) => return Ok(transport_result(failure)),
        };

        let result = interpret_response(status, &body, &url);
        if result.success {
            info!(status = status.as_u16(), outcome = %result.outcome, "ERP accepted order");
        } else {
            warn!(
                status = status.as_u16(),
                outcome = %result.outcome,
                body = %truncate_for_log(&body),
                "ERP did not accept order"
            );
        }

        Ok(result)
    }
}

fn transport_result(failure: HttpFailure) -> SubmissionResult {
    warn!(error = %failure, "order submission transport failure");
    match failure {
        HttpFailure::Timeout(after) => SubmissionResult::failed(
            SubmissionOutcome::Timeout,
            format!("the ERP did not respond within {} seconds.", after.as_secs()),
            None,
        ),
        HttpFailure::Connect(msg) | HttpFailure::Request(msg) => SubmissionResult::failed(
            SubmissionOutcome::NetworkError,
            format!("could not reach the ERP: {msg}"),
            None,
        ),
    }
}

/// Map an upstream status and body onto a [`SubmissionResult`].
pub fn interpret_response(status: StatusCode, body: &str, url: &str) -> SubmissionResult {
    let json: Option<Value> = serde_json::from_str(body).ok();

    match status {
        StatusCode::OK | StatusCode::CREATED => {
            let message = json
                .as_ref()
                .and_then(success_message)
                .unwrap_or_else(|| "Order submitted successfully.".to_string());
            SubmissionResult::accepted(message, json)
        }
        StatusCode::UNAUTHORIZED => SubmissionResult::failed(
            SubmissionOutcome::SessionExpired,
            "upstream session expired.",
            json,
        ),
        StatusCode::BAD_REQUEST => SubmissionResult::failed(
            SubmissionOutcome::BadRequest,
            format!("bad request: {body}"),
            json,
        ),
        StatusCode::NOT_FOUND => match json.as_ref().and_then(cell_messages) {
            Some(messages) => {
                SubmissionResult::failed(SubmissionOutcome::BusinessRejection, messages, json)
            }
            None => SubmissionResult::failed(
                SubmissionOutcome::EndpointNotFound,
                format!("endpoint not found: {url}"),
                json,
            ),
        },
        other => SubmissionResult::failed(
            SubmissionOutcome::UpstreamError,
            format!("upstream error (HTTP {}): {body}", other.as_u16()),
            json,
        ),
    }
}

fn success_message(body: &Value) -> Option<String> {
    if let Some(order) = body.get("numero_ordem") {
        let number = match order {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };
        if let Some(number) = number {
            return Some(format!("Order {number} created"));
        }
    }

    ["mensagem", "message"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Business rejections arrive as a 404 with per-cell messages.
fn cell_messages(body: &Value) -> Option<String> {
    let messages: Vec<&str> = body
        .get("celulas")?
        .as_array()?
        .iter()
        .filter_map(|cell| cell.get("mensagem").and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}
