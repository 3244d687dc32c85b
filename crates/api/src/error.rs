//! Mapping of service errors onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use erpgate_domain::{
    ErpGateError, LoginError, RequisitionError, SubmissionError, UpstreamAuthError,
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, warn};

use crate::utils::logging::error_label;

/// Errors returned by route handlers.
///
/// Client bodies always carry `success: false` plus a human-readable text;
/// internal details only go to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Service(#[from] ErpGateError),

    #[error(transparent)]
    Login(#[from] LoginError),

    #[error(transparent)]
    Requisition(#[from] RequisitionError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Service(err) => match err {
                ErpGateError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                ErpGateError::NotFound(_) => StatusCode::NOT_FOUND,
                ErpGateError::Auth(_) => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Login(LoginError::Token(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Login(LoginError::Upstream(_)) => StatusCode::UNAUTHORIZED,
            Self::Requisition(RequisitionError::Invalid(_)) => StatusCode::BAD_REQUEST,
            Self::Requisition(RequisitionError::Submission(SubmissionError::MissingToken)) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Requisition(RequisitionError::Submission(SubmissionError::Configuration(_))) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Service(err) if self.status().is_server_error() => {
                format!("internal error ({})", error_label(err))
            }
            Self::Service(ErpGateError::InvalidInput(msg))
            | Self::Service(ErpGateError::NotFound(msg))
            | Self::Service(ErpGateError::Auth(msg)) => msg.clone(),
            Self::Service(err) => err.to_string(),
            Self::Login(LoginError::Upstream(err)) => match err {
                UpstreamAuthError::Rejected { .. } => "invalid username or password".into(),
                UpstreamAuthError::Connection(_) | UpstreamAuthError::Timeout(_) => {
                    "could not reach the ERP, try again later".into()
                }
                UpstreamAuthError::InvalidResponse(_) => {
                    "the ERP returned an unexpected login response".into()
                }
            },
            Self::Login(LoginError::Token(_)) => "could not create a session".into(),
            Self::Requisition(RequisitionError::Submission(SubmissionError::Configuration(_))) => {
                "the ERP order endpoint is misconfigured".into()
            }
            Self::Requisition(err) => err.to_string(),
        }
    }

    /// Field that carries the text: requisitions mirror `SubmissionResult`.
    fn message_key(&self) -> &'static str {
        match self {
            Self::Requisition(_) => "message",
            _ => "error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        let mut body = Map::new();
        body.insert("success".into(), Value::Bool(false));
        body.insert(self.message_key().into(), Value::String(self.client_message()));
        (status, Json(Value::Object(body))).into_response()
    }
}
