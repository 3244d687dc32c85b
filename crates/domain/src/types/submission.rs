//! Normalized outcome of an order submission.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_domain_enum_conversions;

/// Classification of how the ERP answered an order submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Accepted,
    SessionExpired,
    BadRequest,
    BusinessRejection,
    EndpointNotFound,
    UpstreamError,
    NetworkError,
    Timeout,
}

impl_domain_enum_conversions!(SubmissionOutcome {
    Accepted => "accepted",
    SessionExpired => "session_expired",
    BadRequest => "bad_request",
    BusinessRejection => "business_rejection",
    EndpointNotFound => "endpoint_not_found",
    UpstreamError => "upstream_error",
    NetworkError => "network_error",
    Timeout => "timeout",
});

impl SubmissionOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Result returned to the caller for every submission that reached the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_response: Option<Value>,
    pub outcome: SubmissionOutcome,
}

impl SubmissionResult {
    pub fn accepted(message: impl Into<String>, upstream_response: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            upstream_response,
            outcome: SubmissionOutcome::Accepted,
        }
    }

    pub fn failed(
        outcome: SubmissionOutcome,
        message: impl Into<String>,
        upstream_response: Option<Value>,
    ) -> Self {
        Self {
            success: outcome.is_success(),
            message: message.into(),
            upstream_response,
            outcome,
        }
    }
}
