//! Error types used throughout the application

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for ERPGate
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ErpGateError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for ERPGate operations
pub type Result<T> = std::result::Result<T, ErpGateError>;

/// Failures of the two-step ERP authentication handshake.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamAuthError {
    /// The ERP could not be reached at all.
    #[error("could not connect to the ERP: {0}")]
    Connection(String),

    /// The ERP did not answer within the configured deadline.
    #[error("ERP authentication timed out after {0:?}")]
    Timeout(Duration),

    /// The ERP answered with a non-success status.
    #[error("ERP rejected the credentials (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// The ERP answered 2xx but no known token shape could be read.
    #[error("ERP returned an unreadable token response: {0}")]
    InvalidResponse(String),
}

/// Hard failures of an order submission.
///
/// Upstream HTTP outcomes are not errors; they are reported through
/// [`crate::SubmissionResult`]. Only these two cases stop a request before
/// anything is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("no upstream token available; the user must log in again")]
    MissingToken,

    #[error("order endpoint is misconfigured: {0}")]
    Configuration(String),
}

/// Session token verification and signing failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("session token expired")]
    Expired,

    #[error("session token invalid: {0}")]
    Invalid(String),

    #[error("failed to sign session token: {0}")]
    Signing(String),
}

/// Errors surfaced by the login flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error(transparent)]
    Upstream(#[from] UpstreamAuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Errors surfaced by the requisition flow before or instead of a
/// [`crate::SubmissionResult`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequisitionError {
    #[error("invalid requisition: {0}")]
    Invalid(String),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl From<TokenError> for ErpGateError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => Self::Internal(msg),
            other => Self::Auth(other.to_string()),
        }
    }
}

impl From<SubmissionError> for ErpGateError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::MissingToken => Self::Auth(err.to_string()),
            SubmissionError::Configuration(msg) => Self::Config(msg),
        }
    }
}

impl From<UpstreamAuthError> for ErpGateError {
    fn from(err: UpstreamAuthError) -> Self {
        match err {
            UpstreamAuthError::Connection(_) | UpstreamAuthError::Timeout(_) => {
                Self::Network(err.to_string())
            }
            UpstreamAuthError::Rejected { .. } | UpstreamAuthError::InvalidResponse(_) => {
                Self::Auth(err.to_string())
            }
        }
    }
}
