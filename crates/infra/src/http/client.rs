use std::time::Duration;

use erpgate_domain::ErpGateError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use thiserror::Error;
use tracing::debug;

use crate::errors::InfraError;

const USER_AGENT: &str = concat!("erpgate/", env!("CARGO_PKG_VERSION"));

/// Transport-level failure of a single HTTP exchange.
///
/// Kept separate from [`ErpGateError`] so ERP adapters can tell a timeout
/// from a refused connection when building their own outcomes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpFailure {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failure: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// HTTP client with a fixed per-request deadline. Every call is a single
/// attempt.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, ErpGateError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, HttpFailure> {
        let request = builder.build().map_err(|err| HttpFailure::Request(err.to_string()))?;

        // Query strings may carry credentials; only the path is logged.
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %path, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %path, error = %err, "HTTP request failed");
                Err(self.classify(err))
            }
        }
    }

    /// Read a response body as text, classifying a mid-body timeout.
    pub async fn read_text(&self, response: Response) -> Result<String, HttpFailure> {
        response.text().await.map_err(|err| self.classify(err))
    }

    /// Map a reqwest error onto the transport failure taxonomy.
    pub fn classify(&self, err: reqwest::Error) -> HttpFailure {
        if err.is_timeout() {
            return HttpFailure::Timeout(self.timeout);
        }
        if err.is_connect() {
            return HttpFailure::Connect(err.to_string());
        }
        HttpFailure::Request(err.to_string())
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, ErpGateError> {
        let mut builder = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .no_proxy();

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            ErpGateError::from(infra)
        })?;

        Ok(HttpClient { client, timeout: self.timeout })
    }
}
