//! Endpoint URL assembly for the ERP REST API

use thiserror::Error;
use url::Url;

/// The configured base URL and path do not form a usable endpoint.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid ERP endpoint {url:?}: {reason}")]
pub struct InvalidEndpoint {
    pub url: String,
    pub reason: String,
}

/// Join `base` and `path` exactly once.
///
/// Trailing slashes on the base are dropped and the path always gets a
/// leading slash. A result containing more than one scheme means the base
/// URL was configured with a full endpoint already and is rejected.
pub fn build_endpoint_url(base: &str, path: &str) -> Result<String, InvalidEndpoint> {
    let base = base.trim().trim_end_matches('/');
    let path = path.trim();

    let url = if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    };

    if base.is_empty() {
        return Err(InvalidEndpoint { url, reason: "base URL is empty".into() });
    }

    let schemes = url.matches("http://").count() + url.matches("https://").count();
    if schemes > 1 {
        return Err(InvalidEndpoint {
            url,
            reason: "scheme appears more than once; check the configured base URL".into(),
        });
    }

    if let Err(err) = Url::parse(&url) {
        return Err(InvalidEndpoint { url, reason: err.to_string() });
    }

    Ok(url)
}
