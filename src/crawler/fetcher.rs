//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client
//! - GET requests to fetch page content
//! - Error classification into fetch warnings
//!
//! Requests carry no custom headers and are never retried. The status code is
//! not inspected: an error page is still page content.

use crate::state::{Warning, WarningKind};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Message used for failures that fit no other class
pub const UNEXPECTED_MESSAGE: &str = "Unexpected error occurred";

/// Builds an HTTP client
///
/// # Arguments
///
/// * `timeout` - Per-request timeout; `None` keeps the reqwest default
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_arbor::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(Some(Duration::from_secs(30))).unwrap();
/// ```
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().gzip(true).brotli(true);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// Fetches the content of a URL
///
/// # Error Classification
///
/// | Condition | Warning kind |
/// |-----------|--------------|
/// | Scheme other than http/https | `Scheme` (no request sent) |
/// | Request timed out | `Timeout` |
/// | Connection failed (DNS, refused, TLS) | `Connection` |
/// | Unparsable URL, redirect loop, body read failure, ... | `Unexpected` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// The response body as text, or the warning describing why it could not be
/// fetched. Callers treat a warning as empty content.
pub async fn fetch_url(client: &Client, url: &str) -> Result<String, Warning> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!("Cannot parse {}: {}", url, e);
            return Err(Warning::new(url, WarningKind::Unexpected, UNEXPECTED_MESSAGE));
        }
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Warning::new(
            url,
            WarningKind::Scheme,
            format!("No connection adapter for scheme '{}'", parsed.scheme()),
        ));
    }

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    tracing::debug!("GET {} -> {}", url, response.status());

    response.text().await.map_err(|e| classify_error(url, e))
}

/// Maps a reqwest error to a fetch warning
fn classify_error(url: &str, error: reqwest::Error) -> Warning {
    if error.is_timeout() {
        Warning::new(url, WarningKind::Timeout, error.to_string())
    } else if error.is_connect() {
        Warning::new(url, WarningKind::Connection, error.to_string())
    } else {
        tracing::debug!("Unexpected error fetching {}: {}", url, error);
        Warning::new(url, WarningKind::Unexpected, UNEXPECTED_MESSAGE)
    }
}
