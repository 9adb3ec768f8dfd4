// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::HeaderMap;
use url::Url;

use crate::error::Result;

/// Create a configured asynchronous HTTP client.
pub fn create_client(user_agent: &str, timeout_secs: u64) -> Result<reqwest::Client> {
    create_client_with_headers(user_agent, timeout_secs, HeaderMap::new())
}

/// Create a client that sends `headers` on every request.
pub fn create_client_with_headers(
    user_agent: &str,
    timeout_secs: u64,
    headers: HeaderMap,
) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Parse an API root so relative paths join beneath it.
///
/// A missing trailing slash is added; otherwise `Url::join` would drop
/// the last path segment.
pub fn base_url(raw: &str) -> Result<Url> {
    if raw.ends_with('/') {
        Ok(Url::parse(raw)?)
    } else {
        Ok(Url::parse(&format!("{raw}/"))?)
    }
}
