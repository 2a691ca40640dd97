use crate::core::error::SourceError;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("rateconv/", env!("CARGO_PKG_VERSION"));

/// Shared client for all rate sources; every request is bounded by `timeout`.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

fn request_error(err: reqwest::Error, url: &str) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout(url.to_string())
    } else {
        SourceError::Network(format!("{err} for URL: {url}"))
    }
}

/// Appends `query` to `url`, percent-encoding the values.
fn request_url(url: &str, query: &[(&str, &str)]) -> Result<reqwest::Url, SourceError> {
    let mut parsed = reqwest::Url::parse(url)
        .map_err(|e| SourceError::Network(format!("Invalid URL {url}: {e}")))?;
    if !query.is_empty() {
        parsed.query_pairs_mut().extend_pairs(query);
    }
    Ok(parsed)
}

/// GETs `url` and returns the body of a successful response.
pub(crate) async fn get_text(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<String, SourceError> {
    let request_url = request_url(url, query)?;
    let response = client
        .get(request_url)
        .send()
        .await
        .map_err(|e| request_error(e, url))?;

    debug!(status = %response.status(), url, "Received response");

    if !response.status().is_success() {
        return Err(SourceError::Network(format!(
            "HTTP error: {} for URL: {}",
            response.status(),
            url
        )));
    }

    response.text().await.map_err(|e| request_error(e, url))
}
