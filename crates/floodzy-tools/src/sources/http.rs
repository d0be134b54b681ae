//! Shared HTTP plumbing for the upstream sources

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

/// Nominatim's usage policy requires an identifying agent
pub const USER_AGENT: &str = concat!("floodzy/", env!("CARGO_PKG_VERSION"));

const ERROR_PREVIEW_CHARS: usize = 300;

pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Send a GET and decode a JSON body; non-2xx statuses are errors
pub async fn get_json<T: DeserializeOwned>(request: RequestBuilder, source: &str) -> Result<T> {
    let response = request.send().await.map_err(|e| {
        // URLs may carry API keys
        let e = e.without_url();
        error!("{} request failed: {}", source, e);
        anyhow!("{} tidak dapat dihubungi: {}", source, e)
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let preview: String = body.chars().take(ERROR_PREVIEW_CHARS).collect();
        error!("{} returned {}: {}", source, status, preview);
        return Err(anyhow!("{} mengembalikan status {}", source, status));
    }

    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read {} response body", source))?;
    debug!("{} responded with {} bytes", source, body.len());

    serde_json::from_str(&body).with_context(|| format!("{} returned malformed JSON", source))
}
