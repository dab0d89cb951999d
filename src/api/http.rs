use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use super::types::ApiError;

/// Send a request once and return the successful response.
///
/// Transport errors and non-2xx responses are both failures; retrying is the
/// caller's concern. Error bodies are folded into an [`ApiError`].
pub(super) async fn send_once(
    request: reqwest::RequestBuilder,
    request_id: &str,
) -> Result<reqwest::Response> {
    let response = request.send().await.map_err(|err| {
        let kind = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "could not connect"
        } else {
            "failed"
        };
        debug!("HTTP request {} {}: {}", request_id, kind, err);
        anyhow::Error::new(err).context(format!("HTTP request {}", kind))
    })?;

    let status = response.status();
    debug!("=== API Response ===");
    debug!("Status: {} (request {})", status, request_id);

    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    let api_error =
        ApiError::from_http_response(status.as_u16(), error_text, Some(request_id.to_string()));
    let request_id = api_error.request_id.as_deref().unwrap_or("-");
    if api_error.is_auth_error() {
        error!("❌ {} (request {})", api_error.message, request_id);
    } else {
        debug!(
            "API request {} failed with HTTP {}: {}",
            request_id, api_error.http_status, api_error.message
        );
    }
    Err(api_error.into())
}

/// Decode a JSON response body.
pub(super) async fn decode_json<R>(response: reqwest::Response) -> Result<R>
where
    R: DeserializeOwned,
{
    let response_text = response
        .text()
        .await
        .context("Failed to read response body")?;
    serde_json::from_str(&response_text).context("Failed to parse API response")
}
