use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use super::http::{decode_json, send_once};

/// Default request timeout in seconds
pub(super) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default shell version (from Cargo.toml)
const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the User-Agent string
fn build_user_agent() -> String {
    std::env::var("SHELL_USER_AGENT")
        .unwrap_or_else(|_| format!("portal-shell/{}", DEFAULT_VERSION))
}

/// HTTP client for the shell BFF
#[derive(Debug)]
pub struct ApiClient {
    pub(super) client: Client,
    pub(super) user_agent: String,
    pub(super) session_id: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(user_agent: Option<String>) -> Result<Self> {
        Self::with_timeout(user_agent, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new API client with a per-request timeout
    pub fn with_timeout(user_agent: Option<String>, timeout: Duration) -> Result<Self> {
        let user_agent = user_agent.unwrap_or_else(build_user_agent);
        let session_id = Uuid::new_v4().to_string();

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            user_agent,
            session_id,
        })
    }

    /// Join `endpoint` onto `base_url`, treating the base as a directory.
    pub(super) fn build_url(base_url: &str, endpoint: &str) -> Result<Url> {
        let mut base =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(endpoint.trim_start_matches('/'))
            .with_context(|| format!("Failed to build URL for endpoint: {}", endpoint))
    }

    fn request(
        &self,
        method: reqwest::Method,
        url: Url,
        access_token: Option<&str>,
        request_id: &str,
    ) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header("Accept", "application/json")
            .header("User-Agent", &self.user_agent)
            .header("x-request-id", request_id)
            .header("x-request-session-id", &self.session_id);

        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// GET a JSON resource
    pub(super) async fn get_json<R>(
        &self,
        endpoint: &str,
        base_url: &str,
        access_token: Option<&str>,
    ) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = Self::build_url(base_url, endpoint)?;
        let request_id = Uuid::new_v4().to_string();

        debug!("=== API Request ===");
        debug!("GET {}", url);

        let request = self.request(reqwest::Method::GET, url.clone(), access_token, &request_id);
        let response = send_once(request, &request_id)
            .await
            .with_context(|| format!("GET {} failed", url))?;
        decode_json(response).await
    }

    /// POST a JSON body and decode the JSON response
    pub(super) async fn post_json<T, R>(
        &self,
        endpoint: &str,
        base_url: &str,
        access_token: Option<&str>,
        body: &T,
    ) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = Self::build_url(base_url, endpoint)?;
        let request_id = Uuid::new_v4().to_string();

        debug!("=== API Request ===");
        debug!("POST {}", url);

        let request = self
            .request(reqwest::Method::POST, url.clone(), access_token, &request_id)
            .json(body);
        let response = send_once(request, &request_id)
            .await
            .with_context(|| format!("POST {} failed", url))?;
        decode_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user_agent() {
        let ua = build_user_agent();
        assert!(ua.starts_with("portal-shell/") || std::env::var("SHELL_USER_AGENT").is_ok());
    }

    #[test]
    fn test_build_url_keeps_base_path() {
        let url = ApiClient::build_url("http://localhost:8080/shell-bff", "workspaceConfig").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/shell-bff/workspaceConfig");

        let url = ApiClient::build_url("http://localhost:8080/shell-bff/", "/userProfile").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/shell-bff/userProfile");

        assert!(ApiClient::build_url("not a url", "userProfile").is_err());
    }
}
