//! Authenticated BFF client.
//!
//! `AuthenticatedClient` binds an `ApiClient` to the BFF base URL and the
//! auth provider, so startup fetchers only supply request-specific input.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::client::ApiClient;
use super::{UserProfileFetcher, WorkspaceConfigFetcher};
use crate::auth::AuthProvider;

/// API client bound to the BFF and the process's credentials.
///
/// Cloning shares the underlying `reqwest::Client` and its connection pool.
#[derive(Clone)]
pub struct AuthenticatedClient {
    inner: Arc<ApiClient>,
    base_url: String,
    auth: Arc<AuthProvider>,
}

impl AuthenticatedClient {
    pub fn new(client: ApiClient, base_url: impl Into<String>, auth: Arc<AuthProvider>) -> Self {
        Self {
            inner: Arc::new(client),
            base_url: base_url.into(),
            auth,
        }
    }

    fn access_token(&self) -> Result<&str> {
        self.auth
            .access_token()
            .context("No access token available; authentication has not completed")
    }
}

#[async_trait]
impl WorkspaceConfigFetcher for AuthenticatedClient {
    async fn get_workspace_config(&self, application_path: &str) -> Result<Value> {
        let token = self.access_token()?;
        self.inner
            .get_workspace_config(&self.base_url, token, application_path)
            .await
    }
}

#[async_trait]
impl UserProfileFetcher for AuthenticatedClient {
    async fn get_user_profile(&self) -> Result<Value> {
        let token = self.access_token()?;
        self.inner.get_user_profile(&self.base_url, token).await
    }
}

impl std::fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .finish()
    }
}
