//! API client for the shell backend-for-frontend (BFF).
//!
//! Only the two calls the startup initializers need are modelled:
//! workspace config by application path, and the user profile.

mod authenticated;
mod client;
mod http;
mod types;
mod user_profile;
mod workspace_config;

pub use authenticated::AuthenticatedClient;
pub use client::ApiClient;
pub use types::{GetUserProfileResponse, GetWorkspaceConfigResponse};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Fetches the workspace configuration for an application path.
///
/// The body is returned as untyped JSON; decoding it into
/// [`GetWorkspaceConfigResponse`] is the caller's transform step, so a
/// response of the wrong shape is not mistaken for a transport failure.
#[async_trait]
pub trait WorkspaceConfigFetcher: Send + Sync {
    async fn get_workspace_config(&self, application_path: &str) -> Result<Value>;
}

/// Fetches the authenticated user's profile as untyped JSON.
#[async_trait]
pub trait UserProfileFetcher: Send + Sync {
    async fn get_user_profile(&self) -> Result<Value>;
}
