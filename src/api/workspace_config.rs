//! Workspace config endpoint.

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use super::client::ApiClient;
use super::types::GetWorkspaceConfigRequest;

impl ApiClient {
    /// Fetch the configuration of the workspace serving `application_path`.
    ///
    /// Returns the JSON body undecoded; see [`super::GetWorkspaceConfigResponse`].
    pub async fn get_workspace_config(
        &self,
        base_url: &str,
        access_token: &str,
        application_path: &str,
    ) -> Result<Value> {
        debug!("Fetching workspace config for {}", application_path);
        let body = GetWorkspaceConfigRequest {
            url: application_path.to_string(),
        };

        self.post_json("workspaceConfig", base_url, Some(access_token), &body)
            .await
    }
}
