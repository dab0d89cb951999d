//! User profile endpoint.

use anyhow::Result;
use serde_json::Value;

use super::client::ApiClient;

impl ApiClient {
    /// Fetch the profile of the authenticated user as undecoded JSON.
    pub async fn get_user_profile(&self, base_url: &str, access_token: &str) -> Result<Value> {
        self.get_json("userProfile", base_url, Some(access_token))
            .await
    }
}
