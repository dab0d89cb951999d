use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::api::{GetUserProfileResponse, UserProfileFetcher};
use crate::domain::UserProfile;
use crate::startup::{InitOperation, StartupError, TaskContext};
use crate::state::Publisher;

/// Fetches the user's profile and publishes it unchanged.
pub struct UserProfileInit {
    fetcher: Arc<dyn UserProfileFetcher>,
    sink: Arc<dyn Publisher<UserProfile>>,
}

impl UserProfileInit {
    pub fn new(fetcher: Arc<dyn UserProfileFetcher>, sink: Arc<dyn Publisher<UserProfile>>) -> Self {
        Self { fetcher, sink }
    }
}

#[async_trait]
impl InitOperation for UserProfileInit {
    async fn run(&self, cx: &TaskContext) -> Result<(), StartupError> {
        let fetcher = &self.fetcher;
        let body = cx.fetch(move || fetcher.get_user_profile()).await?;
        let response: GetUserProfileResponse = cx.transform(|| serde_json::from_value(body))?;
        let profile = response.user_profile;

        info!(
            "👤 User {} (organization: {})",
            profile.user_id,
            profile.organization.as_deref().unwrap_or("none")
        );

        cx.publishing();
        self.sink
            .publish(profile)
            .await
            .map_err(|e| cx.publish_failed("user profile", e))
    }
}
