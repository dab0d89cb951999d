use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::api::{GetWorkspaceConfigResponse, WorkspaceConfigFetcher};
use crate::domain::{RemoteComponent, Route, SlotMapping, Theme, ThemeProperties, WorkspaceIdentity};
use crate::startup::{InitOperation, StartupError, TaskContext};
use crate::state::{AppState, Publisher};

/// Destinations for everything the workspace configuration yields.
#[derive(Clone)]
pub struct WorkspaceSinks {
    pub workspace: Arc<dyn Publisher<WorkspaceIdentity>>,
    pub routes: Arc<dyn Publisher<Vec<Route>>>,
    pub theme: Arc<dyn Publisher<Theme>>,
    pub remote_components: Arc<dyn Publisher<Vec<RemoteComponent>>>,
    pub slots: Arc<dyn Publisher<Vec<SlotMapping>>>,
}

impl WorkspaceSinks {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            workspace: state.current_workspace.clone(),
            routes: state.routes.clone(),
            theme: state.theme.clone(),
            remote_components: state.remote_components.clone(),
            slots: state.slots.clone(),
        }
    }
}

/// Loads the workspace configuration for the shell's application path.
///
/// The response is decoded after the fetch, and the theme's properties arrive
/// as an embedded JSON string. If either does not parse, the task fails
/// before anything is published and the fetch is not retried.
/// Otherwise slot mappings are handed to the slot registry first, then the
/// four state holders are published concurrently.
pub struct WorkspaceConfigInit {
    fetcher: Arc<dyn WorkspaceConfigFetcher>,
    application_path: String,
    sinks: WorkspaceSinks,
}

impl WorkspaceConfigInit {
    pub fn new(
        fetcher: Arc<dyn WorkspaceConfigFetcher>,
        application_path: impl Into<String>,
        sinks: WorkspaceSinks,
    ) -> Self {
        Self {
            fetcher,
            application_path: application_path.into(),
            sinks,
        }
    }
}

#[async_trait]
impl InitOperation for WorkspaceConfigInit {
    async fn run(&self, cx: &TaskContext) -> Result<(), StartupError> {
        let fetcher = &self.fetcher;
        let path = self.application_path.as_str();
        let body = cx
            .fetch(move || fetcher.get_workspace_config(path))
            .await?;

        let GetWorkspaceConfigResponse {
            workspace,
            routes,
            theme,
            remote_components,
            shell_remote_components,
        } = cx.transform(|| serde_json::from_value::<GetWorkspaceConfigResponse>(body))?;

        let properties =
            cx.transform(|| serde_json::from_str::<ThemeProperties>(&theme.properties))?;
        let theme = Theme {
            name: theme.name,
            favicon_url: theme.favicon_url,
            logo_url: theme.logo_url,
            properties,
        };
        let identity = workspace.identity();

        info!(
            "📦 Workspace '{}' at {}: {} route(s), {} remote component(s)",
            identity.workspace_name,
            identity.base_url,
            routes.len(),
            remote_components.len()
        );

        cx.publishing();
        self.sinks
            .slots
            .publish(shell_remote_components)
            .await
            .map_err(|e| cx.publish_failed("slot mappings", e))?;

        tokio::try_join!(
            async {
                self.sinks
                    .workspace
                    .publish(identity)
                    .await
                    .map_err(|e| cx.publish_failed("workspace identity", e))
            },
            async {
                self.sinks
                    .routes
                    .publish(routes)
                    .await
                    .map_err(|e| cx.publish_failed("routes", e))
            },
            async {
                self.sinks
                    .theme
                    .publish(theme)
                    .await
                    .map_err(|e| cx.publish_failed("theme", e))
            },
            async {
                self.sinks
                    .remote_components
                    .publish(remote_components)
                    .await
                    .map_err(|e| cx.publish_failed("remote components", e))
            },
        )?;
        Ok(())
    }
}
