//! The shell's startup initializers.
//!
//! Four tasks make up the startup sequence:
//! - `workspace-config`: gated on authentication; fetches the workspace
//!   configuration for the application path, parses the theme and publishes
//!   workspace identity, routes, theme and remote components
//! - `user-profile`: gated on authentication; fetches and publishes the
//!   user's profile
//! - `slot-registry-init` and `generic-config-init`: ungated service
//!   initialization calls
//!
//! [`startup_tasks`] wires them to the shared [`AppState`].

mod service;
mod user_profile;
mod workspace_config;

pub use service::ServiceInit;
pub use user_profile::UserProfileInit;
pub use workspace_config::{WorkspaceConfigInit, WorkspaceSinks};

use std::sync::Arc;

use crate::api::{UserProfileFetcher, WorkspaceConfigFetcher};
use crate::startup::{InitTask, ReadinessGate, RetryPolicy};
use crate::state::AppState;

pub const WORKSPACE_CONFIG: &str = "workspace-config";
pub const USER_PROFILE: &str = "user-profile";
pub const SLOT_REGISTRY_INIT: &str = "slot-registry-init";
pub const GENERIC_CONFIG_INIT: &str = "generic-config-init";

/// Remote collaborators the gated initializers fetch from.
#[derive(Clone)]
pub struct Fetchers {
    pub workspace_config: Arc<dyn WorkspaceConfigFetcher>,
    pub user_profile: Arc<dyn UserProfileFetcher>,
}

impl Fetchers {
    /// Use one client for both endpoints.
    pub fn from_client<C>(client: C) -> Self
    where
        C: WorkspaceConfigFetcher + UserProfileFetcher + 'static,
    {
        let client = Arc::new(client);
        Self {
            workspace_config: client.clone(),
            user_profile: client,
        }
    }
}

/// Build the shell's startup task list, in registration order.
///
/// The fetching tasks wait on `auth_gate` and use `retry` for their fetch;
/// service initialization has no fetch and runs immediately.
pub fn startup_tasks(
    state: &AppState,
    fetchers: Fetchers,
    auth_gate: &ReadinessGate,
    retry: RetryPolicy,
    application_path: &str,
) -> Vec<InitTask> {
    vec![
        InitTask::new(
            WORKSPACE_CONFIG,
            WorkspaceConfigInit::new(
                fetchers.workspace_config,
                application_path,
                WorkspaceSinks::from_state(state),
            ),
        )
        .gated_on(auth_gate.clone())
        .with_retry(retry),
        InitTask::new(
            USER_PROFILE,
            UserProfileInit::new(fetchers.user_profile, state.user_profile.clone()),
        )
        .gated_on(auth_gate.clone())
        .with_retry(retry),
        InitTask::new(
            SLOT_REGISTRY_INIT,
            ServiceInit::new("slot registry", state.slots.clone()),
        ),
        InitTask::new(
            GENERIC_CONFIG_INIT,
            ServiceInit::new("configuration", state.configuration.clone()),
        ),
    ]
}
