//! Shared application state.
//!
//! Startup tasks hand their results to these holders through the narrow
//! [`Publisher`] and [`Initialize`] interfaces. Each holder is written by a
//! single task; readers subscribe or query it after startup.

mod configuration;
mod routes;
mod slot;
mod slots;
mod theme;

pub use configuration::{ConfigurationService, DEFAULT_LANG_KEY};
pub use routes::RouteTable;
pub use slot::StateSlot;
pub use slots::SlotRegistry;
pub use theme::ThemeEngine;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{RemoteComponent, UserProfile, WorkspaceIdentity};

/// A sink that accepts a published value.
#[async_trait]
pub trait Publisher<T: Send + 'static>: Send + Sync {
    async fn publish(&self, value: T) -> Result<()>;
}

/// A service with a one-time initialization call.
#[async_trait]
pub trait Initialize: Send + Sync {
    async fn init(&self) -> Result<()>;
}

/// All shared state the shell publishes into during startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub current_workspace: Arc<StateSlot<WorkspaceIdentity>>,
    pub remote_components: Arc<StateSlot<Vec<RemoteComponent>>>,
    pub user_profile: Arc<StateSlot<UserProfile>>,
    pub routes: Arc<RouteTable>,
    pub theme: Arc<ThemeEngine>,
    pub slots: Arc<SlotRegistry>,
    pub configuration: Arc<ConfigurationService>,
}

impl AppState {
    pub fn new(configuration: ConfigurationService) -> Self {
        let remote_components = Arc::new(StateSlot::new("remote components"));
        Self {
            current_workspace: Arc::new(StateSlot::new("current workspace")),
            slots: Arc::new(SlotRegistry::new(remote_components.clone())),
            remote_components,
            user_profile: Arc::new(StateSlot::new("user profile")),
            routes: Arc::new(RouteTable::new()),
            theme: Arc::new(ThemeEngine::new()),
            configuration: Arc::new(configuration),
        }
    }
}
