use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::startup::{InitOperation, StartupError, TaskContext};
use crate::state::Initialize;

/// Runs a service's one-time `init` call as a startup task.
pub struct ServiceInit {
    name: &'static str,
    service: Arc<dyn Initialize>,
}

impl ServiceInit {
    pub fn new(name: &'static str, service: Arc<dyn Initialize>) -> Self {
        Self { name, service }
    }
}

#[async_trait]
impl InitOperation for ServiceInit {
    async fn run(&self, cx: &TaskContext) -> Result<(), StartupError> {
        debug!("[{}] Initializing {}", cx.id(), self.name);
        cx.publishing();
        self.service.init().await.map_err(|e| cx.init_failed(e))
    }
}
