//! One-shot readiness gate.
//!
//! A gate has exactly one writer ([`GateResolver`]) and any number of readers
//! ([`ReadinessGate`]). The resolver is consumed when it resolves, so a gate
//! can only be resolved once. Dropping the resolver without resolving closes
//! the gate, which readers observe as `false`.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Write half of a readiness gate.
#[derive(Debug)]
pub struct GateResolver {
    name: Arc<str>,
    tx: watch::Sender<Option<bool>>,
}

impl GateResolver {
    /// Resolve the gate. Every current and future waiter observes `ready`.
    pub fn resolve(self, ready: bool) {
        if ready {
            info!("🔓 Readiness gate '{}' opened", self.name);
        } else {
            warn!("Readiness gate '{}' resolved as not ready", self.name);
        }
        self.tx.send_replace(Some(ready));
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Read half of a readiness gate. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    name: Arc<str>,
    rx: watch::Receiver<Option<bool>>,
}

impl ReadinessGate {
    /// Create a new, unresolved gate.
    #[allow(clippy::new_ret_no_self)]
    pub fn new(name: impl Into<String>) -> (GateResolver, ReadinessGate) {
        let name: Arc<str> = Arc::from(name.into());
        let (tx, rx) = watch::channel(None);
        (
            GateResolver {
                name: name.clone(),
                tx,
            },
            ReadinessGate { name, rx },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the gate has been resolved (either way).
    pub fn is_resolved(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Wait until the gate resolves and return its value.
    ///
    /// Returns `false` if the resolver was dropped without resolving.
    pub async fn wait(&self) -> bool {
        let mut rx = self.rx.clone();
        let ready = match rx.wait_for(Option::is_some).await {
            Ok(state) => state.unwrap_or(false),
            Err(_) => {
                debug!("Readiness gate '{}' abandoned before resolving", self.name);
                false
            }
        };
        ready
    }
}
