use std::time::Duration;

use thiserror::Error;

/// Errors raised while composing or running the startup sequence.
///
/// Every variant that reaches the caller of `StartupSequencer::run` is a
/// fatal startup error: the shell must not become ready.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Two tasks were registered under the same identifier
    #[error("Duplicate startup task id: {0}")]
    DuplicateTask(String),

    /// The task's readiness gate resolved negatively or was abandoned
    #[error("Task '{task}': readiness gate '{gate}' did not open")]
    GateRejected { task: String, gate: String },

    /// The task's fetch failed on every allowed attempt
    #[error("Task '{task}': fetch failed after {attempts} attempt(s)")]
    FetchExhausted {
        task: String,
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    /// The fetched payload could not be transformed. Never retried.
    #[error("Task '{task}': malformed payload")]
    MalformedPayload {
        task: String,
        #[source]
        source: serde_json::Error,
    },

    /// A shared-state sink rejected the published value
    #[error("Task '{task}': publishing {target} failed")]
    PublishFailed {
        task: String,
        target: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// A service initialization call failed
    #[error("Task '{task}': initialization failed")]
    InitFailed {
        task: String,
        #[source]
        source: anyhow::Error,
    },

    /// The whole sequence exceeded the configured startup timeout
    #[error("Startup did not complete within {0:?}")]
    Timeout(Duration),
}

impl StartupError {
    /// Identifier of the task that failed, if the error belongs to one.
    pub fn task(&self) -> Option<&str> {
        match self {
            StartupError::DuplicateTask(task) => Some(task),
            StartupError::GateRejected { task, .. }
            | StartupError::FetchExhausted { task, .. }
            | StartupError::MalformedPayload { task, .. }
            | StartupError::PublishFailed { task, .. }
            | StartupError::InitFailed { task, .. } => Some(task),
            StartupError::Timeout(_) => None,
        }
    }
}
