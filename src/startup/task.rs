//! Startup tasks and the context they run in.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::error::StartupError;
use super::gate::ReadinessGate;
use super::retry::{retry_fixed, RetryEvent, RetryPolicy};
use super::status::{StatusBoard, TaskState};

/// The body of a startup task.
///
/// Implementations drive their own fetch → transform → publish pipeline
/// through the [`TaskContext`], which applies the retry policy and records
/// state transitions.
#[async_trait]
pub trait InitOperation: Send + Sync {
    async fn run(&self, cx: &TaskContext) -> Result<(), StartupError>;
}

/// A named startup unit with an optional gate dependency.
pub struct InitTask {
    id: String,
    gate: Option<ReadinessGate>,
    retry: RetryPolicy,
    required: bool,
    operation: Arc<dyn InitOperation>,
}

impl InitTask {
    /// Create a required, ungated task with the default retry policy.
    pub fn new(id: impl Into<String>, operation: impl InitOperation + 'static) -> Self {
        Self {
            id: id.into(),
            gate: None,
            retry: RetryPolicy::default(),
            required: true,
            operation: Arc::new(operation),
        }
    }

    /// Hold the task until `gate` opens.
    pub fn gated_on(mut self, gate: ReadinessGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Mark the task as not required: its failure is reported but does not
    /// block readiness.
    #[allow(dead_code)]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn gate(&self) -> Option<&ReadinessGate> {
        self.gate.as_ref()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub(super) fn operation(&self) -> &dyn InitOperation {
        self.operation.as_ref()
    }
}

impl std::fmt::Debug for InitTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitTask")
            .field("id", &self.id)
            .field("gate", &self.gate.as_ref().map(|g| g.name()))
            .field("retry", &self.retry)
            .field("required", &self.required)
            .finish()
    }
}

/// Handle a running task uses to fetch, transform and publish.
pub struct TaskContext {
    id: String,
    retry: RetryPolicy,
    board: StatusBoard,
}

impl TaskContext {
    pub(super) fn new(id: &str, retry: RetryPolicy, board: StatusBoard) -> Self {
        Self {
            id: id.to_string(),
            retry,
            board,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(super) fn enter(&self, state: TaskState) {
        debug!("[{}] -> {}", self.id, state);
        self.board.set_state(&self.id, state);
    }

    /// Run the task's network fetch under its retry policy.
    pub async fn fetch<T, F, Fut>(&self, op: F) -> Result<T, StartupError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let label = format!("[{}] fetch", self.id);
        retry_fixed(
            self.retry,
            &label,
            |event| match event {
                RetryEvent::Attempt(_) => {
                    self.board.record_attempt(&self.id);
                    self.enter(TaskState::Fetching);
                }
                RetryEvent::Waiting(_) => self.enter(TaskState::RetryWait),
            },
            op,
        )
        .await
        .map_err(|exhausted| {
            warn!(
                "[{}] fetch failed after {} attempt(s): {:#}",
                self.id, exhausted.attempts, exhausted.last_error
            );
            StartupError::FetchExhausted {
                task: self.id.clone(),
                attempts: exhausted.attempts,
                source: exhausted.last_error,
            }
        })
    }

    /// Run the transform step. Failures are not retried.
    pub fn transform<T>(
        &self,
        f: impl FnOnce() -> Result<T, serde_json::Error>,
    ) -> Result<T, StartupError> {
        self.enter(TaskState::Transforming);
        f().map_err(|source| StartupError::MalformedPayload {
            task: self.id.clone(),
            source,
        })
    }

    /// Mark the start of the publish step.
    pub fn publishing(&self) {
        self.enter(TaskState::Publishing);
    }

    /// Wrap a sink error for `target`.
    pub fn publish_failed(&self, target: &'static str, source: anyhow::Error) -> StartupError {
        StartupError::PublishFailed {
            task: self.id.clone(),
            target,
            source,
        }
    }

    /// Wrap a service initialization error.
    pub fn init_failed(&self, source: anyhow::Error) -> StartupError {
        StartupError::InitFailed {
            task: self.id.clone(),
            source,
        }
    }
}
