//! Per-task state tracking.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

/// Lifecycle of a single startup task.
///
/// ```text
/// Pending -> WaitingOnGate? -> Fetching -> (RetryWait <-> Fetching)*
///         -> Transforming -> Publishing -> Done
/// any non-terminal state -> Failed
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    #[default]
    Pending,
    WaitingOnGate,
    Fetching,
    RetryWait,
    Transforming,
    Publishing,
    Done,
    Failed,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Done | TaskState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::WaitingOnGate => "waiting-on-gate",
            TaskState::Fetching => "fetching",
            TaskState::RetryWait => "retry-wait",
            TaskState::Transforming => "transforming",
            TaskState::Publishing => "publishing",
            TaskState::Done => "done",
            TaskState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one task's progress.
#[derive(Debug, Clone, Serialize)]
pub struct TaskStatus {
    pub id: String,
    pub state: TaskState,
    /// Number of fetch attempts started
    pub attempts: u32,
    /// Time from leaving `Pending` to reaching a terminal state
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Option<Duration>,
    #[serde(skip)]
    started: Option<Instant>,
}

fn serialize_millis<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
        None => serializer.serialize_none(),
    }
}

/// Shared board of task states, in registration order.
///
/// Cloning the board shares it; the sequencer writes to it and anyone
/// holding a clone can observe progress while the sequence runs.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    tasks: Arc<Mutex<Vec<TaskStatus>>>,
}

impl StatusBoard {
    fn lock(&self) -> MutexGuard<'_, Vec<TaskStatus>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn insert(&self, id: &str) {
        self.lock().push(TaskStatus {
            id: id.to_string(),
            state: TaskState::Pending,
            attempts: 0,
            elapsed: None,
            started: None,
        });
    }

    pub(super) fn set_state(&self, id: &str, state: TaskState) {
        let mut tasks = self.lock();
        if let Some(status) = tasks.iter_mut().find(|s| s.id == id) {
            if status.state.is_terminal() {
                return;
            }
            if status.started.is_none() {
                status.started = Some(Instant::now());
            }
            if state.is_terminal() {
                status.elapsed = status.started.map(|t| t.elapsed());
            }
            status.state = state;
        }
    }

    pub(super) fn record_attempt(&self, id: &str) {
        let mut tasks = self.lock();
        if let Some(status) = tasks.iter_mut().find(|s| s.id == id) {
            status.attempts += 1;
        }
    }

    /// Current state of a task, if registered.
    #[cfg(test)]
    pub fn state(&self, id: &str) -> Option<TaskState> {
        self.lock().iter().find(|s| s.id == id).map(|s| s.state)
    }

    /// Number of fetch attempts a task has started.
    #[cfg(test)]
    pub fn attempts(&self, id: &str) -> Option<u32> {
        self.lock().iter().find(|s| s.id == id).map(|s| s.attempts)
    }

    pub fn snapshot(&self) -> Vec<TaskStatus> {
        self.lock().clone()
    }
}
