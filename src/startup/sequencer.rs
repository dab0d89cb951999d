use std::collections::HashSet;
use std::error::Error as _;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::error::StartupError;
use super::status::{StatusBoard, TaskState, TaskStatus};
use super::task::{InitTask, TaskContext};

/// Summary of a completed startup sequence.
#[derive(Debug, Clone, Serialize)]
pub struct StartupReport {
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub tasks: Vec<TaskStatus>,
}

impl StartupReport {
    /// Tasks that failed without blocking readiness.
    pub fn degraded(&self) -> impl Iterator<Item = &TaskStatus> {
        self.tasks.iter().filter(|t| t.state == TaskState::Failed)
    }
}

/// Runs the registered startup tasks once and gates readiness on them.
///
/// All tasks are polled concurrently on the caller's task. Gated tasks park
/// until their gate opens; ungated tasks start immediately. `run` consumes
/// the sequencer, so no task can run twice.
///
/// # Example
/// ```ignore
/// let mut sequencer = StartupSequencer::new();
/// sequencer.register(tasks)?;
/// let report = sequencer.run().await?;
/// ```
#[derive(Debug, Default)]
pub struct StartupSequencer {
    tasks: Vec<InitTask>,
    board: StatusBoard,
    timeout: Option<Duration>,
}

impl StartupSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the whole sequence if it has not settled within `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Register tasks. Identifiers must be unique across every call; on a
    /// duplicate nothing from this call is registered.
    pub fn register(&mut self, tasks: Vec<InitTask>) -> Result<(), StartupError> {
        {
            let mut seen: HashSet<&str> = self.tasks.iter().map(InitTask::id).collect();
            for task in &tasks {
                if !seen.insert(task.id()) {
                    return Err(StartupError::DuplicateTask(task.id().to_string()));
                }
            }
        }

        for task in &tasks {
            debug!(
                "Registered startup task '{}' (gate: {}, required: {})",
                task.id(),
                task.gate().map(|g| g.name()).unwrap_or("none"),
                task.is_required()
            );
            self.board.insert(task.id());
        }
        self.tasks.extend(tasks);
        Ok(())
    }

    /// Shared view of task progress, usable while `run` is in flight.
    pub fn status_board(&self) -> StatusBoard {
        self.board.clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run every task to completion or permanent failure.
    ///
    /// Returns the error of the first failed required task (in registration
    /// order) once all tasks have settled. Already-published state from other
    /// tasks is left in place.
    pub async fn run(self) -> Result<StartupReport, StartupError> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let StartupSequencer {
            tasks,
            board,
            timeout,
        } = self;

        info!("🚀 Running {} startup task(s)...", tasks.len());

        let runs = join_all(tasks.iter().map(|task| run_task(task, &board)));
        let outcomes = match timeout {
            Some(limit) => tokio::time::timeout(limit, runs).await.map_err(|_| {
                error!("❌ Startup did not complete within {:?}", limit);
                for status in board.snapshot() {
                    if !status.state.is_terminal() {
                        error!("   Task '{}' stuck in {}", status.id, status.state);
                    }
                }
                StartupError::Timeout(limit)
            })?,
            None => runs.await,
        };

        let mut fatal = None;
        for (task, outcome) in tasks.iter().zip(outcomes) {
            let Err(err) = outcome else { continue };
            if task.is_required() {
                error!("❌ {}", error_chain(&err));
                fatal.get_or_insert(err);
            } else {
                warn!("⚠️  Optional task '{}' failed: {}", task.id(), err);
            }
        }
        if let Some(err) = fatal {
            return Err(err);
        }

        let elapsed = clock.elapsed();
        info!("✅ Startup complete in {:?}", elapsed);
        Ok(StartupReport {
            started_at,
            elapsed_ms: elapsed.as_millis() as u64,
            tasks: board.snapshot(),
        })
    }
}

/// Render an error with its source chain, `outer: inner: root`.
fn error_chain(err: &StartupError) -> String {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain.join(": ")
}

async fn run_task(task: &InitTask, board: &StatusBoard) -> Result<(), StartupError> {
    let cx = TaskContext::new(task.id(), task.retry_policy(), board.clone());

    if let Some(gate) = task.gate() {
        if !gate.is_resolved() {
            debug!("[{}] waiting on gate '{}'", task.id(), gate.name());
        }
        cx.enter(TaskState::WaitingOnGate);
        if !gate.wait().await {
            cx.enter(TaskState::Failed);
            return Err(StartupError::GateRejected {
                task: task.id().to_string(),
                gate: gate.name().to_string(),
            });
        }
    }

    let result = task.operation().run(&cx).await;
    match &result {
        Ok(()) => {
            cx.enter(TaskState::Done);
            debug!("Startup task '{}' done", task.id());
        }
        Err(_) => cx.enter(TaskState::Failed),
    }
    result
}
