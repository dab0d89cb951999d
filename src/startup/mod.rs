//! Startup sequencing.
//!
//! The shell becomes ready only after a fixed set of initialization tasks has
//! settled:
//! - workspace-config and user-profile wait for authentication, then fetch
//!   from the BFF (with retry) and publish into shared state
//! - slot-registry-init and generic-config-init run immediately
//!
//! The sequencer is fail-fast on required tasks: any permanent failure is
//! surfaced to the caller as a fatal startup error.

mod error;
mod gate;
mod retry;
mod sequencer;
mod status;
mod task;

pub use error::StartupError;
pub use gate::{GateResolver, ReadinessGate};
pub use retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};
pub use sequencer::{StartupReport, StartupSequencer};
pub use status::TaskState;
pub use task::{InitOperation, InitTask, TaskContext};
