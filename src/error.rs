//! Error types used by the dugout runtime and its tasks.
//!
//! Three enums cover the taxonomy:
//!
//! - [`RuntimeError`] — failures of the orchestration runtime itself.
//! - [`TaskError`] — failures raised by a task's contract calls.
//! - [`RecordError`] — validation failures when constructing message records.
//!
//! A `TaskError` (or a panic) escaping a contract call never propagates past
//! the supervisor's guarded wrapper: the wrapper logs it, disables the task,
//! and the loops keep running. `as_label`/`as_message` provide stable strings
//! for logs and runtime events.

use std::time::Duration;

use thiserror::Error;

use crate::collab::CollabError;

/// # Errors produced by the runtime itself.
///
/// These are process-level failures, not per-task ones; a misbehaving task
/// surfaces as a disabled registry entry, never as a `RuntimeError`.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period elapsed before the workers stopped.
    #[error("shutdown grace {grace:?} exceeded; forcing termination")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
    },

    /// A driver worker exited abnormally while the runtime was still live.
    #[error("runtime worker {worker} exited abnormally")]
    WorkerLost {
        /// Which worker was lost (`"poll"` or `"message"`).
        worker: &'static str,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
            RuntimeError::WorkerLost { .. } => "runtime_worker_lost",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::GraceExceeded { grace } => {
                format!("grace exceeded after {grace:?}")
            }
            RuntimeError::WorkerLost { worker } => format!("worker lost: {worker}"),
        }
    }
}

/// # Errors produced by task contract calls.
///
/// Any of these escaping a `setup`/`run`/`notify`/`receive_shadow`/
/// `on_message`/`job` call flips the task to `Disabled`. Panics are caught by
/// the same wrapper and reported as [`TaskError::Panicked`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Ordinary execution failure inside a contract call.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// A contract call panicked; the panic payload was captured.
    #[error("panicked: {info}")]
    Panicked {
        /// Panic payload, best-effort stringified.
        info: String,
    },

    /// A deferred job named a target the task does not implement.
    #[error("unknown job target: {target}")]
    UnknownJob {
        /// The unrecognized `JobRecord` target.
        target: String,
    },

    /// A collaborator call (render, chat) failed inside a contract call.
    #[error(transparent)]
    Collab(#[from] CollabError),
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`] from any displayable error.
    pub fn fail(error: impl std::fmt::Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::UnknownJob { .. } => "task_unknown_job",
            TaskError::Collab(_) => "task_collab_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
            TaskError::UnknownJob { target } => format!("unknown job target: {target}"),
            TaskError::Collab(err) => format!("collaborator: {err}"),
        }
    }
}

impl From<std::io::Error> for TaskError {
    fn from(err: std::io::Error) -> Self {
        TaskError::fail(err)
    }
}

impl From<serde_json::Error> for TaskError {
    fn from(err: serde_json::Error) -> Self {
        TaskError::fail(err)
    }
}

/// Validation failures for the message record constructors.
///
/// Records are validated once, at construction; the runtime never re-checks
/// them in flight.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// Shadow record destination was empty.
    #[error("shadow destination must be a non-empty task name")]
    EmptyDestination,

    /// Shadow record key was empty.
    #[error("shadow key must be non-empty")]
    EmptyKey,

    /// Job record target was empty.
    #[error("job target must be non-empty")]
    EmptyTarget,
}

/// Errors raised while loading the runtime configuration file.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("reading config {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config file was not valid TOML for the expected model.
    #[error("parsing config {path}: {source}")]
    Parse {
        /// Path that failed to parse.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}
