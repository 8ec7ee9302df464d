//! # Deferred-job records.
//!
//! A [`JobRecord`] names a target on its owning task plus positional and
//! named arguments. The record carries no task identity itself — the job
//! queue pairs it with the owner's name when enqueuing. Dispatch is
//! task-side: `Task::job` matches on the target and returns
//! `TaskError::UnknownJob` for anything it does not implement.
//!
//! Jobs exist so that long multi-step work (download → extract → parse) runs
//! as a chain across ticks instead of blocking the poll loop inside one
//! contract call.

use serde_json::{Map, Value};

use crate::error::RecordError;

/// A deferred call drained by the job queue on a later tick.
#[derive(Debug, Clone)]
pub struct JobRecord {
    target: String,
    args: Vec<Value>,
    kwargs: Map<String, Value>,
}

impl JobRecord {
    /// Creates a job for the given target method name (non-empty).
    pub fn new(target: impl Into<String>) -> Result<Self, RecordError> {
        let target = target.into();
        if target.is_empty() {
            return Err(RecordError::EmptyTarget);
        }
        Ok(Self {
            target,
            args: Vec::new(),
            kwargs: Map::new(),
        })
    }

    /// Appends a positional argument.
    pub fn with_arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Sets a named argument.
    pub fn with_kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }

    /// The target method name on the owning task.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Positional arguments, in order.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Positional argument at `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Named arguments.
    pub fn kwargs(&self) -> &Map<String, Value> {
        &self.kwargs
    }

    /// Named argument by key, if present.
    pub fn kwarg(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }
}
