//! # Runtime events emitted by the supervisor and its workers.
//!
//! [`EventKind`] classifies what happened; [`Event`] carries the metadata
//! (timestamp, sequence, task name, reason, tag, count). Every event gets a
//! globally unique, monotonically increasing `seq`, so consumers can restore
//! exact order even when delivery interleaves.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::messages::Tag;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A task was built and registered at install time.
    ///
    /// Sets: `task`.
    TaskInstalled,

    /// A contract call failed; the task is disabled until reload.
    ///
    /// Sets: `task`, `reason` (call label + error message).
    TaskDisabled,

    /// Someone asked the supervisor to hot-reload a task.
    ///
    /// Sets: `task`.
    ReloadRequested,

    /// A fresh instance replaced the registry entry.
    ///
    /// Sets: `task`.
    TaskReloaded,

    /// Reload could not build a fresh instance; previous entry kept.
    ///
    /// Sets: `task`, `reason`.
    ReloadFailed,

    /// A shadow record was addressed to a task that is not registered.
    ///
    /// Sets: `task` (the missing destination), `reason` (the key).
    ShadowDropped,

    /// A tick drained deferred jobs from the queue.
    ///
    /// Sets: `count` (number of jobs drained).
    JobsDrained,

    /// The local calendar day changed between poll ticks.
    DayRolledOver,

    /// Changed task data was committed through the render collaborator.
    PagesCommitted,

    /// The inbound chat stream (re)connected.
    StreamConnected,

    /// The inbound chat stream ended or errored; worker will reconnect.
    ///
    /// Sets: `reason` when an error was observed.
    StreamLost,

    /// Shutdown requested (OS signal or explicit stop).
    ShutdownRequested,

    /// Both workers stopped within the configured grace period.
    AllStoppedWithin,

    /// Grace period elapsed with a worker still running.
    GraceExceeded,
}

/// Runtime event with optional metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Task name, if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (errors, drop details).
    pub reason: Option<Arc<str>>,
    /// Notification tag involved, if any.
    pub tag: Option<Tag>,
    /// Generic count (e.g. drained jobs).
    pub count: Option<u32>,
}

impl Event {
    /// Creates an event of the given kind stamped with the current time and
    /// the next global sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            reason: None,
            tag: None,
            count: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a notification tag.
    #[inline]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Attaches a count.
    #[inline]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }
}
