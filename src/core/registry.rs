//! # Task registry.
//!
//! The shared map of registered tasks, keyed by unique name. Each entry
//! carries the instance plus two pieces of runtime-owned state: the
//! last-activity timestamp and the health flag.
//!
//! ## Rules
//! - Install *replaces* the entry; the old instance is dropped once in-flight
//!   calls against it finish (they run against stale state, by contract).
//! - `healthy` flips to false only through [`Registry::disable`] and back to
//!   true only through a fresh [`Registry::install`] — never auto-reset.
//! - Iteration that calls back into task code never happens under the lock:
//!   callers take a value-type snapshot first.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::tasks::{Capabilities, TaskRef};

/// One registered task.
#[derive(Clone)]
struct Entry {
    task: TaskRef,
    last_activity: DateTime<Utc>,
    healthy: bool,
    capabilities: Capabilities,
}

/// Lock-guarded map of registered tasks.
///
/// A `BTreeMap` keeps the names sorted, which is what gives fan-out its
/// deterministic order.
#[derive(Default)]
pub struct Registry {
    tasks: RwLock<BTreeMap<String, Entry>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Installs (or replaces) the entry for `name`: healthy, stamped `at`,
    /// capabilities read from the instance once.
    pub(crate) async fn install(&self, name: String, task: TaskRef, at: DateTime<Utc>) {
        let capabilities = task.capabilities();
        let entry = Entry {
            task,
            last_activity: at,
            healthy: true,
            capabilities,
        };
        self.tasks.write().await.insert(name, entry);
    }

    /// Flips the named entry to disabled and stamps the failure time.
    pub(crate) async fn disable(&self, name: &str, at: DateTime<Utc>) {
        if let Some(entry) = self.tasks.write().await.get_mut(name) {
            entry.healthy = false;
            entry.last_activity = at;
        }
    }

    /// Advances the named entry's activity timestamp.
    pub(crate) async fn touch(&self, name: &str, at: DateTime<Utc>) {
        if let Some(entry) = self.tasks.write().await.get_mut(name) {
            entry.last_activity = at;
        }
    }

    /// The named task, only while healthy.
    pub(crate) async fn healthy(&self, name: &str) -> Option<TaskRef> {
        let tasks = self.tasks.read().await;
        tasks
            .get(name)
            .filter(|e| e.healthy)
            .map(|e| e.task.clone())
    }

    /// Snapshot of all healthy tasks in sorted-name order.
    pub(crate) async fn healthy_snapshot(&self) -> Vec<(String, TaskRef)> {
        let tasks = self.tasks.read().await;
        tasks
            .iter()
            .filter(|(_, e)| e.healthy)
            .map(|(name, e)| (name.clone(), e.task.clone()))
            .collect()
    }

    /// Snapshot of healthy, message-capable tasks in sorted-name order.
    pub(crate) async fn message_snapshot(&self) -> Vec<(String, TaskRef)> {
        let tasks = self.tasks.read().await;
        tasks
            .iter()
            .filter(|(_, e)| e.healthy && e.capabilities.messages)
            .map(|(name, e)| (name.clone(), e.task.clone()))
            .collect()
    }

    // ---------------------------
    // Observation API
    // ---------------------------

    /// Sorted list of registered task names, health regardless.
    pub async fn names(&self) -> Vec<String> {
        self.tasks.read().await.keys().cloned().collect()
    }

    /// Health of the named task, if registered.
    pub async fn is_healthy(&self, name: &str) -> Option<bool> {
        self.tasks.read().await.get(name).map(|e| e.healthy)
    }

    /// Last-activity timestamp of the named task, if registered.
    pub async fn last_activity(&self, name: &str) -> Option<DateTime<Utc>> {
        self.tasks.read().await.get(name).map(|e| e.last_activity)
    }

    /// The named instance, health regardless (reload tests compare identity).
    pub async fn instance(&self, name: &str) -> Option<TaskRef> {
        self.tasks.read().await.get(name).map(|e| e.task.clone())
    }

    /// Number of registered tasks.
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// True when nothing is registered.
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}
