//! # Shared call context.
//!
//! A [`Context`] is handed to every task contract call. It bundles the
//! clock, the data directory, the two collaborators and a publish handle on
//! the runtime event bus. Cloning is cheap; everything behind it is shared.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::collab::{ChatClient, Renderer};
use crate::config::Config;
use crate::events::{Bus, Event, EventKind};
use crate::store::JsonStore;

/// Runtime context passed to every contract call.
#[derive(Clone)]
pub struct Context {
    started_at: DateTime<Utc>,
    data_dir: PathBuf,
    renderer: Arc<dyn Renderer>,
    chat: Arc<dyn ChatClient>,
    bus: Bus,
}

impl Context {
    pub(crate) fn new(
        cfg: &Config,
        renderer: Arc<dyn Renderer>,
        chat: Arc<dyn ChatClient>,
        bus: Bus,
    ) -> Self {
        Self {
            started_at: Utc::now(),
            data_dir: cfg.data_dir.clone(),
            renderer,
            chat,
            bus,
        }
    }

    /// Current wall-clock time.
    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Current local calendar day (drives day-rollover detection).
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// When the runtime was constructed.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The render collaborator.
    pub fn renderer(&self) -> &Arc<dyn Renderer> {
        &self.renderer
    }

    /// The chat collaborator.
    pub fn chat(&self) -> &Arc<dyn ChatClient> {
        &self.chat
    }

    /// Directory holding per-task persisted documents.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Handle to the calling task's persisted JSON document.
    pub fn store(&self, task: &str) -> JsonStore {
        JsonStore::new(self.data_dir.join(format!("{task}.json")))
    }

    /// Asks the supervisor to hot-reload the named task.
    ///
    /// Fire-and-forget: the control listener picks the request up between
    /// dispatches.
    pub fn request_reload(&self, task: &str) {
        self.bus
            .publish(Event::now(EventKind::ReloadRequested).with_task(task));
    }
}
