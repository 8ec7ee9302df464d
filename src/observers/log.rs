//! # Built-in logging observer.
//!
//! Maps runtime events onto `tracing` levels: health and reload transitions
//! are warnings, routine lifecycle is info, chatter is debug.

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::observers::Observe;

/// Logs every runtime event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl LogObserver {
    /// Creates the observer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Observe for LogObserver {
    async fn on_event(&self, event: &Event) {
        let task = event.task.as_deref().unwrap_or("-");
        let reason = event.reason.as_deref().unwrap_or("");

        match event.kind {
            EventKind::TaskDisabled => {
                tracing::warn!(seq = event.seq, task, reason, "task disabled")
            }
            EventKind::ReloadFailed => {
                tracing::warn!(seq = event.seq, task, reason, "reload failed")
            }
            EventKind::GraceExceeded => {
                tracing::warn!(seq = event.seq, "shutdown grace exceeded")
            }
            EventKind::StreamLost => {
                tracing::warn!(seq = event.seq, reason, "chat stream lost")
            }
            EventKind::TaskInstalled => tracing::info!(seq = event.seq, task, "task installed"),
            EventKind::TaskReloaded => tracing::info!(seq = event.seq, task, "task reloaded"),
            EventKind::ReloadRequested => {
                tracing::info!(seq = event.seq, task, "reload requested")
            }
            EventKind::DayRolledOver => tracing::info!(seq = event.seq, "day rolled over"),
            EventKind::StreamConnected => tracing::info!(seq = event.seq, "chat stream connected"),
            EventKind::ShutdownRequested => tracing::info!(seq = event.seq, "shutdown requested"),
            EventKind::AllStoppedWithin => {
                tracing::info!(seq = event.seq, "all workers stopped within grace")
            }
            EventKind::ShadowDropped => {
                tracing::debug!(seq = event.seq, destination = task, key = reason, "shadow dropped")
            }
            EventKind::JobsDrained => {
                tracing::debug!(seq = event.seq, count = event.count.unwrap_or(0), "jobs drained")
            }
            EventKind::PagesCommitted => tracing::debug!(seq = event.seq, "pages committed"),
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
