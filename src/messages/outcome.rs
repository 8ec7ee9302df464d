//! # Outcome: what every contract call returns.
//!
//! An [`Outcome`] bundles everything a task wants the runtime to do after a
//! contract call: notification tags to fan out (order-preserving), shadow
//! records to deliver, deferred jobs to enqueue, and debug log lines.
//!
//! ## Rules
//! - Any tag in `notify` — including [`Tag::Base`] — marks the outcome as a
//!   state change and advances the task's activity timestamp.
//! - `Tag::Base` itself is consumed by the supervisor and never re-fanned
//!   through the bus; [`fanout_tags`](Outcome::fanout_tags) filters it.

use crate::messages::{JobRecord, ShadowRecord, Tag};

/// Result of a single task contract call.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    /// Tags to fan out, in order. May be empty.
    pub notify: Vec<Tag>,
    /// Shadow records to deliver, in order.
    pub shadows: Vec<ShadowRecord>,
    /// Deferred jobs to enqueue for a later tick.
    pub jobs: Vec<JobRecord>,
    /// Debug log lines, surfaced via the runtime's logger.
    pub log: Vec<String>,
}

impl Outcome {
    /// An outcome that asks the runtime for nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An outcome that only signals "my data changed" ([`Tag::Base`]).
    pub fn changed() -> Self {
        Self::empty().with_notify(Tag::Base)
    }

    /// Appends a notification tag.
    pub fn with_notify(mut self, tag: Tag) -> Self {
        self.notify.push(tag);
        self
    }

    /// Appends a shadow record.
    pub fn with_shadow(mut self, record: ShadowRecord) -> Self {
        self.shadows.push(record);
        self
    }

    /// Appends a deferred job.
    pub fn with_job(mut self, job: JobRecord) -> Self {
        self.jobs.push(job);
        self
    }

    /// Appends a debug log line.
    pub fn with_log(mut self, line: impl Into<String>) -> Self {
        self.log.push(line.into());
        self
    }

    /// True when the outcome carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.notify.is_empty() && self.shadows.is_empty() && self.jobs.is_empty() && self.log.is_empty()
    }

    /// True when the outcome signals a notify-worthy state change.
    ///
    /// Any tag counts, the base tag included.
    pub fn signals_change(&self) -> bool {
        !self.notify.is_empty()
    }

    /// Tags eligible for fan-out: everything in `notify` except the base tag.
    pub fn fanout_tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.notify.iter().copied().filter(|tag| !tag.is_base())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_signals_nothing() {
        let outcome = Outcome::empty();
        assert!(outcome.is_empty());
        assert!(!outcome.signals_change());
        assert_eq!(outcome.fanout_tags().count(), 0);
    }

    #[test]
    fn base_signals_change_but_never_fans() {
        let outcome = Outcome::changed();
        assert!(outcome.signals_change());
        assert_eq!(outcome.fanout_tags().count(), 0);
    }

    #[test]
    fn fanout_preserves_order_and_filters_base() {
        let outcome = Outcome::empty()
            .with_notify(Tag::DownloadFinished)
            .with_notify(Tag::Base)
            .with_notify(Tag::ScoresUpdated);

        let tags: Vec<Tag> = outcome.fanout_tags().collect();
        assert_eq!(tags, vec![Tag::DownloadFinished, Tag::ScoresUpdated]);
    }
}
