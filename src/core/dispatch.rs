//! # Guarded dispatch: fault isolation, outcome processing, fan-out.
//!
//! Every contract call in the system funnels through [`Supervisor::guarded`].
//! It is the single place health transitions happen: an `Err` return or a
//! panic disables the task, stamps the failure time, publishes
//! `TaskDisabled`, and is swallowed — the driver loops never abort because
//! one task misbehaved.
//!
//! ## Outcome processing
//! A successful call's [`Outcome`] is absorbed in place: the activity
//! timestamp advances when the outcome signals change, log lines surface via
//! `tracing`, shadow records are delivered immediately (in list order), jobs
//! are enqueued for the next drain — and the outcome's fan-out tags are
//! *returned to the caller* rather than fanned inline.
//!
//! ## Cascade order
//! [`Supervisor::fan_out`] runs one sorted pass over the tasks that were
//! healthy at fan-out start; tags returned by those `notify` calls are
//! collected and fanned after the pass, in order, recursively. The whole
//! cascade therefore resolves inside the originating dispatch, before any
//! sibling outcome is looked at:
//!
//! ```text
//! a.run -> [TAG1]
//!   fan_out(TAG1):  a.notify(TAG1)  b.notify(TAG1) -> [TAG2]  c.notify(TAG1)
//!   fan_out(TAG2):  a.notify(TAG2)  b.notify(TAG2)            c.notify(TAG2)
//! (only then does the tick move on to b.run)
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::atomic::Ordering;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, warn};

use crate::core::Supervisor;
use crate::error::TaskError;
use crate::events::{Event, EventKind};
use crate::messages::{Outcome, ShadowRecord, Tag};

/// Which contract method a guarded call is running (logs/events only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallKind {
    Setup,
    Run,
    Notify,
    Shadow,
    Message,
    Job,
}

impl CallKind {
    pub(crate) fn as_label(&self) -> &'static str {
        match self {
            CallKind::Setup => "setup",
            CallKind::Run => "run",
            CallKind::Notify => "notify",
            CallKind::Shadow => "receive_shadow",
            CallKind::Message => "on_message",
            CallKind::Job => "job",
        }
    }
}

impl Supervisor {
    /// Runs one contract call with fault isolation.
    ///
    /// Returns the tags the caller still has to fan out; an empty vec on
    /// failure (the task is already disabled by then).
    pub(crate) async fn guarded<F>(&self, name: &str, kind: CallKind, call: F) -> Vec<Tag>
    where
        F: std::future::Future<Output = Result<Outcome, TaskError>>,
    {
        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(Ok(outcome)) => self.absorb_outcome(name, outcome).await,
            Ok(Err(err)) => {
                self.quarantine(name, kind, err.as_message()).await;
                Vec::new()
            }
            Err(panic) => {
                self.quarantine(name, kind, panic_message(panic)).await;
                Vec::new()
            }
        }
    }

    /// Disables a task after an uncaught failure.
    async fn quarantine(&self, name: &str, kind: CallKind, reason: String) {
        warn!(
            task = name,
            call = kind.as_label(),
            reason = %reason,
            "contract call failed; task disabled until reload"
        );
        self.registry.disable(name, self.ctx.now()).await;
        self.bus.publish(
            Event::now(EventKind::TaskDisabled)
                .with_task(name)
                .with_reason(format!("{}: {reason}", kind.as_label())),
        );
    }

    /// Absorbs a successful outcome; returns its pending fan-out tags.
    ///
    /// Boxed because shadow delivery recurses back through [`guarded`].
    fn absorb_outcome<'a>(&'a self, origin: &'a str, outcome: Outcome) -> BoxFuture<'a, Vec<Tag>> {
        Box::pin(async move {
            if outcome.signals_change() {
                self.registry.touch(origin, self.ctx.now()).await;
                self.tick_changed.store(true, Ordering::Relaxed);
            }
            for line in &outcome.log {
                debug!(task = origin, "{line}");
            }

            let mut tags: Vec<Tag> = outcome.fanout_tags().collect();
            for record in &outcome.shadows {
                tags.extend(self.deliver_shadow(record).await);
            }
            for job in outcome.jobs {
                debug!(task = origin, job = job.target(), "job deferred");
                self.queue.push(origin, job);
            }
            tags
        })
    }

    /// Delivers one shadow record to its destination, if registered.
    async fn deliver_shadow(&self, record: &ShadowRecord) -> Vec<Tag> {
        let Some(task) = self.registry.healthy(record.destination()).await else {
            debug!(
                destination = record.destination(),
                key = record.key(),
                "shadow record dropped: destination not active"
            );
            self.bus.publish(
                Event::now(EventKind::ShadowDropped)
                    .with_task(record.destination())
                    .with_reason(record.key().to_string()),
            );
            return Vec::new();
        };
        self.guarded(
            record.destination(),
            CallKind::Shadow,
            task.receive_shadow(record, &self.ctx),
        )
        .await
    }

    /// Fans a tag to every task healthy at fan-out start, in sorted-name
    /// order, then resolves the collected cascade.
    ///
    /// The base tag only arrives here supervisor-originated (reload); tags
    /// coming out of outcomes are pre-filtered.
    pub(crate) fn fan_out(&self, tag: Tag) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let pass = self.registry.healthy_snapshot().await;
            let mut cascade: Vec<Tag> = Vec::new();
            for (name, task) in pass {
                let further = self
                    .guarded(&name, CallKind::Notify, task.notify(tag, &self.ctx))
                    .await;
                cascade.extend(further);
            }
            for next in cascade {
                self.fan_out(next).await;
            }
        })
    }

    /// Fans every tag in order, each cascade resolving before the next tag.
    pub(crate) async fn fan_tags(&self, tags: Vec<Tag>) {
        for tag in tags {
            self.fan_out(tag).await;
        }
    }
}

/// Best-effort stringification of a caught panic payload.
pub(crate) fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
