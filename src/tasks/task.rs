//! # The task lifecycle contract.
//!
//! Every component the supervisor owns implements [`Task`]. All contract
//! calls are serialized by the supervisor's dispatch lock, run through its
//! guarded wrapper (failures and panics disable the task, nothing
//! propagates), and return an [`Outcome`] describing follow-on work.
//!
//! ## Contract
//! - [`setup`](Task::setup) — once at install and again after every
//!   successful reload of *any* task; must be idempotent.
//! - [`run`](Task::run) — once per poll interval.
//! - [`notify`](Task::notify) — once per fanned-out tag, originator included.
//! - [`receive_shadow`](Task::receive_shadow) — only on the destination
//!   task; implementations must store the record into their local
//!   [`ShadowCache`](crate::tasks::ShadowCache) before task-specific logic.
//! - [`on_message`](Task::on_message) — once per inbound chat event, only
//!   for tasks whose [`Capabilities`] opt in.
//! - [`job`](Task::job) — dispatch for drained deferred jobs; match on the
//!   record's target.

use std::sync::Arc;

use async_trait::async_trait;

use crate::collab::ChatEvent;
use crate::context::Context;
use crate::error::TaskError;
use crate::messages::{JobRecord, Outcome, ShadowRecord, Tag};

/// Shared handle to a task.
pub type TaskRef = Arc<dyn Task>;

/// Optional capabilities a task declares.
///
/// Read once when the instance is registered and stored on the registry
/// entry — the runtime never probes per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Wants [`Task::on_message`] for every inbound chat event.
    pub messages: bool,
}

impl Capabilities {
    /// Capabilities with message handling enabled.
    pub const fn messages() -> Self {
        Self { messages: true }
    }
}

/// # The lifecycle contract.
///
/// Implementations may freely touch their private store and the
/// collaborators on the context; the runtime only ever inspects the
/// returned [`Outcome`].
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use dugout::{Context, Outcome, Tag, Task, TaskError};
///
/// struct Standings;
///
/// #[async_trait]
/// impl Task for Standings {
///     fn name(&self) -> &str {
///         "standings"
///     }
///
///     async fn setup(&self, _ctx: &Context) -> Result<Outcome, TaskError> {
///         Ok(Outcome::empty())
///     }
///
///     async fn run(&self, _ctx: &Context) -> Result<Outcome, TaskError> {
///         // recompute, persist, then tell the runtime something changed
///         Ok(Outcome::changed())
///     }
///
///     async fn notify(&self, tag: Tag, _ctx: &Context) -> Result<Outcome, TaskError> {
///         match tag {
///             Tag::ScoresUpdated => Ok(Outcome::changed()),
///             _ => Ok(Outcome::empty()),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Stable, unique task name — the registry key.
    fn name(&self) -> &str;

    /// Optional capabilities; read once at registration.
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Called once at install time and again after every successful reload
    /// of any task. Idempotent by contract.
    async fn setup(&self, ctx: &Context) -> Result<Outcome, TaskError>;

    /// Called once per poll interval.
    async fn run(&self, ctx: &Context) -> Result<Outcome, TaskError>;

    /// Called once per fanned-out tag, for every healthy task including the
    /// tag's originator.
    async fn notify(&self, tag: Tag, ctx: &Context) -> Result<Outcome, TaskError> {
        let _ = (tag, ctx);
        Ok(Outcome::empty())
    }

    /// Called only on the task named as the record's destination.
    ///
    /// Implementations must absorb the record into their local
    /// [`ShadowCache`](crate::tasks::ShadowCache) before doing anything
    /// task-specific.
    async fn receive_shadow(&self, record: &ShadowRecord, ctx: &Context) -> Result<Outcome, TaskError> {
        let _ = (record, ctx);
        Ok(Outcome::empty())
    }

    /// Called once per inbound chat event when
    /// [`Capabilities::messages`] is set.
    async fn on_message(&self, event: &ChatEvent, ctx: &Context) -> Result<Outcome, TaskError> {
        let _ = (event, ctx);
        Ok(Outcome::empty())
    }

    /// Dispatch for a drained deferred job.
    ///
    /// Match on [`JobRecord::target`]; the default rejects everything, which
    /// counts as a contract failure and disables the owner.
    async fn job(&self, job: &JobRecord, ctx: &Context) -> Result<Outcome, TaskError> {
        let _ = ctx;
        Err(TaskError::UnknownJob {
            target: job.target().to_string(),
        })
    }
}
