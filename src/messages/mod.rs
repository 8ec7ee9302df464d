//! Message types passed between the runtime and its tasks.
//!
//! These are the immutable value types of the system — no behavior beyond
//! construction-time validation:
//! - [`Outcome`] — what every contract call returns
//! - [`Tag`] — symbolic notification events
//! - [`ShadowRecord`] — a targeted state hand-off between tasks
//! - [`JobRecord`] — a deferred call drained by the job queue

mod job;
mod outcome;
mod shadow;
mod tag;

pub use job::JobRecord;
pub use outcome::Outcome;
pub use shadow::ShadowRecord;
pub use tag::Tag;
