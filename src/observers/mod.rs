//! Observers of runtime events.
//!
//! An [`Observe`] impl is the extension point for reacting to the runtime's
//! own lifecycle events (logging, metrics, alerting). Observers are driven by
//! a single supervisor-owned listener; a panicking observer is isolated and
//! reported, never fatal.

mod log;
mod observe;

pub use log::LogObserver;
pub use observe::Observe;
