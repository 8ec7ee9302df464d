//! Runtime observability events: types and broadcast bus.
//!
//! These are the runtime's *own* lifecycle events (install, disable, reload,
//! drops, drains, stream health) — not the task-level notification tags,
//! which travel through the supervisor's fan-out instead.
//!
//! - [`EventKind`], [`Event`] — classification and payload metadata
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! Publishers: the supervisor and its two workers. Consumers: the observer
//! listener (fans out to [`Observe`](crate::observers::Observe) impls) and
//! the control listener (acts on [`EventKind::ReloadRequested`]).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
