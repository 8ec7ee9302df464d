//! Reconnect policies for the message worker.
//!
//! Tasks are never retried — a failing task is disabled until reload. The
//! one thing the runtime does retry is the inbound chat stream connection,
//! governed by [`ReconnectPolicy`] with optional [`JitterPolicy`]
//! randomization.

mod jitter;
mod reconnect;

pub use jitter::JitterPolicy;
pub use reconnect::ReconnectPolicy;
