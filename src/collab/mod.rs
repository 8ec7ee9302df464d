//! External collaborators, specified at their boundary only.
//!
//! The runtime treats both collaborators as opaque:
//! - [`Renderer`] consumes page batches produced by tasks; the runtime only
//!   calls [`Renderer::commit`] after a tick that changed task data.
//! - [`ChatClient`] posts outbound messages and yields a [`ChatConnection`]
//!   streaming JSON-shaped inbound events, which the message worker decodes
//!   into [`ChatEvent`]s stamped with the receipt time.
//!
//! Reference implementations live here too: [`JsonlChat`] (newline-delimited
//! JSON over TCP) and [`JsonPages`] (page data written as JSON documents).

mod chat;
mod jsonl;
mod pages;
mod render;

pub use chat::{ChatClient, ChatConnection, ChatEvent};
pub use jsonl::JsonlChat;
pub use pages::JsonPages;
pub use render::{PageSpec, Renderer};

use thiserror::Error;

/// Failures at the collaborator boundary.
///
/// Inside a contract call these convert into `TaskError::Collab`; inside the
/// runtime's own loops they are logged and retried (stream) or logged and
/// dropped (render commit), never health-affecting.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CollabError {
    /// Transport-level I/O failure.
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    /// Inbound event or outbound frame was not valid JSON.
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),

    /// The stream ended and cannot yield further events.
    #[error("stream closed")]
    Closed,
}
