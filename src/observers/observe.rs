//! # Core observer trait.
//!
//! Implementations are called from the supervisor's listener loop, one event
//! at a time. They may be slow (I/O, batching), but they share a single
//! listener — an observer that routinely blocks will delay its peers, so
//! prefer async I/O and quick hand-offs.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for runtime-event observers.
#[async_trait]
pub trait Observe: Send + Sync + 'static {
    /// Handles a single runtime event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
