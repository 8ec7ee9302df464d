//! # dugout
//!
//! **Dugout** is the orchestration runtime of a league companion daemon. It
//! owns a set of independent task components — file downloader, score
//! parser, standings tracker, logging dashboard and friends — polls each on
//! a fixed interval, reacts to an inbound chat event stream, and lets tasks
//! trigger follow-on work in one another while a failing task can never
//! take down its siblings.
//!
//! ## Architecture
//! ```text
//!     ┌─────────────┐   ┌─────────────┐   ┌─────────────┐
//!     │  Task impl  │   │  Task impl  │   │  Task impl  │
//!     │ (downloader)│   │  (scores)   │   │ (standings) │
//!     └──────┬──────┘   └──────┬──────┘   └──────┬──────┘
//!            ▼                 ▼                 ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                  │
//! │  - Registry (name → instance, last-activity, healthy)        │
//! │  - guarded dispatch (failures disable, never propagate)      │
//! │  - notification fan-out (sorted order, cascades first)       │
//! │  - shadow delivery (deep-copied into the destination)        │
//! │  - JobQueue (swap-drained once per tick)                     │
//! │  - hot reload (factory-built replacement entries)            │
//! └──────┬────────────────────────────┬─────────────────┬────────┘
//!        │ poll worker                │ message worker  │
//!        │  tick: jobs → run pass     │  NDJSON stream  │
//!        │  day rollover, render      │  → on_message   │
//!        ▼                            ▼                 ▼
//!   Renderer (pages)            ChatClient         Bus → Observe
//!   commit-if-changed           post/connect       (runtime events)
//! ```
//!
//! ## Lifecycle contract
//! Every task implements [`Task`]: `setup` (install + after any reload),
//! `run` (once per poll interval), `notify` (per fanned-out [`Tag`]),
//! `receive_shadow` (per [`ShadowRecord`] addressed to it), `on_message`
//! (per inbound [`ChatEvent`], capability-gated) and `job` (per drained
//! [`JobRecord`]). Each call returns an [`Outcome`]; the runtime inspects
//! nothing else.
//!
//! ## Fault isolation
//! `Healthy → Disabled` on any uncaught failure, `Disabled → Healthy` only
//! through an explicit reload. A disabled task is skipped by every loop
//! until then; the rest of the process is unaffected.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use dugout::{
//!     Config, Context, FactoryFn, JsonPages, JsonlChat, LogObserver, Outcome, Supervisor,
//!     Task, TaskError, TaskRef,
//! };
//! use async_trait::async_trait;
//!
//! struct Heartbeat;
//!
//! #[async_trait]
//! impl Task for Heartbeat {
//!     fn name(&self) -> &str { "heartbeat" }
//!     async fn setup(&self, _ctx: &Context) -> Result<Outcome, TaskError> { Ok(Outcome::empty()) }
//!     async fn run(&self, _ctx: &Context) -> Result<Outcome, TaskError> { Ok(Outcome::changed()) }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default();
//!     let renderer = Arc::new(JsonPages::new(cfg.pages_dir.clone()));
//!     let chat = Arc::new(JsonlChat::new(cfg.chat_addr.clone()));
//!     let sup = Supervisor::new(cfg, renderer, chat, vec![Arc::new(LogObserver::new())]);
//!
//!     sup.install(FactoryFn::arc("heartbeat", |_ctx| Ok(Arc::new(Heartbeat) as TaskRef)))
//!         .await?;
//!     sup.run().await?;
//!     Ok(())
//! }
//! ```

mod collab;
mod config;
mod context;
mod core;
mod error;
mod events;
mod messages;
mod observers;
mod policies;
mod queue;
mod store;
mod tasks;

pub mod logging;

// ---- Public re-exports ----

pub use collab::{
    ChatClient, ChatConnection, ChatEvent, CollabError, JsonPages, JsonlChat, PageSpec, Renderer,
};
pub use config::Config;
pub use context::Context;
pub use crate::core::{Registry, Supervisor};
pub use error::{ConfigError, RecordError, RuntimeError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use messages::{JobRecord, Outcome, ShadowRecord, Tag};
pub use observers::{LogObserver, Observe};
pub use policies::{JitterPolicy, ReconnectPolicy};
pub use store::JsonStore;
pub use tasks::{Capabilities, FactoryFn, FactoryRef, ShadowCache, Task, TaskFactory, TaskRef};
