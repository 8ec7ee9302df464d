//! # Supervisor: the two driver workers, hot reload, shutdown.
//!
//! The [`Supervisor`] owns the registry, the job queue, the event bus, the
//! factory table and the shared [`Context`]. Two workers drive it:
//!
//! ```text
//! poll worker                         message worker
//!   tick():                             connect (backoff w/ jitter)
//!     swap + drain job queue            read NDJSON events
//!     day-rollover check                decode -> ChatEvent (+receipt time)
//!     periodic run pass                 dispatch on_message
//!     render-if-changed                 reconnect when stream dies
//!        │                                  │
//!        └───────── dispatch lock ──────────┘
//!                (one contract call at a time)
//! ```
//!
//! Both workers serialize every contract call behind the coarse dispatch
//! lock; the registry's own lock is only ever held to mutate or snapshot the
//! map, never across task code.
//!
//! ## Shutdown
//! Stop is cooperative: an OS signal (or [`Supervisor::stop`]) cancels the
//! runtime token, each worker exits at its next check, and `run` waits up to
//! the configured grace before giving up with
//! [`RuntimeError::GraceExceeded`].

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use futures::FutureExt;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::collab::{ChatClient, ChatConnection, ChatEvent, Renderer};
use crate::config::Config;
use crate::context::Context;
use crate::core::dispatch::{panic_message, CallKind};
use crate::core::{shutdown, Registry};
use crate::error::{RuntimeError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::messages::Tag;
use crate::observers::Observe;
use crate::queue::JobQueue;
use crate::tasks::{FactoryRef, TaskRef};

/// Coordinates the task set: polling, messaging, fan-out, fault isolation
/// and hot reload.
pub struct Supervisor {
    cfg: Config,
    pub(crate) registry: Registry,
    pub(crate) queue: JobQueue,
    factories: RwLock<HashMap<String, FactoryRef>>,
    pub(crate) bus: Bus,
    observers: Vec<Arc<dyn Observe>>,
    /// Coarse lock serializing every contract call across both workers.
    dispatch: Mutex<()>,
    pub(crate) ctx: Context,
    stop: CancellationToken,
    pub(crate) tick_changed: AtomicBool,
    last_date: Mutex<NaiveDate>,
    last_run: Mutex<Option<Instant>>,
}

impl Supervisor {
    /// Creates a supervisor with the given config, collaborators and
    /// observers.
    pub fn new(
        cfg: Config,
        renderer: Arc<dyn Renderer>,
        chat: Arc<dyn ChatClient>,
        observers: Vec<Arc<dyn Observe>>,
    ) -> Arc<Self> {
        let bus = Bus::new(cfg.bus_capacity);
        let ctx = Context::new(&cfg, renderer, chat, bus.clone());
        let today = ctx.today();
        Arc::new(Self {
            cfg,
            registry: Registry::new(),
            queue: JobQueue::new(),
            factories: RwLock::new(HashMap::new()),
            bus,
            observers,
            dispatch: Mutex::new(()),
            ctx,
            stop: CancellationToken::new(),
            tick_changed: AtomicBool::new(false),
            last_date: Mutex::new(today),
            last_run: Mutex::new(None),
        })
    }

    /// The shared call context.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// The task registry (observation API).
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The runtime event bus.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Jobs waiting for the next drain.
    pub fn pending_jobs(&self) -> usize {
        self.queue.len()
    }

    /// Registers the factory and installs a first instance of its task.
    ///
    /// The factory is registered even when the first build fails, so a later
    /// reload can still bring the task up.
    pub async fn install(&self, factory: FactoryRef) -> Result<(), TaskError> {
        let name = factory.name().to_string();
        let built = std::panic::catch_unwind(AssertUnwindSafe(|| factory.build(&self.ctx)));
        self.factories.write().await.insert(name.clone(), factory);

        let task: TaskRef = match built {
            Ok(Ok(task)) => task,
            Ok(Err(err)) => {
                warn!(task = %name, reason = %err, "task failed to build at install");
                return Err(err);
            }
            Err(panic) => {
                let info = panic_message(panic);
                warn!(task = %name, reason = %info, "task panicked while building at install");
                return Err(TaskError::Panicked { info });
            }
        };

        self.registry.install(name.clone(), task, self.ctx.now()).await;
        info!(task = %name, "task installed");
        self.bus
            .publish(Event::now(EventKind::TaskInstalled).with_task(name));
        Ok(())
    }

    /// Runs `setup` on every healthy task, fanning out whatever the calls
    /// return. Serialized like any other dispatch.
    pub async fn setup_all(&self) {
        let _guard = self.dispatch.lock().await;
        self.setup_pass().await;
    }

    /// `setup` pass without taking the dispatch lock (caller holds it).
    async fn setup_pass(&self) {
        for (name, _) in self.registry.healthy_snapshot().await {
            // Re-check per dispatch: an earlier setup in this pass may have
            // cascaded into disabling a later task.
            let Some(task) = self.registry.healthy(&name).await else {
                continue;
            };
            let tags = self
                .guarded(&name, CallKind::Setup, task.setup(&self.ctx))
                .await;
            self.fan_tags(tags).await;
        }
    }

    /// One poll tick: drain the job queue, then — when the poll interval has
    /// elapsed — rollover check, `run` pass and render-if-changed.
    ///
    /// Returns true when jobs were drained; the poll worker skips its sleep
    /// in that case so job chains run back-to-back until quiescent.
    pub async fn tick(&self) -> bool {
        let drained = self.queue.swap();
        let had_jobs = !drained.is_empty();

        let _guard = self.dispatch.lock().await;

        if had_jobs {
            self.bus
                .publish(Event::now(EventKind::JobsDrained).with_count(drained.len() as u32));
        }
        for (owner, job) in &drained {
            let Some(task) = self.registry.healthy(owner).await else {
                debug!(task = %owner, job = job.target(), "queued job dropped: owner not active");
                continue;
            };
            let tags = self
                .guarded(owner, CallKind::Job, task.job(job, &self.ctx))
                .await;
            self.fan_tags(tags).await;
        }

        if self.run_due().await {
            self.rollover_check().await;
            for (name, _) in self.registry.healthy_snapshot().await {
                let Some(task) = self.registry.healthy(&name).await else {
                    continue;
                };
                let tags = self.guarded(&name, CallKind::Run, task.run(&self.ctx)).await;
                self.fan_tags(tags).await;
            }
            self.render_if_changed().await;
        }

        had_jobs
    }

    /// Fans one tag through every healthy task; cascades resolve before this
    /// returns. Public entry point takes the dispatch lock.
    pub async fn fan_out_tag(&self, tag: Tag) {
        let _guard = self.dispatch.lock().await;
        self.fan_out(tag).await;
    }

    /// Dispatches one inbound chat event to every healthy, message-capable
    /// task, fanning out whatever the calls return.
    pub async fn handle_message(&self, event: &ChatEvent) {
        let _guard = self.dispatch.lock().await;
        for (name, task) in self.registry.message_snapshot().await {
            if self.registry.healthy(&name).await.is_none() {
                continue;
            }
            let tags = self
                .guarded(&name, CallKind::Message, task.on_message(event, &self.ctx))
                .await;
            self.fan_tags(tags).await;
        }
    }

    /// Asks the control listener to reload the named task.
    pub fn request_reload(&self, name: &str) {
        self.bus
            .publish(Event::now(EventKind::ReloadRequested).with_task(name));
    }

    /// Hot-reloads the named task: builds a fresh instance from its factory
    /// and — only on success — replaces the registry entry, fans the base
    /// tag and re-runs `setup` on every healthy task.
    ///
    /// Returns whether the registry changed. Failure leaves the previous
    /// entry (instance, health, timestamp) untouched.
    pub async fn reload(&self, name: &str) -> bool {
        let _guard = self.dispatch.lock().await;

        let factory = self.factories.read().await.get(name).cloned();
        let Some(factory) = factory else {
            warn!(task = name, "reload requested for unknown task");
            self.bus.publish(
                Event::now(EventKind::ReloadFailed)
                    .with_task(name)
                    .with_reason("no factory registered"),
            );
            return false;
        };

        let built = std::panic::catch_unwind(AssertUnwindSafe(|| factory.build(&self.ctx)));
        let task: TaskRef = match built {
            Ok(Ok(task)) => task,
            Ok(Err(err)) => {
                warn!(task = name, reason = %err, "reload failed; previous instance kept");
                self.bus.publish(
                    Event::now(EventKind::ReloadFailed)
                        .with_task(name)
                        .with_reason(err.as_message()),
                );
                return false;
            }
            Err(panic) => {
                let info = panic_message(panic);
                warn!(task = name, reason = %info, "reload panicked; previous instance kept");
                self.bus.publish(
                    Event::now(EventKind::ReloadFailed)
                        .with_task(name)
                        .with_reason(info),
                );
                return false;
            }
        };

        self.registry
            .install(name.to_string(), task, self.ctx.now())
            .await;
        info!(task = name, "task reloaded");
        self.bus
            .publish(Event::now(EventKind::TaskReloaded).with_task(name));

        // Supervisor-originated: the one place the base tag travels the bus.
        self.fan_out(Tag::Base).await;
        self.setup_pass().await;
        true
    }

    /// Requests cooperative shutdown; workers exit at their next check.
    pub fn stop(&self) {
        self.stop.cancel();
    }

    /// Runs the supervisor: initial `setup` pass, then the poll and message
    /// workers until a termination signal or [`Supervisor::stop`].
    pub async fn run(self: Arc<Self>) -> Result<(), RuntimeError> {
        self.observer_listener();
        self.control_listener();
        self.setup_all().await;

        let mut set = JoinSet::new();
        {
            let me = Arc::clone(&self);
            set.spawn(async move {
                me.poll_loop().await;
                "poll"
            });
        }
        {
            let me = Arc::clone(&self);
            set.spawn(async move {
                me.message_loop().await;
                "message"
            });
        }

        tokio::select! {
            _ = shutdown::wait_for_shutdown_signal() => {
                self.bus.publish(Event::now(EventKind::ShutdownRequested));
                self.stop.cancel();
                self.wait_all_with_grace(&mut set).await
            }
            exited = set.join_next() => {
                if self.stop.is_cancelled() {
                    self.wait_all_with_grace(&mut set).await
                } else {
                    // A driver died without anyone asking for shutdown.
                    let worker = match exited {
                        Some(Ok(name)) => name,
                        _ => "driver",
                    };
                    warn!(worker, "driver worker exited unexpectedly");
                    self.stop.cancel();
                    self.wait_all_with_grace(&mut set).await?;
                    Err(RuntimeError::WorkerLost { worker })
                }
            }
        }
    }

    // ---------------------------
    // Poll worker
    // ---------------------------

    async fn poll_loop(&self) {
        debug!("poll worker started");
        loop {
            if self.stop.is_cancelled() {
                break;
            }
            let had_jobs = self.tick().await;
            if had_jobs {
                // Job chains run back-to-back; sleep only when quiescent.
                continue;
            }
            tokio::select! {
                _ = self.stop.cancelled() => break,
                _ = time::sleep(self.idle_sleep()) => {}
            }
        }
        debug!("poll worker stopped");
    }

    /// Sleep between quiescent ticks; clamped so a zero poll interval (used
    /// by tests driving ticks by hand) cannot spin the loop.
    fn idle_sleep(&self) -> Duration {
        self.cfg.poll_interval.max(Duration::from_millis(25))
    }

    /// True once per poll interval; a zero interval is always due.
    async fn run_due(&self) -> bool {
        let mut last = self.last_run.lock().await;
        let due = match *last {
            None => true,
            Some(at) => at.elapsed() >= self.cfg.poll_interval,
        };
        if due {
            *last = Some(Instant::now());
        }
        due
    }

    /// Fans [`Tag::DayRollover`] when the local calendar day changed.
    async fn rollover_check(&self) {
        let today = self.ctx.today();
        let mut last = self.last_date.lock().await;
        if *last == today {
            return;
        }
        *last = today;
        drop(last);

        info!(%today, "local day rolled over");
        self.bus.publish(Event::now(EventKind::DayRolledOver));
        self.fan_out(Tag::DayRollover).await;
    }

    /// Commits the render collaborator when some task's data changed since
    /// the last commit. Collaborator errors are logged, never propagated.
    async fn render_if_changed(&self) {
        if !self.tick_changed.swap(false, Ordering::Relaxed) {
            return;
        }
        match self.ctx.renderer().commit().await {
            Ok(()) => self.bus.publish(Event::now(EventKind::PagesCommitted)),
            Err(err) => warn!(%err, "render commit failed"),
        }
    }

    // ---------------------------
    // Message worker
    // ---------------------------

    async fn message_loop(&self) {
        debug!("message worker started");
        let mut conn: Option<Box<dyn ChatConnection>> = None;
        let mut attempt: u32 = 0;

        loop {
            if self.stop.is_cancelled() {
                break;
            }

            if conn.is_none() {
                attempt += 1;
                let connected = tokio::select! {
                    _ = self.stop.cancelled() => break,
                    res = self.ctx.chat().connect() => res,
                };
                match connected {
                    Ok(fresh) => {
                        conn = Some(fresh);
                        attempt = 0;
                        self.bus.publish(Event::now(EventKind::StreamConnected));
                    }
                    Err(err) => {
                        let delay = self.cfg.reconnect.delay(attempt);
                        warn!(%err, attempt, ?delay, "chat stream connect failed");
                        tokio::select! {
                            _ = self.stop.cancelled() => break,
                            _ = time::sleep(delay) => {}
                        }
                    }
                }
                continue;
            }

            let Some(live) = conn.as_mut() else { continue };
            let received = tokio::select! {
                _ = self.stop.cancelled() => break,
                res = live.next_event() => res,
            };

            match received {
                Ok(Some(raw)) => match ChatEvent::from_value(raw, self.ctx.now()) {
                    Some(event) => self.handle_message(&event).await,
                    None => debug!("ignoring chat event without a type field"),
                },
                Ok(None) => {
                    warn!("chat stream ended");
                    self.bus.publish(Event::now(EventKind::StreamLost));
                    conn = None;
                }
                Err(err) => {
                    warn!(%err, "chat stream error");
                    self.bus.publish(
                        Event::now(EventKind::StreamLost).with_reason(err.to_string()),
                    );
                    conn = None;
                }
            }
        }
        debug!("message worker stopped");
    }

    // ---------------------------
    // Listeners & shutdown
    // ---------------------------

    /// Forwards bus events to the observers; a panicking observer is
    /// isolated and reported, never fatal.
    fn observer_listener(self: &Arc<Self>) {
        if self.observers.is_empty() {
            return;
        }
        let mut rx = self.bus.subscribe();
        let me = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = me.stop.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => {
                            for obs in &me.observers {
                                let call = AssertUnwindSafe(obs.on_event(&ev)).catch_unwind();
                                if call.await.is_err() {
                                    warn!(observer = obs.name(), "observer panicked");
                                }
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "observer listener lagged");
                        }
                    }
                }
            }
        });
    }

    /// Acts on [`EventKind::ReloadRequested`] published through the context.
    fn control_listener(self: &Arc<Self>) {
        let mut rx = self.bus.subscribe();
        let me = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = me.stop.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) if ev.kind == EventKind::ReloadRequested => {
                            if let Some(name) = ev.task.as_deref() {
                                me.reload(name).await;
                            }
                        }
                        Ok(_) => {}
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "control listener lagged");
                        }
                    }
                }
            }
        });
    }

    /// Waits for the workers to finish within the configured grace period.
    async fn wait_all_with_grace(
        &self,
        set: &mut JoinSet<&'static str>,
    ) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let done = async { while set.join_next().await.is_some() {} };

        match time::timeout(grace, done).await {
            Ok(()) => {
                self.bus.publish(Event::now(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_) => {
                self.bus.publish(Event::now(EventKind::GraceExceeded));
                Err(RuntimeError::GraceExceeded { grace })
            }
        }
    }
}
