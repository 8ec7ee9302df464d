//! Shared fixtures: a scriptable probe task, null collaborators, and
//! supervisor builders with a zero poll interval so tests drive ticks by
//! hand.
#![allow(dead_code)] // each test crate uses a subset of the fixtures

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use dugout::{
    Capabilities, ChatClient, ChatConnection, ChatEvent, CollabError, Config, Context, FactoryFn,
    JobRecord, Outcome, PageSpec, Renderer, ShadowCache, ShadowRecord, Supervisor, Tag, Task,
    TaskError, TaskRef,
};

/// Ordered log of contract calls, shared across every probe in a test.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    /// Takes and clears the recorded entries.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// Scriptable task recording every contract call into the shared log.
pub struct ProbeTask {
    name: String,
    caps: Capabilities,
    log: CallLog,
    run_script: Mutex<VecDeque<Result<Outcome, TaskError>>>,
    job_script: Mutex<VecDeque<Outcome>>,
    msg_script: Mutex<VecDeque<Outcome>>,
    notify_replies: HashMap<Tag, Vec<Tag>>,
    fail_calls: HashSet<&'static str>,
    panic_calls: HashSet<&'static str>,
    pub cache: ShadowCache,
}

impl ProbeTask {
    fn gate(&self, call: &'static str) -> Result<(), TaskError> {
        if self.panic_calls.contains(call) {
            panic!("scripted panic in {call}");
        }
        if self.fail_calls.contains(call) {
            return Err(TaskError::fail(format!("scripted {call} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl Task for ProbeTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    async fn setup(&self, _ctx: &Context) -> Result<Outcome, TaskError> {
        self.log.push(format!("{}:setup", self.name));
        self.gate("setup")?;
        Ok(Outcome::empty())
    }

    async fn run(&self, _ctx: &Context) -> Result<Outcome, TaskError> {
        self.log.push(format!("{}:run", self.name));
        self.gate("run")?;
        match self.run_script.lock().unwrap().pop_front() {
            Some(scripted) => scripted,
            None => Ok(Outcome::empty()),
        }
    }

    async fn notify(&self, tag: Tag, _ctx: &Context) -> Result<Outcome, TaskError> {
        self.log.push(format!("{}:notify:{tag}", self.name));
        self.gate("notify")?;
        let mut outcome = Outcome::empty();
        if let Some(replies) = self.notify_replies.get(&tag) {
            for reply in replies {
                outcome = outcome.with_notify(*reply);
            }
        }
        Ok(outcome)
    }

    async fn receive_shadow(
        &self,
        record: &ShadowRecord,
        _ctx: &Context,
    ) -> Result<Outcome, TaskError> {
        self.log.push(format!("{}:shadow:{}", self.name, record.key()));
        self.gate("receive_shadow")?;
        self.cache.absorb(record);
        Ok(Outcome::empty())
    }

    async fn on_message(&self, event: &ChatEvent, _ctx: &Context) -> Result<Outcome, TaskError> {
        self.log.push(format!("{}:msg:{}", self.name, event.kind));
        self.gate("on_message")?;
        match self.msg_script.lock().unwrap().pop_front() {
            Some(scripted) => Ok(scripted),
            None => Ok(Outcome::empty()),
        }
    }

    async fn job(&self, job: &JobRecord, _ctx: &Context) -> Result<Outcome, TaskError> {
        self.log.push(format!("{}:job:{}", self.name, job.target()));
        self.gate("job")?;
        match self.job_script.lock().unwrap().pop_front() {
            Some(scripted) => Ok(scripted),
            None => Ok(Outcome::empty()),
        }
    }
}

/// Builder for [`ProbeTask`].
pub struct ProbeBuilder {
    name: String,
    caps: Capabilities,
    log: CallLog,
    run_script: VecDeque<Result<Outcome, TaskError>>,
    job_script: VecDeque<Outcome>,
    msg_script: VecDeque<Outcome>,
    notify_replies: HashMap<Tag, Vec<Tag>>,
    fail_calls: HashSet<&'static str>,
    panic_calls: HashSet<&'static str>,
}

pub fn probe(name: &str, log: &CallLog) -> ProbeBuilder {
    ProbeBuilder {
        name: name.to_string(),
        caps: Capabilities::default(),
        log: log.clone(),
        run_script: VecDeque::new(),
        job_script: VecDeque::new(),
        msg_script: VecDeque::new(),
        notify_replies: HashMap::new(),
        fail_calls: HashSet::new(),
        panic_calls: HashSet::new(),
    }
}

impl ProbeBuilder {
    /// Opt into the message capability.
    pub fn messages(mut self) -> Self {
        self.caps = Capabilities::messages();
        self
    }

    /// Scripts the next `run` outcome (FIFO; empty afterwards).
    pub fn run_returns(mut self, outcome: Outcome) -> Self {
        self.run_script.push_back(Ok(outcome));
        self
    }

    /// Scripts the next `job` outcome (FIFO; empty afterwards).
    pub fn job_returns(mut self, outcome: Outcome) -> Self {
        self.job_script.push_back(outcome);
        self
    }

    /// Scripts the next `on_message` outcome (FIFO; empty afterwards).
    pub fn msg_returns(mut self, outcome: Outcome) -> Self {
        self.msg_script.push_back(outcome);
        self
    }

    /// Replies with `replies` whenever notified with `on`.
    pub fn notify_reply(mut self, on: Tag, replies: Vec<Tag>) -> Self {
        self.notify_replies.insert(on, replies);
        self
    }

    /// Makes the named contract call fail every time.
    pub fn fail_on(mut self, call: &'static str) -> Self {
        self.fail_calls.insert(call);
        self
    }

    /// Makes the named contract call panic every time.
    pub fn panic_on(mut self, call: &'static str) -> Self {
        self.panic_calls.insert(call);
        self
    }

    pub fn build(self) -> Arc<ProbeTask> {
        Arc::new(ProbeTask {
            name: self.name,
            caps: self.caps,
            log: self.log,
            run_script: Mutex::new(self.run_script),
            job_script: Mutex::new(self.job_script),
            msg_script: Mutex::new(self.msg_script),
            notify_replies: self.notify_replies,
            fail_calls: self.fail_calls,
            panic_calls: self.panic_calls,
            cache: ShadowCache::new(),
        })
    }
}

/// Renderer that accepts and forgets everything.
pub struct NullRenderer;

#[async_trait]
impl Renderer for NullRenderer {
    async fn publish(&self, _pages: Vec<PageSpec>) -> Result<(), CollabError> {
        Ok(())
    }
}

/// Chat client with no gateway behind it.
pub struct NullChat;

#[async_trait]
impl ChatClient for NullChat {
    async fn post(&self, _channel: &str, _text: &str) -> Result<(), CollabError> {
        Ok(())
    }

    async fn connect(&self) -> Result<Box<dyn ChatConnection>, CollabError> {
        Err(CollabError::Closed)
    }
}

/// Config with a zero poll interval: every hand-driven tick runs the pass.
pub fn test_config() -> Config {
    Config {
        poll_interval: Duration::ZERO,
        ..Config::default()
    }
}

/// Supervisor with null collaborators and no tasks.
pub fn bare_supervisor() -> Arc<Supervisor> {
    Supervisor::new(
        test_config(),
        Arc::new(NullRenderer),
        Arc::new(NullChat),
        Vec::new(),
    )
}

/// Supervisor with the given probes installed (factories hand back the same
/// instance on rebuild).
pub async fn supervisor_with(tasks: &[Arc<ProbeTask>]) -> Arc<Supervisor> {
    let sup = bare_supervisor();
    for task in tasks {
        let instance = Arc::clone(task);
        let factory = FactoryFn::arc(task.name().to_string(), move |_ctx: &Context| {
            Ok(Arc::clone(&instance) as TaskRef)
        });
        sup.install(factory).await.expect("probe install");
    }
    sup
}

/// A decoded inbound chat message event.
pub fn chat_message(channel: &str, text: &str) -> ChatEvent {
    ChatEvent::from_value(
        json!({"type": "message", "channel": channel, "text": text}),
        chrono::Utc::now(),
    )
    .expect("typed event")
}
