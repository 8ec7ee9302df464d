//! Process entrypoint: config, logging, collaborators, the fixed task set.
//!
//! Domain tasks (downloader, parser, trackers) register here exactly like
//! the two built-ins below — one factory per task name.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::json;

use dugout::{
    Capabilities, ChatEvent, Config, Context, FactoryFn, FactoryRef, JsonPages, JsonlChat,
    LogObserver, Outcome, PageSpec, ShadowCache, Supervisor, Tag, Task, TaskError, TaskRef,
};

#[derive(Debug, Parser)]
#[command(name = "dugout", about = "League companion orchestration daemon")]
struct Cli {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the data directory from the config.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (overrides DUGOUT_LOG).
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("dugout error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dugout::logging::init(cli.log_level.map(Into::into));

    let mut cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dir) = cli.data_dir {
        cfg.data_dir = dir;
    }

    let renderer = Arc::new(JsonPages::new(cfg.pages_dir.clone()));
    let chat = Arc::new(JsonlChat::new(cfg.chat_addr.clone()));
    let sup = Supervisor::new(cfg, renderer, chat, vec![Arc::new(LogObserver::new())]);

    for factory in always_present_tasks() {
        if let Err(err) = sup.install(factory).await {
            // The process stays up; the factory is registered, so a later
            // `!reload` can still bring the task in.
            tracing::error!(%err, "task install failed");
        }
    }

    sup.run().await?;
    Ok(())
}

/// The fixed set of tasks installed on every start.
fn always_present_tasks() -> Vec<FactoryRef> {
    vec![
        FactoryFn::arc("status", |_ctx| {
            Ok(Arc::new(StatusTask::new()) as TaskRef)
        }) as FactoryRef,
        FactoryFn::arc("ops", |_ctx| Ok(Arc::new(OpsTask) as TaskRef)) as FactoryRef,
    ]
}

/// Persisted bookkeeping for the status dashboard.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StatusDoc {
    ticks: u64,
    days: u64,
}

/// Dashboard task: counts ticks and days, publishes a status page.
struct StatusTask {
    shadows: ShadowCache,
}

impl StatusTask {
    fn new() -> Self {
        Self {
            shadows: ShadowCache::new(),
        }
    }

    async fn publish_page(&self, ctx: &Context, doc: &StatusDoc) -> Result<(), TaskError> {
        let page = PageSpec::new(
            "status.json",
            "Runtime status",
            "status",
            json!({
                "ticks": doc.ticks,
                "days": doc.days,
                "started_at": ctx.started_at().to_rfc3339(),
                "cached_keys": self.shadows.len(),
            }),
        );
        ctx.renderer().publish(vec![page]).await?;
        Ok(())
    }
}

#[async_trait]
impl Task for StatusTask {
    fn name(&self) -> &str {
        "status"
    }

    async fn setup(&self, ctx: &Context) -> Result<Outcome, TaskError> {
        let doc: StatusDoc = ctx.store(self.name()).load_or_default().await?;
        self.publish_page(ctx, &doc).await?;
        Ok(Outcome::empty())
    }

    async fn run(&self, ctx: &Context) -> Result<Outcome, TaskError> {
        let store = ctx.store(self.name());
        let mut doc: StatusDoc = store.load_or_default().await?;
        doc.ticks += 1;
        store.save(&doc).await?;
        self.publish_page(ctx, &doc).await?;
        Ok(Outcome::changed().with_log(format!("tick {}", doc.ticks)))
    }

    async fn notify(&self, tag: Tag, ctx: &Context) -> Result<Outcome, TaskError> {
        if tag != Tag::DayRollover {
            return Ok(Outcome::empty());
        }
        let store = ctx.store(self.name());
        let mut doc: StatusDoc = store.load_or_default().await?;
        doc.days += 1;
        store.save(&doc).await?;
        Ok(Outcome::changed())
    }

    async fn receive_shadow(
        &self,
        record: &dugout::ShadowRecord,
        _ctx: &Context,
    ) -> Result<Outcome, TaskError> {
        self.shadows.absorb(record);
        Ok(Outcome::changed())
    }
}

/// Ops task: chat-driven administration (`!reload <task>`).
struct OpsTask;

#[async_trait]
impl Task for OpsTask {
    fn name(&self) -> &str {
        "ops"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::messages()
    }

    async fn setup(&self, _ctx: &Context) -> Result<Outcome, TaskError> {
        Ok(Outcome::empty())
    }

    async fn run(&self, _ctx: &Context) -> Result<Outcome, TaskError> {
        Ok(Outcome::empty())
    }

    async fn on_message(&self, event: &ChatEvent, ctx: &Context) -> Result<Outcome, TaskError> {
        if !event.is("message") {
            return Ok(Outcome::empty());
        }
        let Some(text) = event.text.as_deref() else {
            return Ok(Outcome::empty());
        };
        let Some(target) = text.strip_prefix("!reload ").map(str::trim) else {
            return Ok(Outcome::empty());
        };
        if target.is_empty() {
            return Ok(Outcome::empty());
        }

        ctx.request_reload(target);
        if let Some(channel) = event.channel.as_deref() {
            if let Err(err) = ctx.chat().post(channel, &format!("reloading {target}")).await {
                return Ok(Outcome::empty().with_log(format!("ack post failed: {err}")));
            }
        }
        Ok(Outcome::empty().with_log(format!("reload requested for {target}")))
    }
}
