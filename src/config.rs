//! # Global runtime configuration.
//!
//! [`Config`] centralizes the supervisor's settings; [`Config::load`] merges
//! an optional TOML file over the defaults.
//!
//! ## Sentinel values
//! - `poll_interval = 0s` → the periodic `run` pass fires on every tick
//!   (used by tests driving ticks by hand; the idle sleep is clamped so the
//!   loop cannot spin).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::policies::ReconnectPolicy;

/// Global configuration for the supervisor runtime.
#[derive(Clone, Debug)]
pub struct Config {
    /// Interval between periodic `run` passes. `0s` = every tick.
    pub poll_interval: Duration,

    /// Maximum wait for the workers to stop after a shutdown signal.
    pub grace: Duration,

    /// Ring-buffer capacity of the runtime event bus (clamped to ≥ 1).
    pub bus_capacity: usize,

    /// Directory holding each task's persisted JSON document.
    pub data_dir: PathBuf,

    /// Output root handed to the reference page renderer.
    pub pages_dir: PathBuf,

    /// Address of the chat gateway (`host:port`).
    pub chat_addr: String,

    /// Backoff between chat stream connection attempts.
    pub reconnect: ReconnectPolicy,
}

impl Default for Config {
    /// - `poll_interval = 60s`
    /// - `grace = 10s`
    /// - `bus_capacity = 1024`
    /// - `data_dir = "data"`, `pages_dir = "pages"`
    /// - `chat_addr = "127.0.0.1:9444"`
    /// - `reconnect = ReconnectPolicy::default()`
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            grace: Duration::from_secs(10),
            bus_capacity: 1024,
            data_dir: PathBuf::from("data"),
            pages_dir: PathBuf::from("pages"),
            chat_addr: "127.0.0.1:9444".to_string(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl Config {
    /// Loads a TOML config file and merges it over the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::default().merged(file))
    }

    /// Applies every field present in the file model.
    fn merged(mut self, file: ConfigFile) -> Self {
        if let Some(secs) = file.poll_secs {
            self.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = file.grace_secs {
            self.grace = Duration::from_secs(secs);
        }
        if let Some(cap) = file.bus_capacity {
            self.bus_capacity = cap;
        }
        if let Some(dir) = file.data_dir {
            self.data_dir = dir;
        }
        if let Some(dir) = file.pages_dir {
            self.pages_dir = dir;
        }
        if let Some(addr) = file.chat_addr {
            self.chat_addr = addr;
        }
        if let Some(ms) = file.reconnect_first_ms {
            self.reconnect.first = Duration::from_millis(ms);
        }
        if let Some(secs) = file.reconnect_max_secs {
            self.reconnect.max = Duration::from_secs(secs);
        }
        self
    }
}

/// TOML-backed file model; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    poll_secs: Option<u64>,
    grace_secs: Option<u64>,
    bus_capacity: Option<usize>,
    data_dir: Option<PathBuf>,
    pages_dir: Option<PathBuf>,
    chat_addr: Option<String>,
    reconnect_first_ms: Option<u64>,
    reconnect_max_secs: Option<u64>,
}
