//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Level resolution order:
//! 1. explicit level passed by the caller (CLI flag)
//! 2. `DUGOUT_LOG` environment variable (e.g. "info", "debug")
//! 3. default `info`

use tracing::Level;

/// Installs the global subscriber. Call once at startup; a second call
/// panics (the subscriber slot is global).
pub fn init(cli_level: Option<Level>) {
    let level = cli_level
        .or_else(|| {
            std::env::var("DUGOUT_LOG")
                .ok()
                .and_then(|s| parse_level(&s))
        })
        .unwrap_or(Level::INFO);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .init();
}

fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
