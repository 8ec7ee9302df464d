//! # Termination signal handling.
//!
//! [`wait_for_shutdown_signal`] completes when the process receives a
//! termination signal: SIGINT/SIGTERM on Unix, Ctrl-C elsewhere. Each call
//! registers independent listeners.

#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
