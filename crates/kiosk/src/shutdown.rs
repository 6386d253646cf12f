//! Process lifecycle: runtime construction and signal-driven cancellation.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

/// How long shutdown waits for blocking-pool work (FIFO opens, stdin reads,
/// native polls) before the process exits anyway.
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Run `main` on a fresh multi-thread runtime, then shut the runtime down
/// without waiting indefinitely on blocked threads.
pub fn run<F, Fut>(main: F) -> Result<()>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    let cancel = CancellationToken::new();
    let result = runtime.block_on(async move {
        cancel_on_signal(cancel.clone())?;
        main(cancel).await
    });
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

/// Cancel `cancel` on SIGINT or SIGTERM.
pub fn cancel_on_signal(cancel: CancellationToken) -> Result<()> {
    let mut terminate =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
    let mut interrupt =
        signal(SignalKind::interrupt()).context("failed to install SIGINT handler")?;

    tokio::spawn(async move {
        tokio::select! {
            _ = terminate.recv() => tracing::info!("SIGTERM received, shutting down"),
            _ = interrupt.recv() => tracing::info!("SIGINT received, shutting down"),
            () = cancel.cancelled() => {}
        }
        cancel.cancel();
    });
    Ok(())
}
