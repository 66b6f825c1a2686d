// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown: signal handling and worker draining.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::worker::WorkerHandle;

/// Returns a token cancelled on SIGINT or SIGTERM.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => info!("received SIGINT, shutting down"),
                        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
                    }
                }
                Err(e) => {
                    error!(error = %e, "cannot listen for SIGTERM, only Ctrl+C will stop the bot");
                    let _ = ctrl_c.await;
                    info!("received SIGINT, shutting down");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, shutting down");
        }

        trigger.cancel();
        debug!("signal handler finished");
    });

    token
}

/// Closes every worker queue and waits up to `timeout` for them to finish
/// the message in hand.
pub async fn drain_workers(workers: Vec<WorkerHandle>, timeout: Duration) {
    if workers.is_empty() {
        info!("no conversation workers to drain");
        return;
    }
    let count = workers.len();
    info!(count, "draining conversation workers");
    let joined = join_workers(workers);
    match tokio::time::timeout(timeout, joined).await {
        Ok(()) => info!("all conversation workers stopped"),
        Err(_) => warn!(count, "timeout reached, some conversation workers interrupted"),
    }
}

async fn join_workers(workers: Vec<WorkerHandle>) {
    let mut set = tokio::task::JoinSet::new();
    for worker in workers {
        set.spawn(worker.join());
    }
    while set.join_next().await.is_some() {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn install_signal_handler_returns_live_token() {
        let token = install_signal_handler();
        assert!(!token.is_cancelled());
        token.cancel();
    }

    #[tokio::test]
    async fn draining_nothing_returns_immediately() {
        drain_workers(Vec::new(), Duration::from_millis(10)).await;
    }
}
