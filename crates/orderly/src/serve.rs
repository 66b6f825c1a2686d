// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `orderly serve`: runs the bot until SIGINT/SIGTERM.

use std::sync::Arc;

use orderly_agent::shutdown::install_signal_handler;
use orderly_agent::{AgentLoop, AgentSettings};
use orderly_config::OrderlyConfig;
use orderly_core::{ChannelAdapter, HealthStatus, OrderStore, OrderlyError, PluginAdapter};
use tracing::{info, warn};

#[cfg(feature = "sqlite")]
use orderly_storage::SqliteOrderStore;
#[cfg(feature = "telegram")]
use orderly_telegram::TelegramChannel;

/// Opens the store, connects Telegram and runs the agent loop.
pub async fn run_serve(config: OrderlyConfig) -> Result<(), OrderlyError> {
    init_tracing(&config.agent.log_level);

    info!(agent = %config.agent.name, "starting orderly serve");

    #[cfg(feature = "sqlite")]
    let store: Arc<dyn OrderStore> = {
        let store = SqliteOrderStore::open(config.storage.clone()).await?;
        info!(path = %config.storage.database_path, "order store ready");
        Arc::new(store)
    };

    #[cfg(not(feature = "sqlite"))]
    compile_error!("orderly requires the 'sqlite' feature for storage");

    #[cfg(feature = "telegram")]
    let channel: Arc<dyn ChannelAdapter> = {
        let mut telegram = TelegramChannel::new(config.telegram.clone())?;
        match telegram.health_check().await? {
            HealthStatus::Healthy => info!("telegram bot reachable"),
            status => warn!(?status, "telegram health check failed, polling anyway"),
        }
        telegram.connect().await?;
        Arc::new(telegram)
    };

    #[cfg(not(feature = "telegram"))]
    compile_error!("orderly requires the 'telegram' feature for its channel");

    let cancel = install_signal_handler();
    let mut agent_loop = AgentLoop::new(
        Arc::clone(&channel),
        store,
        AgentSettings::from_config(&config),
    );
    agent_loop.run(cancel).await?;

    channel.shutdown().await?;
    info!("orderly serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("orderly={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
