// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation handling for the Orderly bot.
//!
//! The [`AgentLoop`] receives messages from a channel adapter and routes each
//! one to the worker of its conversation. Workers turn free text into orders
//! or drafts, drive draft completion through inline buttons and run the
//! operator commands against the shared [`OrderStore`].

pub mod callback;
pub mod commands;
pub mod completion;
pub mod conversation;
pub mod filter;
pub mod render;
pub mod reply;
pub mod shutdown;
pub mod worker;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use orderly_config::model::OrderlyConfig;
use orderly_core::types::{InboundMessage, OutboundMessage};
use orderly_core::{ChannelAdapter, ConversationId, OrderStore, OrderlyError};
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::worker::WorkerHandle;

pub use callback::CallbackAction;
pub use completion::Completion;
pub use conversation::{ConversationState, Draft, Pending};
pub use reply::{NotFoundKind, Reply};
pub use worker::ConversationWorker;

/// How long shutdown waits for workers to finish their current message.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-conversation tunables.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub agent_name: String,
    pub idle_ttl: Duration,
    pub max_drafts: usize,
    pub suggestion_limit: usize,
}

impl AgentSettings {
    pub fn from_config(config: &OrderlyConfig) -> Self {
        Self {
            agent_name: config.agent.name.clone(),
            idle_ttl: Duration::from_secs(config.drafts.idle_ttl_secs),
            max_drafts: config.drafts.max_per_conversation,
            suggestion_limit: config.drafts.suggestion_limit,
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self::from_config(&OrderlyConfig::default())
    }
}

/// Routes inbound messages to conversation workers.
pub struct AgentLoop {
    channel: Arc<dyn ChannelAdapter>,
    store: Arc<dyn OrderStore>,
    settings: AgentSettings,
    workers: HashMap<ConversationId, WorkerHandle>,
}

impl AgentLoop {
    /// `channel` must already be connected and `store` initialized.
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        store: Arc<dyn OrderStore>,
        settings: AgentSettings,
    ) -> Self {
        info!(agent_name = settings.agent_name.as_str(), "agent loop initialized");
        Self {
            channel,
            store,
            settings,
            workers: HashMap::new(),
        }
    }

    /// Runs until `cancel` fires or the channel closes, then drains the
    /// workers and closes the store.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), OrderlyError> {
        info!("agent loop running");

        loop {
            tokio::select! {
                msg = self.channel.receive() => match msg {
                    Ok(inbound) => self.dispatch(inbound, &cancel),
                    Err(e) if e.is_channel_closed() => {
                        warn!(error = %e, "channel closed, stopping agent loop");
                        break;
                    }
                    Err(e) => error!(error = %e, "channel receive error"),
                },
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping agent loop");
                    break;
                }
            }
        }

        let workers: Vec<WorkerHandle> = self.workers.drain().map(|(_, w)| w).collect();
        shutdown::drain_workers(workers, DRAIN_TIMEOUT).await;
        self.store.close().await?;

        info!("agent loop stopped");
        Ok(())
    }

    /// Queues `inbound` on its conversation worker, starting one if needed.
    ///
    /// Never waits on a worker: when the conversation queue is full the
    /// message is dropped and the sender is told to resend it.
    fn dispatch(&mut self, inbound: InboundMessage, cancel: &CancellationToken) {
        self.workers.retain(|_, w| !w.is_finished());

        let conversation_id = inbound.conversation_id.clone();
        let mut pending = inbound;
        // A worker may idle out between the lookup and the send; one retry
        // with a fresh worker is enough since a new worker never idles at once.
        for _ in 0..2 {
            let handle = self
                .workers
                .entry(conversation_id.clone())
                .or_insert_with(|| {
                    info!(conversation = %conversation_id, "starting conversation worker");
                    WorkerHandle::spawn(
                        conversation_id.clone(),
                        Arc::clone(&self.store),
                        Arc::clone(&self.channel),
                        self.settings.clone(),
                        cancel.child_token(),
                    )
                });
            match handle.try_send(pending) {
                Ok(()) => return,
                Err(TrySendError::Full(dropped)) => {
                    warn!(conversation = %conversation_id, "conversation queue full, dropping message");
                    self.reply_busy(&dropped);
                    return;
                }
                Err(TrySendError::Closed(returned)) => {
                    self.workers.remove(&conversation_id);
                    pending = returned;
                }
            }
        }
        error!(conversation = %conversation_id, "could not hand message to a worker");
    }

    /// Sends the busy notice from a separate task so a slow channel cannot
    /// hold up routing.
    fn reply_busy(&self, inbound: &InboundMessage) {
        let outbound = OutboundMessage {
            conversation_id: inbound.conversation_id.clone(),
            channel: inbound.channel.clone(),
            content: render::render(&Reply::Busy).text,
            keyboard: None,
            metadata: inbound.metadata.clone(),
        };
        let channel = Arc::clone(&self.channel);
        tokio::spawn(async move {
            if let Err(e) = channel.send(outbound).await {
                error!(error = %e, "failed to send busy notice");
            }
        });
    }

    /// Number of live conversation workers.
    pub fn worker_count(&self) -> usize {
        self.workers.values().filter(|w| !w.is_finished()).count()
    }
}
