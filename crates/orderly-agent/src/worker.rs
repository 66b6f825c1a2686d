// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation worker task.
//!
//! Each conversation gets one worker owning its [`ConversationState`] and fed
//! by a bounded queue, so messages of one conversation are handled strictly
//! in arrival order while other conversations proceed in parallel. A worker
//! that stays idle for the configured TTL exits and its drafts are dropped.

use std::sync::Arc;

use chrono::Utc;
use orderly_core::types::{InboundMessage, MessageContent, OutboundMessage};
use orderly_core::{ChannelAdapter, ConversationId, OrderId, OrderStore, OrderlyError};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::callback::CallbackAction;
use crate::commands::{self, Command};
use crate::completion::Completion;
use crate::conversation::{ConversationState, Pending};
use crate::filter::suggestions;
use crate::render::{chunk_text, render};
use crate::reply::{NotFoundKind, Reply};
use crate::AgentSettings;

/// Queue depth of one conversation.
pub const QUEUE_CAPACITY: usize = 32;

/// State and collaborators of one conversation.
pub struct ConversationWorker {
    conversation_id: ConversationId,
    state: ConversationState,
    store: Arc<dyn OrderStore>,
    settings: AgentSettings,
}

impl ConversationWorker {
    pub fn new(
        conversation_id: ConversationId,
        store: Arc<dyn OrderStore>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            conversation_id,
            state: ConversationState::new(settings.max_drafts),
            store,
            settings,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Computes the replies to one inbound message.
    ///
    /// Storage failures are logged and turned into [`Reply::Failure`]; the
    /// conversation state stays usable.
    pub async fn handle(&mut self, msg: &InboundMessage) -> Vec<Reply> {
        let result = match &msg.content {
            MessageContent::Callback { data } => self.handle_callback(data).await.map(|r| vec![r]),
            MessageContent::Text(text) => match Command::parse(text) {
                Some(Ok(command)) => commands::execute(
                    command,
                    &mut self.state,
                    self.store.as_ref(),
                    &self.settings.agent_name,
                    self.settings.suggestion_limit,
                )
                .await
                .map(|r| vec![r]),
                Some(Err(err)) => Ok(vec![Reply::from(err)]),
                None => self.handle_text(text, &msg.sender_name).await,
            },
        };
        result.unwrap_or_else(|e| {
            error!(conversation = %self.conversation_id, error = %e, "message handling failed");
            vec![Reply::Failure]
        })
    }

    async fn handle_text(&mut self, text: &str, sender: &str) -> Result<Vec<Reply>, OrderlyError> {
        let completion = Completion::new(self.store.as_ref(), self.settings.suggestion_limit);
        let reply = match self.state.pending() {
            None => {
                return Ok(completion
                    .ingest_message(&mut self.state, sender, text, Utc::now())
                    .await);
            }
            Some(Pending::DraftField { .. }) => completion.answer(&mut self.state, text).await?,
            Some(Pending::EditField { order_id, field }) => {
                let value = text.trim();
                if value.is_empty() {
                    Reply::InvalidValue
                } else {
                    self.state.clear_pending();
                    match self.store.update_field(order_id, field, value).await? {
                        Some(order) => {
                            info!(order_id = order_id.0, field = field.key(), "order field edited");
                            Reply::OrderUpdated(order)
                        }
                        None => Reply::NotFound(NotFoundKind::Order),
                    }
                }
            }
            Some(Pending::ReadyOrder) => {
                self.state.clear_pending();
                let trimmed = text.trim();
                match trimmed.parse::<OrderId>() {
                    Ok(id) if trimmed.chars().all(|c| c.is_ascii_digit()) => {
                        if self.store.mark_ready(id).await? {
                            info!(order_id = id.0, "order marked ready");
                            Reply::OrderReady(id)
                        } else {
                            Reply::NotFound(NotFoundKind::Order)
                        }
                    }
                    _ => Reply::InvalidNumber,
                }
            }
        };
        Ok(vec![reply])
    }

    async fn handle_callback(&mut self, data: &str) -> Result<Reply, OrderlyError> {
        let action: CallbackAction = match data.parse() {
            Ok(action) => action,
            Err(e) => {
                warn!(conversation = %self.conversation_id, error = %e, "ignoring button");
                return Ok(Reply::NotFound(NotFoundKind::Action));
            }
        };
        debug!(conversation = %self.conversation_id, %action, "button pressed");

        let reply = match action {
            CallbackAction::DraftField { draft_id, field } => {
                Completion::new(self.store.as_ref(), self.settings.suggestion_limit)
                    .select_field(&mut self.state, draft_id, field)
                    .await?
            }
            CallbackAction::EditPrompt(order_id) => match self.store.get(order_id).await? {
                Some(_) => Reply::EditFieldPicker(order_id),
                None => Reply::NotFound(NotFoundKind::Order),
            },
            CallbackAction::EditField { order_id, field } => {
                if self.store.get(order_id).await?.is_none() {
                    return Ok(Reply::NotFound(NotFoundKind::Order));
                }
                let orders = self.store.list().await?;
                self.state.set_pending(Pending::EditField { order_id, field });
                Reply::RequestEditValue {
                    order_id,
                    field,
                    suggestions: suggestions(&orders, field, self.settings.suggestion_limit),
                }
            }
            CallbackAction::Delete(order_id) => {
                commands::delete(self.store.as_ref(), Some(order_id)).await?
            }
            CallbackAction::ReadyPrompt => {
                self.state.set_pending(Pending::ReadyOrder);
                Reply::ReadyPrompt
            }
        };
        Ok(reply)
    }

    /// Consumes queued messages until the queue closes, the conversation
    /// idles out or `cancel` fires.
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<InboundMessage>,
        channel: Arc<dyn ChannelAdapter>,
        cancel: CancellationToken,
    ) {
        debug!(conversation = %self.conversation_id, "conversation worker started");
        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(msg) => self.process(&msg, channel.as_ref()).await,
                    None => break,
                },
                _ = tokio::time::sleep(self.settings.idle_ttl) => {
                    // Refuse new messages, then finish whatever slipped in.
                    rx.close();
                    while let Some(msg) = rx.recv().await {
                        self.process(&msg, channel.as_ref()).await;
                    }
                    info!(
                        conversation = %self.conversation_id,
                        drafts = self.state.draft_count(),
                        "conversation idle, dropping state"
                    );
                    break;
                }
                _ = cancel.cancelled() => break,
            }
        }
        debug!(conversation = %self.conversation_id, "conversation worker stopped");
    }

    async fn process(&mut self, msg: &InboundMessage, channel: &dyn ChannelAdapter) {
        let max_len = channel.capabilities().max_message_length;
        for reply in self.handle(msg).await {
            let rendered = render(&reply);
            let chunks = match max_len {
                Some(max) => chunk_text(&rendered.text, max),
                None => vec![rendered.text],
            };
            let last = chunks.len().saturating_sub(1);
            for (i, content) in chunks.into_iter().enumerate() {
                let outbound = OutboundMessage {
                    conversation_id: msg.conversation_id.clone(),
                    channel: msg.channel.clone(),
                    content,
                    keyboard: if i == last { rendered.keyboard.clone() } else { None },
                    metadata: msg.metadata.clone(),
                };
                if let Err(e) = channel.send(outbound).await {
                    error!(conversation = %self.conversation_id, error = %e, "failed to send reply");
                }
            }
        }
    }
}

/// Sending side of a running worker.
pub struct WorkerHandle {
    tx: mpsc::Sender<InboundMessage>,
    task: tokio::task::JoinHandle<()>,
}

impl WorkerHandle {
    /// Spawns a worker for `conversation_id`.
    pub fn spawn(
        conversation_id: ConversationId,
        store: Arc<dyn OrderStore>,
        channel: Arc<dyn ChannelAdapter>,
        settings: AgentSettings,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let worker = ConversationWorker::new(conversation_id, store, settings);
        let task = tokio::spawn(worker.run(rx, channel, cancel));
        Self { tx, task }
    }

    /// Queues `msg` without waiting; hands it back if the queue is full or
    /// the worker has exited.
    pub fn try_send(&self, msg: InboundMessage) -> Result<(), TrySendError<InboundMessage>> {
        self.tx.try_send(msg)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Closes the queue and waits for the worker to finish.
    pub async fn join(self) {
        drop(self.tx);
        if let Err(e) = self.task.await {
            error!(error = %e, "conversation worker panicked");
        }
    }
}
