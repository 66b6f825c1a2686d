// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Orderly order intake bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide:
//! long polling, private-chat and allow-list filtering, inline keyboards
//! and button presses.

pub mod handler;
pub mod keyboard;

use std::sync::Arc;

use async_trait::async_trait;
use orderly_config::model::TelegramConfig;
use orderly_core::error::OrderlyError;
use orderly_core::traits::{ChannelAdapter, PluginAdapter};
use orderly_core::types::{
    AdapterType, ChannelCapabilities, HealthStatus, InboundMessage, MessageId, OutboundMessage,
};
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram's limit on message text length.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Telegram channel adapter implementing [`ChannelAdapter`].
pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>,
    inbound_tx: mpsc::Sender<InboundMessage>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: TelegramConfig) -> Result<Self, OrderlyError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            OrderlyError::Config("telegram.bot_token is required to serve".into())
        })?;

        if token.trim().is_empty() {
            return Err(OrderlyError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            config,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        handler::CHANNEL_NAME
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, OrderlyError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), OrderlyError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_keyboards: true,
            max_message_length: Some(MAX_MESSAGE_LENGTH),
        }
    }

    async fn connect(&mut self) -> Result<(), OrderlyError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let bot = self.bot.clone();
        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();
        let allowed_messages: Arc<Vec<String>> = Arc::new(self.config.allowed_users.clone());
        let allowed_callbacks = Arc::clone(&allowed_messages);

        if self.config.allowed_users.is_empty() {
            warn!("telegram.allowed_users is empty, every message will be ignored");
        }
        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let messages = Update::filter_message().endpoint(move |msg: Message| {
                let tx = message_tx.clone();
                let allowed = Arc::clone(&allowed_messages);
                async move {
                    if !handler::is_dm(&msg) {
                        debug!(chat_id = msg.chat.id.0, "ignoring non-private message");
                        return respond(());
                    }
                    if !handler::is_authorized(&msg, &allowed) {
                        debug!(chat_id = msg.chat.id.0, "ignoring unauthorized user");
                        return respond(());
                    }
                    match handler::message_to_inbound(&msg) {
                        Some(inbound) => {
                            if tx.send(inbound).await.is_err() {
                                warn!("inbound channel closed, dropping message");
                            }
                        }
                        None => debug!(msg_id = msg.id.0, "ignoring non-text message"),
                    }
                    respond(())
                }
            });

            let callbacks = Update::filter_callback_query().endpoint(
                move |bot: Bot, query: CallbackQuery| {
                    let tx = callback_tx.clone();
                    let allowed = Arc::clone(&allowed_callbacks);
                    async move {
                        // Stops the client-side spinner whatever happens next.
                        if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                            warn!(error = %e, "failed to answer callback query");
                        }
                        if !handler::is_user_authorized(&query.from, &allowed) {
                            debug!(user_id = query.from.id.0, "ignoring unauthorized button press");
                            return respond(());
                        }
                        match handler::callback_to_inbound(&query) {
                            Some(inbound) => {
                                if tx.send(inbound).await.is_err() {
                                    warn!("inbound channel closed, dropping button press");
                                }
                            }
                            None => debug!("ignoring button press without data or private chat"),
                        }
                        respond(())
                    }
                },
            );

            let tree = dptree::entry().branch(messages).branch(callbacks);
            Dispatcher::builder(bot, tree)
                .default_handler(|_| async {})
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, OrderlyError> {
        let chat_id = extract_chat_id(&msg)?;

        let mut request = self.bot.send_message(chat_id, msg.content.clone());
        if let Some(keyboard) = msg.keyboard.as_ref().filter(|k| !k.is_empty()) {
            request = request.reply_markup(keyboard::to_markup(keyboard));
        }

        let sent = request.await.map_err(|e| OrderlyError::Channel {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn receive(&self) -> Result<InboundMessage, OrderlyError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv()
            .await
            .ok_or_else(|| OrderlyError::channel("Telegram inbound channel closed"))
    }
}

/// The conversation id of a Telegram conversation is its chat id.
fn extract_chat_id(msg: &OutboundMessage) -> Result<ChatId, OrderlyError> {
    msg.conversation_id
        .as_str()
        .parse::<i64>()
        .map(ChatId)
        .map_err(|e| OrderlyError::Channel {
            message: format!("invalid chat id {:?}: {e}", msg.conversation_id.as_str()),
            source: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderly_core::ConversationId;

    fn config(token: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.map(str::to_string),
            allowed_users: vec!["12345".into()],
        }
    }

    fn outbound(conversation: &str) -> OutboundMessage {
        OutboundMessage {
            conversation_id: ConversationId::from(conversation),
            channel: "telegram".into(),
            content: "ciao".into(),
            keyboard: None,
            metadata: None,
        }
    }

    #[test]
    fn new_requires_bot_token() {
        assert!(TelegramChannel::new(config(None)).is_err());
        assert!(TelegramChannel::new(config(Some(""))).is_err());
        assert!(TelegramChannel::new(config(Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11"))).is_ok());
    }

    #[test]
    fn capabilities_are_correct() {
        let channel = TelegramChannel::new(config(Some("test:token"))).unwrap();
        let caps = channel.capabilities();
        assert!(caps.supports_keyboards);
        assert_eq!(caps.max_message_length, Some(4096));
        assert_eq!(channel.name(), "telegram");
        assert_eq!(channel.adapter_type(), AdapterType::Channel);
    }

    #[test]
    fn chat_id_comes_from_conversation() {
        assert_eq!(extract_chat_id(&outbound("-100123")).unwrap(), ChatId(-100123));
        assert!(extract_chat_id(&outbound("chat-a")).is_err());
    }

    #[tokio::test]
    async fn receive_yields_queued_messages() {
        let channel = TelegramChannel::new(config(Some("test:token"))).unwrap();
        channel
            .inbound_tx
            .send(InboundMessage {
                id: "1".into(),
                conversation_id: ConversationId::from("12345"),
                channel: "telegram".into(),
                sender_id: "12345".into(),
                sender_name: "mario".into(),
                content: orderly_core::types::MessageContent::Text("ciao".into()),
                timestamp: "2026-01-01T00:00:00Z".into(),
                metadata: None,
            })
            .await
            .unwrap();
        let received = channel.receive().await.unwrap();
        assert_eq!(received.conversation_id.as_str(), "12345");
        assert_eq!(received.sender_name, "mario");
    }
}
