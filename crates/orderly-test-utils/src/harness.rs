// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness.
//!
//! `TestHarness` wires a [`ConversationWorker`] to a SQLite store in a
//! temporary directory, so tests can drive a conversation message by
//! message and inspect both the replies and the persisted orders.

use std::sync::Arc;

use orderly_agent::{AgentLoop, AgentSettings, ConversationWorker, Reply};
use orderly_config::model::StorageConfig;
use orderly_core::types::{InboundMessage, MessageContent};
use orderly_core::{ChannelAdapter, ConversationId, Order, OrderStore, OrderlyError};
use orderly_storage::SqliteOrderStore;
use tempfile::TempDir;
use tokio::sync::Mutex;

use crate::failing_store::FailingStore;
use crate::mock_channel::MockChannel;

/// Conversation used by the harness worker.
pub const HARNESS_CONVERSATION: &str = "chat-1";

/// Builds a plain text message.
pub fn text_message(conversation: &str, sender: &str, text: &str) -> InboundMessage {
    inbound(conversation, sender, MessageContent::Text(text.to_string()))
}

/// Builds a button press.
pub fn callback_message(conversation: &str, data: &str) -> InboundMessage {
    inbound(
        conversation,
        "operator",
        MessageContent::Callback {
            data: data.to_string(),
        },
    )
}

fn inbound(conversation: &str, sender: &str, content: MessageContent) -> InboundMessage {
    InboundMessage {
        id: format!("{conversation}-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0)),
        conversation_id: ConversationId::from(conversation),
        channel: "mock".to_string(),
        sender_id: sender.to_string(),
        sender_name: sender.to_string(),
        content,
        timestamp: chrono::Utc::now().to_rfc3339(),
        metadata: None,
    }
}

pub struct TestHarnessBuilder {
    settings: AgentSettings,
    sender: String,
    failing_commits: Vec<usize>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            settings: AgentSettings::default(),
            sender: "mario".to_string(),
            failing_commits: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: AgentSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sender name attached to every text message.
    pub fn with_sender(mut self, sender: &str) -> Self {
        self.sender = sender.to_string();
        self
    }

    /// Makes the `nth` commit (1-based) of the store fail.
    pub fn with_failing_commit(mut self, nth: usize) -> Self {
        self.failing_commits.push(nth);
        self
    }

    pub async fn build(self) -> Result<TestHarness, OrderlyError> {
        let temp_dir = TempDir::new().map_err(OrderlyError::storage)?;
        let database_path = temp_dir.path().join("orders.db");
        let store = SqliteOrderStore::open(StorageConfig {
            database_path: database_path.to_string_lossy().into_owned(),
            wal_mode: true,
        })
        .await?;
        let mut store: Arc<dyn OrderStore> = Arc::new(store);
        if !self.failing_commits.is_empty() {
            let failing = self
                .failing_commits
                .iter()
                .fold(FailingStore::new(store), |s, nth| s.fail_commit(*nth));
            store = Arc::new(failing);
        }

        let worker = ConversationWorker::new(
            ConversationId::from(HARNESS_CONVERSATION),
            Arc::clone(&store),
            self.settings.clone(),
        );

        Ok(TestHarness {
            mock_channel: Arc::new(MockChannel::new()),
            store,
            settings: self.settings,
            sender: self.sender,
            worker: Mutex::new(worker),
            _temp_dir: temp_dir,
        })
    }
}

/// A conversation worker over a scratch database.
pub struct TestHarness {
    pub mock_channel: Arc<MockChannel>,
    store: Arc<dyn OrderStore>,
    settings: AgentSettings,
    sender: String,
    worker: Mutex<ConversationWorker>,
    _temp_dir: TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn store(&self) -> Arc<dyn OrderStore> {
        Arc::clone(&self.store)
    }

    /// Sends free text (or a command) to the harness conversation.
    pub async fn send_text(&self, text: &str) -> Vec<Reply> {
        let msg = text_message(HARNESS_CONVERSATION, &self.sender, text);
        self.worker.lock().await.handle(&msg).await
    }

    /// Presses a button in the harness conversation.
    pub async fn press(&self, data: &str) -> Vec<Reply> {
        let msg = callback_message(HARNESS_CONVERSATION, data);
        self.worker.lock().await.handle(&msg).await
    }

    pub async fn draft_count(&self) -> usize {
        self.worker.lock().await.state().draft_count()
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.store.list().await.unwrap_or_default()
    }

    /// An agent loop over the mock channel and the harness store.
    pub fn agent_loop(&self) -> AgentLoop {
        let channel: Arc<dyn ChannelAdapter> = self.mock_channel.clone();
        AgentLoop::new(channel, Arc::clone(&self.store), self.settings.clone())
    }
}
