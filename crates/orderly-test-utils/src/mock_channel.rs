// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory channel adapter.
//!
//! Inbound messages are injected by the test and returned by `receive()`;
//! everything passed to `send()` is captured for assertions. After
//! [`MockChannel::close`] the queue drains and `receive()` then reports a
//! closed channel, which stops an agent loop cleanly.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use orderly_core::types::{ChannelCapabilities, InboundMessage, OutboundMessage};
use orderly_core::{
    AdapterType, ChannelAdapter, HealthStatus, MessageId, OrderlyError, PluginAdapter,
};

pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundMessage>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    notify: Arc<Notify>,
    closed: AtomicBool,
    next_id: AtomicU64,
    max_message_length: Option<usize>,
    held: Arc<Mutex<HashSet<String>>>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
            closed: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
            max_message_length: None,
            held: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// A channel that reports a per-message length limit.
    pub fn with_max_message_length(max: usize) -> Self {
        Self {
            max_message_length: Some(max),
            ..Self::new()
        }
    }

    pub async fn inject_message(&self, msg: InboundMessage) {
        self.inbound.lock().await.push_back(msg);
        self.notify.notify_one();
    }

    /// Makes `receive()` fail with a closed-channel error once the queue is empty.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Makes `send()` to `conversation` wait until it is released.
    pub async fn hold_conversation(&self, conversation: &str) {
        self.held.lock().await.insert(conversation.to_string());
    }

    pub async fn release_conversation(&self, conversation: &str) {
        self.held.lock().await.remove(conversation);
    }

    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    /// Polls until at least `count` messages were sent or `timeout` elapses.
    pub async fn wait_for_sent(&self, count: usize, timeout: Duration) -> Vec<OutboundMessage> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let sent = self.sent_messages().await;
            if sent.len() >= count || tokio::time::Instant::now() >= deadline {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, OrderlyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), OrderlyError> {
        self.close();
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_keyboards: true,
            max_message_length: self.max_message_length,
        }
    }

    async fn connect(&mut self) -> Result<(), OrderlyError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, OrderlyError> {
        while self.held.lock().await.contains(msg.conversation_id.as_str()) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().await.push(msg);
        Ok(MessageId(format!("mock-msg-{id}")))
    }

    async fn receive(&self) -> Result<InboundMessage, OrderlyError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(msg) = queue.pop_front() {
                    return Ok(msg);
                }
                if self.closed.load(Ordering::SeqCst) {
                    return Err(OrderlyError::channel("mock channel closed"));
                }
            }
            self.notify.notified().await;
        }
    }
}
