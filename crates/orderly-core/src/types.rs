// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport-neutral message types shared by channel adapters and the agent loop.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifies one conversation (a chat) on a channel.
///
/// Drafts and pending prompts are scoped to this identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        ConversationId(value.to_string())
    }
}

/// Unique identifier for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
}

/// Content of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Free text typed by the user (commands included).
    Text(String),
    /// Payload of a pressed inline button.
    Callback { data: String },
}

/// A message received from a channel adapter.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Channel-specific message identifier.
    pub id: String,
    /// Conversation the message belongs to.
    pub conversation_id: ConversationId,
    /// Channel name (e.g. "telegram").
    pub channel: String,
    /// Stable sender identifier.
    pub sender_id: String,
    /// Human-readable sender name: the username if any, else the full name.
    pub sender_name: String,
    /// Message content.
    pub content: MessageContent,
    /// RFC 3339 receipt timestamp.
    pub timestamp: String,
    /// Channel-specific metadata (JSON).
    pub metadata: Option<String>,
}

/// A single inline button: a visible label and the payload sent back when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButton {
    pub label: String,
    pub data: String,
}

impl KeyboardButton {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Rows of inline buttons attached to an outbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<KeyboardButton>>,
}

impl Keyboard {
    /// One button per row.
    pub fn column(buttons: impl IntoIterator<Item = KeyboardButton>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    /// All buttons on a single row.
    pub fn row(buttons: impl IntoIterator<Item = KeyboardButton>) -> Self {
        Self {
            rows: vec![buttons.into_iter().collect()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.is_empty())
    }
}

/// A message to be delivered through a channel adapter.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Target conversation.
    pub conversation_id: ConversationId,
    /// Channel name.
    pub channel: String,
    /// Plain text body.
    pub content: String,
    /// Optional inline keyboard.
    pub keyboard: Option<Keyboard>,
    /// Channel-specific metadata copied from the inbound message.
    pub metadata: Option<String>,
}

/// Capabilities reported by a channel adapter.
#[derive(Debug, Clone)]
pub struct ChannelCapabilities {
    /// Whether inline keyboards are rendered.
    pub supports_keyboards: bool,
    /// Maximum text length per message, if limited.
    pub max_message_length: Option<usize>,
}
