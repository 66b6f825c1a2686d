// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update filtering and conversion.
//!
//! Decides which Telegram updates reach the agent (private chats, allowed
//! users, text or button presses) and turns them into [`InboundMessage`]s.
//! The conversation id is the chat id, so replies go back to the same chat.

use orderly_core::types::{InboundMessage, MessageContent};
use orderly_core::ConversationId;
use teloxide::types::{CallbackQuery, ChatKind, Message, User};

/// Channel name carried on every inbound message.
pub const CHANNEL_NAME: &str = "telegram";

/// Checks whether `user` is on the allow list, by numeric id or by username
/// (with or without `@`, case-insensitive). An empty list rejects everyone.
pub fn is_user_authorized(user: &User, allowed_users: &[String]) -> bool {
    let user_id = user.id.0.to_string();
    allowed_users.iter().any(|allowed| {
        *allowed == user_id
            || user.username.as_deref().is_some_and(|username| {
                username.eq_ignore_ascii_case(allowed.strip_prefix('@').unwrap_or(allowed))
            })
    })
}

/// Messages without a sender (channel posts) are never authorized.
pub fn is_authorized(msg: &Message, allowed_users: &[String]) -> bool {
    msg.from
        .as_ref()
        .is_some_and(|user| is_user_authorized(user, allowed_users))
}

/// Only private chats are served.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Username if set, else the full name.
pub fn sender_name(user: Option<&User>) -> String {
    match user {
        Some(user) => user.username.clone().unwrap_or_else(|| user.full_name()),
        None => "unknown".to_string(),
    }
}

/// Converts a text message; other message kinds yield `None`.
pub fn message_to_inbound(msg: &Message) -> Option<InboundMessage> {
    let text = msg.text()?;
    Some(InboundMessage {
        id: msg.id.0.to_string(),
        conversation_id: ConversationId(msg.chat.id.0.to_string()),
        channel: CHANNEL_NAME.to_string(),
        sender_id: msg
            .from
            .as_ref()
            .map(|u| u.id.0.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        sender_name: sender_name(msg.from.as_ref()),
        content: MessageContent::Text(text.to_string()),
        timestamp: msg.date.to_rfc3339(),
        metadata: Some(serde_json::json!({ "message_id": msg.id.0 }).to_string()),
    })
}

/// Converts a button press on one of our messages in a private chat.
///
/// Presses without data, on inaccessible messages or outside a private chat
/// yield `None`.
pub fn callback_to_inbound(query: &CallbackQuery) -> Option<InboundMessage> {
    let data = query.data.as_ref()?;
    let chat = query.message.as_ref()?.chat();
    if !chat.is_private() {
        return None;
    }
    Some(InboundMessage {
        id: query.id.to_string(),
        conversation_id: ConversationId(chat.id.0.to_string()),
        channel: CHANNEL_NAME.to_string(),
        sender_id: query.from.id.0.to_string(),
        sender_name: sender_name(Some(&query.from)),
        content: MessageContent::Callback { data: data.clone() },
        timestamp: chrono::Utc::now().to_rfc3339(),
        metadata: None,
    })
}
