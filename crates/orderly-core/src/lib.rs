// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Orderly order intake bot.
//!
//! This crate provides the order domain model (field identifiers, partial
//! records, orders), the transport-neutral message types, the adapter traits
//! implemented by channel and storage crates, and the shared error type.

pub mod error;
pub mod order;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::OrderlyError;
pub use order::{
    missing_fields, DraftId, FieldId, NewOrder, Order, OrderId, PartialRecord, StoreSnapshot,
    REQUIRED_FIELDS,
};
pub use types::{AdapterType, ConversationId, HealthStatus, MessageId};

// Re-export all adapter traits at crate root.
pub use traits::{ChannelAdapter, OrderStore, PluginAdapter};
