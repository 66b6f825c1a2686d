// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Orderly workspace.

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
///
/// Extraction never fails and missing drafts or orders are ordinary replies,
/// so this enum only covers infrastructure problems.
#[derive(Debug, Error)]
pub enum OrderlyError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (connection failure, message format, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OrderlyError {
    /// Wraps any error as a storage failure.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        OrderlyError::Storage {
            source: source.into(),
        }
    }

    /// Builds a channel error without an underlying cause.
    pub fn channel(message: impl Into<String>) -> Self {
        OrderlyError::Channel {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true when the error means the channel will never yield again.
    pub fn is_channel_closed(&self) -> bool {
        matches!(self, OrderlyError::Channel { message, .. } if message.contains("closed"))
    }
}
