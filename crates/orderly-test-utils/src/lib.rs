// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Orderly integration tests.
//!
//! # Components
//!
//! - [`MockChannel`] - in-memory channel with message injection and capture
//! - [`TestHarness`] - a conversation worker over a scratch SQLite store
//! - [`FailingStore`] - store wrapper rejecting chosen commits

pub mod failing_store;
pub mod harness;
pub mod mock_channel;

pub use failing_store::FailingStore;
pub use harness::{callback_message, text_message, TestHarness};
pub use mock_channel::MockChannel;
