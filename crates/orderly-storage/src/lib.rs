// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite order store.
//!
//! Orders live in one table with their field map stored as JSON; a
//! single-row counter hands out ids. Migrations are embedded and applied on
//! open, and every statement runs on the tokio-rusqlite writer thread.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteOrderStore;
pub use database::Database;
