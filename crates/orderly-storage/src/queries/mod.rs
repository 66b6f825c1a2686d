// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query functions. Each takes a [`Database`](crate::Database) and
//! runs on its writer thread.

pub mod orders;
