// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait for committed orders.

use async_trait::async_trait;

use crate::error::OrderlyError;
use crate::order::{FieldId, NewOrder, Order, OrderId, StoreSnapshot};
use crate::traits::adapter::PluginAdapter;

/// Persistent, append-by-id collection of committed orders.
///
/// Ids come from a monotonic counter that survives deletions. Implementations
/// must make [`commit`](OrderStore::commit) atomic: reading the next id,
/// inserting the order and advancing the counter happen as one unit, so two
/// concurrent commits never share an id.
#[async_trait]
pub trait OrderStore: PluginAdapter {
    /// Prepares the backend (migrations, connection).
    async fn initialize(&self) -> Result<(), OrderlyError>;

    /// Flushes pending writes and releases the backend.
    async fn close(&self) -> Result<(), OrderlyError>;

    /// Returns the full state; `next_id = 1` and no orders when nothing was stored.
    async fn load(&self) -> Result<StoreSnapshot, OrderlyError>;

    /// Replaces the full state durably.
    async fn save(&self, snapshot: &StoreSnapshot) -> Result<(), OrderlyError>;

    /// Assigns the next id to `order`, persists it and advances the counter.
    async fn commit(&self, order: NewOrder) -> Result<Order, OrderlyError>;

    /// Looks up one order.
    async fn get(&self, id: OrderId) -> Result<Option<Order>, OrderlyError>;

    /// All orders in id order.
    async fn list(&self) -> Result<Vec<Order>, OrderlyError>;

    /// Overwrites one field; returns the updated order, `None` if unknown.
    async fn update_field(
        &self,
        id: OrderId,
        field: FieldId,
        value: &str,
    ) -> Result<Option<Order>, OrderlyError>;

    /// Sets the ready flag; returns `false` if the order does not exist.
    async fn mark_ready(&self, id: OrderId) -> Result<bool, OrderlyError>;

    /// Deletes one order; returns `false` if it did not exist.
    async fn delete(&self, id: OrderId) -> Result<bool, OrderlyError>;
}
