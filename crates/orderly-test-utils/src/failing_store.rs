// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store wrapper that rejects chosen commits.
//!
//! Commits are numbered from 1 in call order; a commit whose number was
//! registered with [`FailingStore::fail_commit`] returns a storage error
//! without touching the inner store. Every other call is forwarded.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use orderly_core::{
    AdapterType, FieldId, HealthStatus, NewOrder, Order, OrderId, OrderStore, OrderlyError,
    PluginAdapter, StoreSnapshot,
};

pub struct FailingStore {
    inner: Arc<dyn OrderStore>,
    failing: BTreeSet<usize>,
    commits: AtomicUsize,
}

impl FailingStore {
    pub fn new(inner: Arc<dyn OrderStore>) -> Self {
        Self {
            inner,
            failing: BTreeSet::new(),
            commits: AtomicUsize::new(0),
        }
    }

    /// Makes the `nth` commit (1-based) fail.
    pub fn fail_commit(mut self, nth: usize) -> Self {
        self.failing.insert(nth);
        self
    }

    /// Commits attempted so far, failed ones included.
    pub fn commit_attempts(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PluginAdapter for FailingStore {
    fn name(&self) -> &str {
        "failing-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, OrderlyError> {
        self.inner.health_check().await
    }

    async fn shutdown(&self) -> Result<(), OrderlyError> {
        self.inner.shutdown().await
    }
}

#[async_trait]
impl OrderStore for FailingStore {
    async fn initialize(&self) -> Result<(), OrderlyError> {
        self.inner.initialize().await
    }

    async fn close(&self) -> Result<(), OrderlyError> {
        self.inner.close().await
    }

    async fn load(&self) -> Result<StoreSnapshot, OrderlyError> {
        self.inner.load().await
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> Result<(), OrderlyError> {
        self.inner.save(snapshot).await
    }

    async fn commit(&self, order: NewOrder) -> Result<Order, OrderlyError> {
        let nth = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing.contains(&nth) {
            return Err(OrderlyError::storage(format!("commit {nth} rejected")));
        }
        self.inner.commit(order).await
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, OrderlyError> {
        self.inner.get(id).await
    }

    async fn list(&self) -> Result<Vec<Order>, OrderlyError> {
        self.inner.list().await
    }

    async fn update_field(
        &self,
        id: OrderId,
        field: FieldId,
        value: &str,
    ) -> Result<Option<Order>, OrderlyError> {
        self.inner.update_field(id, field, value).await
    }

    async fn mark_ready(&self, id: OrderId) -> Result<bool, OrderlyError> {
        self.inner.mark_ready(id).await
    }

    async fn delete(&self, id: OrderId) -> Result<bool, OrderlyError> {
        self.inner.delete(id).await
    }
}
