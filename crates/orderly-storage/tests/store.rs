// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order store behavior against a real SQLite file.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use orderly_config::model::StorageConfig;
use orderly_core::{FieldId, NewOrder, OrderId, OrderStore, PartialRecord, StoreSnapshot};
use orderly_storage::SqliteOrderStore;
use tempfile::TempDir;

async fn open_store(dir: &TempDir) -> SqliteOrderStore {
    SqliteOrderStore::open(StorageConfig {
        database_path: dir.path().join("orders.db").to_string_lossy().into_owned(),
        wal_mode: true,
    })
    .await
    .expect("store opens")
}

fn new_order(products: &str) -> NewOrder {
    let mut fields = PartialRecord::new();
    fields.set(FieldId::Handle, "@anna");
    fields.set(FieldId::Products, products);
    fields.set(FieldId::Notes, "  citofono “Rossi” – 2° piano ");
    NewOrder {
        created_at: "2026-02-04 00:00 UTC".to_string(),
        raw_text: format!("Prodotti: {products}\n2026-02-04"),
        sender: "anna".to_string(),
        fields,
        put_date: NaiveDate::from_ymd_opt(2026, 2, 4),
    }
}

#[tokio::test]
async fn empty_store_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    assert_eq!(store.load().await.unwrap(), StoreSnapshot::default());
}

#[tokio::test]
async fn committed_orders_round_trip_exactly() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let committed = store.commit(new_order("Kiwi")).await.unwrap();
    assert_eq!(committed.id, OrderId(1));
    assert!(!committed.ready);

    let snapshot = store.load().await.unwrap();
    assert_eq!(snapshot.next_id, 2);
    assert_eq!(snapshot.orders, vec![committed.clone()]);
    assert_eq!(
        snapshot.orders[0].field(FieldId::Notes),
        committed.field(FieldId::Notes)
    );
}

#[tokio::test]
async fn ids_are_never_reused() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;

    let first = store.commit(new_order("Kiwi")).await.unwrap();
    let second = store.commit(new_order("Mela")).await.unwrap();
    assert!(store.delete(second.id).await.unwrap());
    assert!(!store.delete(second.id).await.unwrap());

    let third = store.commit(new_order("Pera")).await.unwrap();
    assert_eq!(first.id, OrderId(1));
    assert_eq!(third.id, OrderId(3));
}

#[tokio::test]
async fn concurrent_commits_get_distinct_ids() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(open_store(&dir).await);

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.commit(new_order(&format!("p{i}"))).await.unwrap().id
        }));
    }
    let mut ids = HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap()));
    }
    assert_eq!(ids.len(), 16);
    assert_eq!(store.load().await.unwrap().next_id, 17);
}

#[tokio::test]
async fn save_replaces_state_and_keeps_counter_ahead() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let order = store.commit(new_order("Kiwi")).await.unwrap();

    let mut snapshot = store.load().await.unwrap();
    snapshot.orders[0].ready = true;
    snapshot.next_id = 1;
    store.save(&snapshot).await.unwrap();

    let reloaded = store.load().await.unwrap();
    assert!(reloaded.orders[0].ready);
    assert_eq!(reloaded.next_id, order.id.0 + 1);
}

#[tokio::test]
async fn crud_operations() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let order = store.commit(new_order("Kiwi")).await.unwrap();

    let updated = store
        .update_field(order.id, FieldId::Quantity, " 2 kg ")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.field(FieldId::Quantity), Some("2 kg"));
    assert_eq!(store.get(order.id).await.unwrap(), Some(updated));

    assert!(store.update_field(OrderId(99), FieldId::Quantity, "1").await.unwrap().is_none());
    assert!(store.mark_ready(order.id).await.unwrap());
    assert!(!store.mark_ready(OrderId(99)).await.unwrap());
    assert!(store.get(order.id).await.unwrap().unwrap().ready);
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let committed = {
        let store = open_store(&dir).await;
        let order = store.commit(new_order("Kiwi")).await.unwrap();
        store.close().await.unwrap();
        order
    };

    let store = open_store(&dir).await;
    assert_eq!(store.get(committed.id).await.unwrap(), Some(committed));
    assert_eq!(store.commit(new_order("Mela")).await.unwrap().id, OrderId(2));
}
