// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order CRUD and whole-state snapshot operations.

use chrono::NaiveDate;
use orderly_core::{FieldId, NewOrder, Order, OrderId, OrderlyError, PartialRecord, StoreSnapshot};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::database::{map_tr_err, Database};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_ORDERS: &str =
    "SELECT id, created_at, raw_text, sender, fields, put_date, ready FROM orders";

fn order_from_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    let fields: String = row.get(4)?;
    let fields: PartialRecord = serde_json::from_str(&fields)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    let put_date = row
        .get::<_, Option<String>>(5)?
        .map(|d| {
            NaiveDate::parse_from_str(&d, DATE_FORMAT)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))
        })
        .transpose()?;
    Ok(Order {
        id: OrderId(row.get(0)?),
        created_at: row.get(1)?,
        raw_text: row.get(2)?,
        sender: row.get(3)?,
        fields,
        put_date,
        ready: row.get(6)?,
    })
}

fn encode_fields(fields: &PartialRecord) -> rusqlite::Result<String> {
    serde_json::to_string(fields).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn insert_order(conn: &Connection, order: &Order) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO orders (id, created_at, raw_text, sender, fields, put_date, ready)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            order.id.0,
            order.created_at,
            order.raw_text,
            order.sender,
            encode_fields(&order.fields)?,
            order.put_date.map(|d| d.format(DATE_FORMAT).to_string()),
            order.ready,
        ],
    )?;
    Ok(())
}

fn select_all(conn: &Connection) -> rusqlite::Result<Vec<Order>> {
    let mut stmt = conn.prepare(&format!("{SELECT_ORDERS} ORDER BY id ASC"))?;
    let rows = stmt.query_map([], order_from_row)?;
    rows.collect()
}

fn select_one(conn: &Connection, id: i64) -> rusqlite::Result<Option<Order>> {
    conn.query_row(
        &format!("{SELECT_ORDERS} WHERE id = ?1"),
        params![id],
        order_from_row,
    )
    .optional()
}

fn next_id(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT next_id FROM store_meta WHERE id = 1", [], |row| {
        row.get(0)
    })
}

/// Reads the counter and every order.
pub async fn load_snapshot(db: &Database) -> Result<StoreSnapshot, OrderlyError> {
    db.connection()
        .call(|conn| -> Result<StoreSnapshot, rusqlite::Error> {
            let tx = conn.transaction()?;
            let snapshot = StoreSnapshot {
                next_id: next_id(&tx)?,
                orders: select_all(&tx)?,
            };
            tx.commit()?;
            Ok(snapshot)
        })
        .await
        .map_err(map_tr_err)
}

/// Replaces every order and the counter in one transaction.
///
/// The stored counter never drops to or below an existing id.
pub async fn replace_snapshot(db: &Database, snapshot: &StoreSnapshot) -> Result<(), OrderlyError> {
    let snapshot = snapshot.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM orders", [])?;
            for order in &snapshot.orders {
                insert_order(&tx, order)?;
            }
            let floor = snapshot.orders.iter().map(|o| o.id.0 + 1).max().unwrap_or(1);
            tx.execute(
                "UPDATE store_meta SET next_id = ?1 WHERE id = 1",
                params![snapshot.next_id.max(floor)],
            )?;
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

/// Assigns the next id, inserts the order and advances the counter atomically.
pub async fn commit_order(db: &Database, order: NewOrder) -> Result<Order, OrderlyError> {
    db.connection()
        .call(move |conn| -> Result<Order, rusqlite::Error> {
            let tx = conn.transaction()?;
            let id = next_id(&tx)?;
            let committed = Order::from_new(OrderId(id), order);
            insert_order(&tx, &committed)?;
            tx.execute(
                "UPDATE store_meta SET next_id = ?1 WHERE id = 1",
                params![id + 1],
            )?;
            tx.commit()?;
            Ok(committed)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_order(db: &Database, id: OrderId) -> Result<Option<Order>, OrderlyError> {
    db.connection()
        .call(move |conn| select_one(conn, id.0))
        .await
        .map_err(map_tr_err)
}

pub async fn list_orders(db: &Database) -> Result<Vec<Order>, OrderlyError> {
    db.connection()
        .call(|conn| select_all(conn))
        .await
        .map_err(map_tr_err)
}

/// Overwrites one field and returns the updated order.
pub async fn update_field(
    db: &Database,
    id: OrderId,
    field: FieldId,
    value: &str,
) -> Result<Option<Order>, OrderlyError> {
    let value = value.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Order>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let Some(mut order) = select_one(&tx, id.0)? else {
                return Ok(None);
            };
            if order.fields.set(field, &value) {
                tx.execute(
                    "UPDATE orders SET fields = ?1 WHERE id = ?2",
                    params![encode_fields(&order.fields)?, id.0],
                )?;
            }
            tx.commit()?;
            Ok(Some(order))
        })
        .await
        .map_err(map_tr_err)
}

pub async fn mark_ready(db: &Database, id: OrderId) -> Result<bool, OrderlyError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute("UPDATE orders SET ready = 1 WHERE id = ?1", params![id.0])?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_order(db: &Database, id: OrderId) -> Result<bool, OrderlyError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute("DELETE FROM orders WHERE id = ?1", params![id.0])?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}
