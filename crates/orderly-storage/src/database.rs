// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection lifecycle.
//!
//! [`Database`] wraps the one `tokio_rusqlite::Connection` every query goes
//! through; its background thread serializes all writes. Do not open a
//! second connection for writing.

use std::path::Path;
use std::time::Duration;

use orderly_core::OrderlyError;
use tracing::debug;

use crate::migrations::run_migrations;

/// The single-writer handle to the order database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and migrates it.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, OrderlyError> {
        let owned = path.to_string();
        tokio::task::spawn_blocking(move || prepare(&owned, wal_mode))
            .await
            .map_err(OrderlyError::storage)??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(OrderlyError::storage)?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}

/// Creates the parent directory, sets the journal mode and runs migrations
/// on a short-lived blocking connection.
fn prepare(path: &str, wal_mode: bool) -> Result<(), OrderlyError> {
    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(OrderlyError::storage)?;
    }

    let mut conn = rusqlite::Connection::open(path).map_err(OrderlyError::storage)?;
    let mode = if wal_mode { "WAL" } else { "DELETE" };
    let applied: String = conn
        .pragma_update_and_check(None, "journal_mode", mode, |row| row.get(0))
        .map_err(OrderlyError::storage)?;
    debug!(journal_mode = %applied, "journal mode set");
    run_migrations(&mut conn)
}

/// Converts a tokio-rusqlite error into [`OrderlyError::Storage`].
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> OrderlyError {
    OrderlyError::Storage {
        source: Box::new(e),
    }
}
