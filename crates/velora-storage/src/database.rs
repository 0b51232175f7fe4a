// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use velora_core::VeloraError;

/// Handle to the SQLite database behind a tokio-rusqlite connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, VeloraError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(VeloraError::storage)?;
        }

        // PRAGMAs and migrations run on a short-lived synchronous
        // connection before the async handle is opened; this happens once
        // at startup.
        {
            let mut conn = rusqlite::Connection::open(path).map_err(VeloraError::storage)?;
            let journal = if wal_mode { "WAL" } else { "DELETE" };
            conn.execute_batch(&format!(
                "PRAGMA journal_mode = {journal};
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;"
            ))
            .map_err(VeloraError::storage)?;
            crate::migrations::run_migrations(&mut conn)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(VeloraError::storage)?;
        Ok(Self { conn })
    }

    /// In-memory database for tests.
    pub async fn open_in_memory() -> Result<Self, VeloraError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(VeloraError::storage)?;
        // An in-memory database only exists on the connection that created
        // it, so migrations must run through the async handle.
        conn.call(|conn| crate::migrations::run_migrations(conn))
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(e) => e,
                other => VeloraError::storage(other),
            })?;
        Ok(Self { conn })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Flush the WAL before shutdown.
    pub async fn close(&self) -> Result<(), VeloraError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

/// Map a tokio-rusqlite error into the crate error type.
pub fn map_tr_err(err: tokio_rusqlite::Error<rusqlite::Error>) -> VeloraError {
    VeloraError::Storage {
        source: Box::new(err),
    }
}
