// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-thread state reads and atomic whole-state writes.
//!
//! The state column holds the serialized `ConversationState` and is always
//! replaced in full; partial updates go through [`update_state`], which
//! performs the read-modify-write inside a single connection call so no
//! interleaved write can be lost.

use rusqlite::params;
use velora_core::{ConversationState, ThreadId, VeloraError};

use crate::database::{map_tr_err, Database};

/// Load a thread's state, or `None` if the thread has never been written.
pub async fn get_state(
    db: &Database,
    thread: &ThreadId,
) -> Result<Option<ConversationState>, VeloraError> {
    let thread_id = thread.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare("SELECT state FROM threads WHERE thread_id = ?1")?;
            let result = stmt.query_row(params![thread_id], |row| row.get::<_, String>(0));
            match result {
                Ok(json) => Ok(Some(json)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)?
        .map(|json| {
            serde_json::from_str(&json).map_err(VeloraError::storage)
        })
        .transpose()
}

/// Replace a thread's state wholesale.
pub async fn set_state(
    db: &Database,
    thread: &ThreadId,
    state: &ConversationState,
    now: f64,
) -> Result<(), VeloraError> {
    let thread_id = thread.0.clone();
    let json = serde_json::to_string(state).map_err(VeloraError::storage)?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO threads (thread_id, state, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(thread_id) DO UPDATE SET state = ?2, updated_at = ?3",
                params![thread_id, json, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Failure inside the read-modify-write closure: the statement itself or
/// the state (de)serialization.
#[derive(Debug, thiserror::Error)]
enum StateRowError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("state serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Apply `update` to the current state and persist the result atomically.
///
/// Runs entirely inside one connection call; tokio-rusqlite's single
/// background thread guarantees no other write interleaves.
pub async fn update_state<F>(
    db: &Database,
    thread: &ThreadId,
    now: f64,
    update: F,
) -> Result<ConversationState, VeloraError>
where
    F: FnOnce(&ConversationState) -> ConversationState + Send + 'static,
{
    let thread_id = thread.0.clone();
    db.connection()
        .call(move |conn| -> Result<ConversationState, StateRowError> {
            let mut stmt = conn.prepare("SELECT state FROM threads WHERE thread_id = ?1")?;
            let current = match stmt.query_row(params![thread_id], |row| row.get::<_, String>(0))
            {
                Ok(json) => serde_json::from_str(&json)?,
                Err(rusqlite::Error::QueryReturnedNoRows) => ConversationState::default(),
                Err(e) => return Err(e.into()),
            };
            let updated = update(&current);
            let json = serde_json::to_string(&updated)?;
            conn.execute(
                "INSERT INTO threads (thread_id, state, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(thread_id) DO UPDATE SET state = ?2, updated_at = ?3",
                params![thread_id, json, now],
            )?;
            Ok(updated)
        })
        .await
        .map_err(VeloraError::storage)
}
