// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-thread conversation history.
//!
//! History is capped at append time; eviction is oldest-first so the
//! retained window always holds the most recent turns.

use rusqlite::params;
use velora_core::{HistoryEntry, HistoryRole, ThreadId, VeloraError};

use crate::database::{map_tr_err, Database};

/// Append one history entry for a thread and evict beyond `cap`.
pub async fn append(
    db: &Database,
    thread: &ThreadId,
    entry: &HistoryEntry,
    cap: u32,
) -> Result<(), VeloraError> {
    let thread_id = thread.0.clone();
    let role = entry.role.to_string();
    let text = entry.text.clone();
    let ts = entry.ts;
    let meta = if entry.meta.is_null() {
        None
    } else {
        Some(serde_json::to_string(&entry.meta).map_err(VeloraError::storage)?)
    };
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO history (thread_id, role, text, ts, meta)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![thread_id, role, text, ts, meta],
            )?;
            conn.execute(
                "DELETE FROM history
                 WHERE thread_id = ?1 AND id NOT IN (
                     SELECT id FROM history
                     WHERE thread_id = ?1 ORDER BY id DESC LIMIT ?2
                 )",
                params![thread_id, cap],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Up to `limit` most recent entries for a thread, oldest first.
pub async fn recent(
    db: &Database,
    thread: &ThreadId,
    limit: u32,
) -> Result<Vec<HistoryEntry>, VeloraError> {
    let thread_id = thread.0.clone();
    let mut entries = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT role, text, ts, meta FROM history
                 WHERE thread_id = ?1 ORDER BY id DESC LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![thread_id, limit], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?;
            let mut raw = Vec::new();
            for row in rows {
                raw.push(row?);
            }
            Ok(raw)
        })
        .await
        .map_err(map_tr_err)?
        .into_iter()
        .map(|(role, text, ts, meta)| {
            let role: HistoryRole = role
                .parse()
                .map_err(|_| VeloraError::Internal(format!("unknown history role `{role}`")))?;
            let mut entry = HistoryEntry::new(role, text, ts);
            if let Some(meta) = meta {
                entry = entry.with_meta(
                    serde_json::from_str(&meta).map_err(VeloraError::storage)?,
                );
            }
            Ok(entry)
        })
        .collect::<Result<Vec<_>, VeloraError>>()?;
    entries.reverse();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use serde_json::json;

    fn thread() -> ThreadId {
        ThreadId("t1".into())
    }

    #[tokio::test]
    async fn append_and_read_back_in_order() {
        let db = Database::open_in_memory().await.unwrap();
        for i in 0..5 {
            let entry = HistoryEntry::new(HistoryRole::User, format!("msg {i}"), i as f64);
            append(&db, &thread(), &entry, 50).await.unwrap();
        }

        let entries = recent(&db, &thread(), 10).await.unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].text, "msg 0");
        assert_eq!(entries[4].text, "msg 4");
    }

    #[tokio::test]
    async fn limit_keeps_most_recent_entries() {
        let db = Database::open_in_memory().await.unwrap();
        for i in 0..10 {
            let entry = HistoryEntry::new(HistoryRole::Assistant, format!("m{i}"), i as f64);
            append(&db, &thread(), &entry, 50).await.unwrap();
        }

        let entries = recent(&db, &thread(), 3).await.unwrap();
        assert_eq!(entries.len(), 3);
        // Oldest-first within the retained window.
        assert_eq!(entries[0].text, "m7");
        assert_eq!(entries[2].text, "m9");
    }

    #[tokio::test]
    async fn cap_evicts_oldest_rows() {
        let db = Database::open_in_memory().await.unwrap();
        for i in 0..8 {
            let entry = HistoryEntry::new(HistoryRole::User, format!("m{i}"), i as f64);
            append(&db, &thread(), &entry, 5).await.unwrap();
        }

        // Only the newest five rows survive, regardless of the read limit.
        let entries = recent(&db, &thread(), 50).await.unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].text, "m3");
        assert_eq!(entries[4].text, "m7");
    }

    #[tokio::test]
    async fn cap_is_per_thread() {
        let db = Database::open_in_memory().await.unwrap();
        let other = ThreadId("t2".into());
        for i in 0..3 {
            let entry = HistoryEntry::new(HistoryRole::User, format!("a{i}"), i as f64);
            append(&db, &thread(), &entry, 2).await.unwrap();
            let entry = HistoryEntry::new(HistoryRole::User, format!("b{i}"), i as f64);
            append(&db, &other, &entry, 2).await.unwrap();
        }

        assert_eq!(recent(&db, &thread(), 10).await.unwrap().len(), 2);
        assert_eq!(recent(&db, &other, 10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn meta_round_trips() {
        let db = Database::open_in_memory().await.unwrap();
        let entry = HistoryEntry::new(HistoryRole::System, "handoff", 1.0)
            .with_meta(json!({"reason": "out_of_scope"}));
        append(&db, &thread(), &entry, 50).await.unwrap();

        let entries = recent(&db, &thread(), 1).await.unwrap();
        assert_eq!(entries[0].meta["reason"], "out_of_scope");
    }

    #[tokio::test]
    async fn threads_are_isolated() {
        let db = Database::open_in_memory().await.unwrap();
        let other = ThreadId("t2".into());
        append(
            &db,
            &thread(),
            &HistoryEntry::new(HistoryRole::User, "mine", 1.0),
            50,
        )
        .await
        .unwrap();

        assert!(recent(&db, &other, 10).await.unwrap().is_empty());
    }
}
