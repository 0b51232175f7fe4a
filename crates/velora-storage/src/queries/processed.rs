// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Processed message id bookkeeping for idempotent delivery.
//!
//! The processed set per thread is capped; eviction is oldest-first by
//! insertion order so redelivery of recent messages stays detectable.

use rusqlite::params;
use velora_core::{MessageId, ThreadId, VeloraError};

use crate::database::{map_tr_err, Database};

/// True if this message id was already processed for the thread.
pub async fn has_processed(
    db: &Database,
    thread: &ThreadId,
    message: &MessageId,
) -> Result<bool, VeloraError> {
    let thread_id = thread.0.clone();
    let message_id = message.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT 1 FROM processed_messages WHERE thread_id = ?1 AND message_id = ?2",
            )?;
            let found = stmt.exists(params![thread_id, message_id])?;
            Ok(found)
        })
        .await
        .map_err(map_tr_err)
}

/// Record a message id as processed and evict beyond `cap`.
pub async fn mark_processed(
    db: &Database,
    thread: &ThreadId,
    message: &MessageId,
    cap: u32,
) -> Result<(), VeloraError> {
    let thread_id = thread.0.clone();
    let message_id = message.0.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO processed_messages (thread_id, message_id)
                 VALUES (?1, ?2)",
                params![thread_id, message_id],
            )?;
            conn.execute(
                "DELETE FROM processed_messages
                 WHERE thread_id = ?1 AND seq NOT IN (
                     SELECT seq FROM processed_messages
                     WHERE thread_id = ?1 ORDER BY seq DESC LIMIT ?2
                 )",
                params![thread_id, cap],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread() -> ThreadId {
        ThreadId("t1".into())
    }

    #[tokio::test]
    async fn unseen_message_is_not_processed() {
        let db = Database::open_in_memory().await.unwrap();
        let seen = has_processed(&db, &thread(), &MessageId("m1".into()))
            .await
            .unwrap();
        assert!(!seen);
    }

    #[tokio::test]
    async fn mark_then_check() {
        let db = Database::open_in_memory().await.unwrap();
        let m = MessageId("m1".into());
        mark_processed(&db, &thread(), &m, 1000).await.unwrap();
        assert!(has_processed(&db, &thread(), &m).await.unwrap());
        // Marking twice is harmless.
        mark_processed(&db, &thread(), &m, 1000).await.unwrap();
        assert!(has_processed(&db, &thread(), &m).await.unwrap());
    }

    #[tokio::test]
    async fn cap_evicts_oldest_first() {
        let db = Database::open_in_memory().await.unwrap();
        for i in 0..5 {
            mark_processed(&db, &thread(), &MessageId(format!("m{i}")), 3)
                .await
                .unwrap();
        }

        // m0 and m1 were evicted, the latest three remain.
        assert!(!has_processed(&db, &thread(), &MessageId("m0".into()))
            .await
            .unwrap());
        assert!(!has_processed(&db, &thread(), &MessageId("m1".into()))
            .await
            .unwrap());
        for i in 2..5 {
            assert!(has_processed(&db, &thread(), &MessageId(format!("m{i}")))
                .await
                .unwrap());
        }
    }

    #[tokio::test]
    async fn cap_is_per_thread() {
        let db = Database::open_in_memory().await.unwrap();
        let other = ThreadId("t2".into());
        mark_processed(&db, &thread(), &MessageId("a".into()), 1)
            .await
            .unwrap();
        mark_processed(&db, &other, &MessageId("b".into()), 1)
            .await
            .unwrap();

        assert!(has_processed(&db, &thread(), &MessageId("a".into()))
            .await
            .unwrap());
        assert!(has_processed(&db, &other, &MessageId("b".into()))
            .await
            .unwrap());
    }
}
