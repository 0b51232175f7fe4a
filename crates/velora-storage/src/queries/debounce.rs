// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debounce window tracking: one record per thread holding the last
//! inbound message id and its arrival time.

use rusqlite::params;
use velora_core::{DebounceDecision, MessageId, ThreadId, VeloraError};

use crate::database::{map_tr_err, Database};

/// Decide whether `message` should be processed now or coalesced with the
/// previous inbound message.
///
/// A different message arriving strictly inside the cooldown window is
/// coalesced; the same message id, an expired window, or no prior record
/// all proceed.
pub async fn should_process(
    db: &Database,
    thread: &ThreadId,
    message: &MessageId,
    cooldown_seconds: f64,
    now: f64,
) -> Result<DebounceDecision, VeloraError> {
    let thread_id = thread.0.clone();
    let previous = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT message_id, received_at FROM debounce WHERE thread_id = ?1",
            )?;
            let result = stmt.query_row(params![thread_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            });
            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)?;

    match previous {
        Some((prev_id, received_at))
            if prev_id != message.0 && now - received_at < cooldown_seconds =>
        {
            Ok(DebounceDecision::coalesced(MessageId(prev_id)))
        }
        _ => Ok(DebounceDecision::proceed()),
    }
}

/// Record the arrival of an inbound message. Called for every message,
/// whatever the debounce decision, so the window slides with each arrival.
pub async fn mark_received(
    db: &Database,
    thread: &ThreadId,
    message: &MessageId,
    now: f64,
) -> Result<(), VeloraError> {
    let thread_id = thread.0.clone();
    let message_id = message.0.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO debounce (thread_id, message_id, received_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(thread_id) DO UPDATE SET message_id = ?2, received_at = ?3",
                params![thread_id, message_id, now],
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

    fn m(id: &str) -> MessageId {
        MessageId(id.into())
    }

    #[tokio::test]
    async fn first_message_proceeds() {
        let db = Database::open_in_memory().await.unwrap();
        let decision = should_process(&db, &thread(), &m("m1"), 3.0, 0.0)
            .await
            .unwrap();
        assert!(decision.proceed);
        assert_eq!(decision.coalesced_with, None);
    }

    #[tokio::test]
    async fn rapid_followup_coalesces_and_window_slides() {
        let db = Database::open_in_memory().await.unwrap();
        mark_received(&db, &thread(), &m("m1"), 0.0).await.unwrap();

        let decision = should_process(&db, &thread(), &m("m2"), 3.0, 1.0)
            .await
            .unwrap();
        assert!(!decision.proceed);
        assert_eq!(decision.coalesced_with, Some(m("m1")));

        // The arrival is still recorded, sliding the window forward.
        mark_received(&db, &thread(), &m("m2"), 1.0).await.unwrap();

        // Exactly at the window boundary proceeds.
        let decision = should_process(&db, &thread(), &m("m3"), 3.0, 4.0)
            .await
            .unwrap();
        assert!(decision.proceed);
    }

    #[tokio::test]
    async fn redelivery_of_same_message_proceeds() {
        let db = Database::open_in_memory().await.unwrap();
        mark_received(&db, &thread(), &m("m1"), 0.0).await.unwrap();

        // Same id inside the window is not coalesced; idempotency handles it.
        let decision = should_process(&db, &thread(), &m("m1"), 3.0, 0.5)
            .await
            .unwrap();
        assert!(decision.proceed);
    }

    #[tokio::test]
    async fn threads_have_independent_windows() {
        let db = Database::open_in_memory().await.unwrap();
        mark_received(&db, &thread(), &m("m1"), 0.0).await.unwrap();

        let other = ThreadId("t2".into());
        let decision = should_process(&db, &other, &m("m2"), 3.0, 0.5)
            .await
            .unwrap();
        assert!(decision.proceed);
    }
}
