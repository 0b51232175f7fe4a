// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`ConversationStore`] for tests and the local REPL.
//!
//! Matches the SQLite store's observable semantics: per-thread atomic state
//! replacement, capped history and processed-id sets, debounce bookkeeping,
//! and local-midnight greeting boundaries.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset};
use tokio::sync::Mutex;

use velora_core::{
    ConversationState, ConversationStore, DebounceDecision, HistoryEntry, MessageId, ThreadId,
    VeloraError,
};

#[derive(Default)]
struct ThreadRecord {
    state: ConversationState,
    history: Vec<HistoryEntry>,
    processed: VecDeque<MessageId>,
    last_received: Option<(MessageId, f64)>,
}

/// In-memory conversation store. One mutex over all threads; fine for
/// tests and single-user sessions.
pub struct MemoryStore {
    threads: Mutex<HashMap<String, ThreadRecord>>,
    offset: FixedOffset,
    history_cap: usize,
    processed_cap: usize,
}

impl MemoryStore {
    /// Store with the default business offset (UTC-8).
    pub fn new() -> Self {
        Self::with_offset(
            FixedOffset::west_opt(8 * 3600).unwrap_or_else(|| chrono::Utc.fix()),
        )
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            threads: Mutex::new(HashMap::new()),
            offset,
            history_cap: 50,
            processed_cap: 1000,
        }
    }

    /// Epoch seconds of local midnight for the day containing `now`.
    fn local_midnight(&self, now: f64) -> Result<f64, VeloraError> {
        let dt = DateTime::from_timestamp(now as i64, 0)
            .ok_or_else(|| VeloraError::Internal(format!("timestamp out of range: {now}")))?
            .with_timezone(&self.offset);
        let midnight = dt
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| naive.and_local_timezone(self.offset).single())
            .ok_or_else(|| VeloraError::Internal("invalid local midnight".to_string()))?;
        Ok(midnight.timestamp() as f64)
    }

    /// Full history for a thread, oldest first. Test helper.
    pub async fn history(&self, thread: &ThreadId) -> Vec<HistoryEntry> {
        let threads = self.threads.lock().await;
        threads
            .get(&thread.0)
            .map(|record| record.history.clone())
            .unwrap_or_default()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn state(&self, thread: &ThreadId) -> Result<ConversationState, VeloraError> {
        let threads = self.threads.lock().await;
        Ok(threads
            .get(&thread.0)
            .map(|record| record.state.clone())
            .unwrap_or_default())
    }

    async fn set_state(
        &self,
        thread: &ThreadId,
        state: &ConversationState,
    ) -> Result<(), VeloraError> {
        let mut threads = self.threads.lock().await;
        threads.entry(thread.0.clone()).or_default().state = state.clone();
        Ok(())
    }

    async fn append_history(
        &self,
        thread: &ThreadId,
        entry: &HistoryEntry,
    ) -> Result<(), VeloraError> {
        let mut threads = self.threads.lock().await;
        let record = threads.entry(thread.0.clone()).or_default();
        record.history.push(entry.clone());
        let excess = record.history.len().saturating_sub(self.history_cap);
        if excess > 0 {
            record.history.drain(..excess);
        }
        Ok(())
    }

    async fn recent_history(
        &self,
        thread: &ThreadId,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, VeloraError> {
        let threads = self.threads.lock().await;
        let Some(record) = threads.get(&thread.0) else {
            return Ok(Vec::new());
        };
        let skip = record.history.len().saturating_sub(limit as usize);
        Ok(record.history[skip..].to_vec())
    }

    async fn has_processed(
        &self,
        thread: &ThreadId,
        message: &MessageId,
    ) -> Result<bool, VeloraError> {
        let threads = self.threads.lock().await;
        Ok(threads
            .get(&thread.0)
            .is_some_and(|record| record.processed.contains(message)))
    }

    async fn mark_processed(
        &self,
        thread: &ThreadId,
        message: &MessageId,
    ) -> Result<(), VeloraError> {
        let mut threads = self.threads.lock().await;
        let record = threads.entry(thread.0.clone()).or_default();
        record.processed.push_back(message.clone());
        while record.processed.len() > self.processed_cap {
            record.processed.pop_front();
        }
        Ok(())
    }

    async fn should_process(
        &self,
        thread: &ThreadId,
        message: &MessageId,
        cooldown_seconds: f64,
        now: f64,
    ) -> Result<DebounceDecision, VeloraError> {
        let threads = self.threads.lock().await;
        if let Some(record) = threads.get(&thread.0)
            && let Some((prev_id, received_at)) = &record.last_received
            && prev_id != message
            && now - received_at < cooldown_seconds
        {
            return Ok(DebounceDecision::coalesced(prev_id.clone()));
        }
        Ok(DebounceDecision::proceed())
    }

    async fn mark_received(
        &self,
        thread: &ThreadId,
        message: &MessageId,
        now: f64,
    ) -> Result<(), VeloraError> {
        let mut threads = self.threads.lock().await;
        let record = threads.entry(thread.0.clone()).or_default();
        record.last_received = Some((message.clone(), now));
        record.state = record.state.with_last_seen(now);
        Ok(())
    }

    async fn should_greet_today(
        &self,
        thread: &ThreadId,
        now: f64,
    ) -> Result<bool, VeloraError> {
        let midnight = self.local_midnight(now)?;
        let threads = self.threads.lock().await;
        let greeted_at = threads.get(&thread.0).and_then(|r| r.state.greeted_at);
        match greeted_at {
            Some(greeted_at) if greeted_at >= midnight => Ok(false),
            _ => Ok(true),
        }
    }

    async fn mark_greeted(&self, thread: &ThreadId, now: f64) -> Result<(), VeloraError> {
        let mut threads = self.threads.lock().await;
        let record = threads.entry(thread.0.clone()).or_default();
        record.state = record.state.with_greeted(now);
        Ok(())
    }

    async fn mark_outbound(&self, thread: &ThreadId, now: f64) -> Result<(), VeloraError> {
        let mut threads = self.threads.lock().await;
        let record = threads.entry(thread.0.clone()).or_default();
        record.state = record.state.with_last_outbound(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use velora_core::HistoryRole;

    fn thread() -> ThreadId {
        ThreadId("ig:t1".into())
    }

    #[tokio::test]
    async fn debounce_coalesces_inside_cooldown() {
        let store = MemoryStore::new();
        let m1 = MessageId("m1".into());
        let m2 = MessageId("m2".into());

        assert!(store
            .should_process(&thread(), &m1, 3.0, 0.0)
            .await
            .unwrap()
            .proceed);
        store.mark_received(&thread(), &m1, 0.0).await.unwrap();

        let decision = store.should_process(&thread(), &m2, 3.0, 1.0).await.unwrap();
        assert!(!decision.proceed);
        assert_eq!(decision.coalesced_with, Some(m1));
    }

    #[tokio::test]
    async fn processed_set_is_capped() {
        let mut store = MemoryStore::new();
        store.processed_cap = 3;
        for i in 0..5 {
            store
                .mark_processed(&thread(), &MessageId(format!("m{i}")))
                .await
                .unwrap();
        }
        assert!(!store
            .has_processed(&thread(), &MessageId("m0".into()))
            .await
            .unwrap());
        assert!(store
            .has_processed(&thread(), &MessageId("m4".into()))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn history_is_capped() {
        let mut store = MemoryStore::new();
        store.history_cap = 3;
        for i in 0..5 {
            store
                .append_history(
                    &thread(),
                    &HistoryEntry::new(HistoryRole::User, format!("msg {i}"), i as f64),
                )
                .await
                .unwrap();
        }
        let history = store.history(&thread()).await;
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].text, "msg 2");
        assert_eq!(history[2].text, "msg 4");
    }

    #[tokio::test]
    async fn recent_history_returns_tail() {
        let store = MemoryStore::new();
        for i in 0..4 {
            store
                .append_history(
                    &thread(),
                    &HistoryEntry::new(HistoryRole::User, format!("msg {i}"), i as f64),
                )
                .await
                .unwrap();
        }
        let recent = store.recent_history(&thread(), 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].text, "msg 2");
        assert_eq!(recent[1].text, "msg 3");
    }

    #[tokio::test]
    async fn greeting_resets_at_local_midnight() {
        let store = MemoryStore::new();
        let noon = 1_700_000_000.0;
        assert!(store.should_greet_today(&thread(), noon).await.unwrap());
        store.mark_greeted(&thread(), noon).await.unwrap();
        assert!(!store.should_greet_today(&thread(), noon + 3600.0).await.unwrap());
        assert!(store
            .should_greet_today(&thread(), noon + 86_400.0)
            .await
            .unwrap());
    }
}
