// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`ConversationStore`] port.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use tracing::debug;

use velora_core::{
    ConversationState, ConversationStore, DebounceDecision, HistoryEntry, MessageId, ThreadId,
    VeloraError,
};

use crate::database::Database;
use crate::queries;

/// Conversation store backed by WAL-mode SQLite.
///
/// All reads and writes funnel through tokio-rusqlite's single background
/// thread, so each store operation is atomic; read-modify-write updates run
/// inside one connection call.
pub struct SqliteConversationStore {
    db: Database,
    /// Business timezone, used to compute local midnight for greetings.
    offset: FixedOffset,
    /// Maximum history rows retained per thread.
    history_cap: u32,
    /// Maximum processed message ids retained per thread.
    processed_cap: u32,
}

impl SqliteConversationStore {
    pub fn new(db: Database, offset: FixedOffset, history_cap: u32, processed_cap: u32) -> Self {
        Self {
            db,
            offset,
            history_cap,
            processed_cap,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
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
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn state(&self, thread: &ThreadId) -> Result<ConversationState, VeloraError> {
        Ok(queries::threads::get_state(&self.db, thread)
            .await?
            .unwrap_or_default())
    }

    async fn set_state(
        &self,
        thread: &ThreadId,
        state: &ConversationState,
    ) -> Result<(), VeloraError> {
        let now = state
            .last_seen_at
            .or(state.last_outbound_at)
            .unwrap_or(0.0);
        queries::threads::set_state(&self.db, thread, state, now).await
    }

    async fn append_history(
        &self,
        thread: &ThreadId,
        entry: &HistoryEntry,
    ) -> Result<(), VeloraError> {
        queries::history::append(&self.db, thread, entry, self.history_cap).await
    }

    async fn recent_history(
        &self,
        thread: &ThreadId,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, VeloraError> {
        queries::history::recent(&self.db, thread, limit).await
    }

    async fn has_processed(
        &self,
        thread: &ThreadId,
        message: &MessageId,
    ) -> Result<bool, VeloraError> {
        queries::processed::has_processed(&self.db, thread, message).await
    }

    async fn mark_processed(
        &self,
        thread: &ThreadId,
        message: &MessageId,
    ) -> Result<(), VeloraError> {
        queries::processed::mark_processed(&self.db, thread, message, self.processed_cap).await
    }

    async fn should_process(
        &self,
        thread: &ThreadId,
        message: &MessageId,
        cooldown_seconds: f64,
        now: f64,
    ) -> Result<DebounceDecision, VeloraError> {
        queries::debounce::should_process(&self.db, thread, message, cooldown_seconds, now).await
    }

    async fn mark_received(
        &self,
        thread: &ThreadId,
        message: &MessageId,
        now: f64,
    ) -> Result<(), VeloraError> {
        queries::debounce::mark_received(&self.db, thread, message, now).await?;
        queries::threads::update_state(&self.db, thread, now, move |state| {
            state.with_last_seen(now)
        })
        .await?;
        Ok(())
    }

    async fn should_greet_today(
        &self,
        thread: &ThreadId,
        now: f64,
    ) -> Result<bool, VeloraError> {
        let state = self.state(thread).await?;
        let midnight = self.local_midnight(now)?;
        match state.greeted_at {
            Some(greeted_at) if greeted_at >= midnight => Ok(false),
            _ => Ok(true),
        }
    }

    async fn mark_greeted(&self, thread: &ThreadId, now: f64) -> Result<(), VeloraError> {
        debug!(thread_id = %thread, "marking thread greeted");
        queries::threads::update_state(&self.db, thread, now, move |state| {
            state.with_greeted(now)
        })
        .await?;
        Ok(())
    }

    async fn mark_outbound(&self, thread: &ThreadId, now: f64) -> Result<(), VeloraError> {
        queries::threads::update_state(&self.db, thread, now, move |state| {
            state.with_last_outbound(now)
        })
        .await?;
        Ok(())
    }
}
