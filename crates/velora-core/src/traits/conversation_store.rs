// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence port for per-thread conversation state.

use async_trait::async_trait;

use crate::error::VeloraError;
use crate::state::ConversationState;
use crate::types::{DebounceDecision, HistoryEntry, MessageId, ThreadId};

/// Durable conversation state, history, and message bookkeeping.
///
/// Implementations must make `set_state` atomic per thread: a reader never
/// observes a partially applied state. All timestamps are epoch seconds in
/// the business timezone.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Loads the current state for a thread, or the default if none exists.
    async fn state(&self, thread: &ThreadId) -> Result<ConversationState, VeloraError>;

    /// Replaces the thread's state wholesale.
    async fn set_state(
        &self,
        thread: &ThreadId,
        state: &ConversationState,
    ) -> Result<(), VeloraError>;

    /// Appends one entry to the thread's history log.
    async fn append_history(
        &self,
        thread: &ThreadId,
        entry: &HistoryEntry,
    ) -> Result<(), VeloraError>;

    /// Returns up to `limit` most recent history entries, oldest first.
    async fn recent_history(
        &self,
        thread: &ThreadId,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, VeloraError>;

    /// True if this message id was already processed for the thread.
    async fn has_processed(
        &self,
        thread: &ThreadId,
        message: &MessageId,
    ) -> Result<bool, VeloraError>;

    /// Records a message id as processed. The processed set is capped;
    /// oldest entries are evicted first.
    async fn mark_processed(
        &self,
        thread: &ThreadId,
        message: &MessageId,
    ) -> Result<(), VeloraError>;

    /// Debounce check: whether `message` should generate a reply now, or be
    /// coalesced with the previous inbound message inside the cooldown
    /// window.
    async fn should_process(
        &self,
        thread: &ThreadId,
        message: &MessageId,
        cooldown_seconds: f64,
        now: f64,
    ) -> Result<DebounceDecision, VeloraError>;

    /// Records an inbound message arrival for debounce tracking. Always
    /// called, regardless of the debounce decision.
    async fn mark_received(
        &self,
        thread: &ThreadId,
        message: &MessageId,
        now: f64,
    ) -> Result<(), VeloraError>;

    /// True if no greeting has been sent to this thread since local
    /// midnight of `now`.
    async fn should_greet_today(
        &self,
        thread: &ThreadId,
        now: f64,
    ) -> Result<bool, VeloraError>;

    /// Stamps the thread as greeted at `now`.
    async fn mark_greeted(&self, thread: &ThreadId, now: f64) -> Result<(), VeloraError>;

    /// Stamps the last outbound send at `now`.
    async fn mark_outbound(&self, thread: &ThreadId, now: f64) -> Result<(), VeloraError>;
}
