// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable per-thread conversation state.
//!
//! `ConversationState` is the aggregate root the store persists per thread.
//! All types here are immutable values: updates go through `with_*` builders
//! that produce a full replacement, and the orchestrator writes the
//! replacement back atomically. This preserves an audit trail of exactly
//! which state existed at each message.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::{Intent, Language};

/// Position in the guided booking dialogue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    None,
    CollectingService,
    CollectingDate,
    CollectingTime,
    Confirming,
    Confirmed,
}

/// Booking sub-flow state embedded in [`ConversationState`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingState {
    pub status: BookingStatus,
    /// Day the user asked about, no time of day.
    pub proposed_date: Option<NaiveDate>,
    /// Concrete slot start under negotiation or booked.
    pub proposed_time: Option<NaiveDateTime>,
    /// Canonical service registry key.
    pub service_key: Option<String>,
    /// External calendar event id, set once `status` is `Confirmed`.
    pub calendar_event_id: Option<String>,
    pub duration_minutes: Option<u32>,
}

impl BookingState {
    /// True while the booking dialogue owns the turn.
    pub fn is_active(&self) -> bool {
        self.status != BookingStatus::None
    }
}

/// Position in the category-disambiguation dialogue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    #[default]
    None,
    AwaitingServiceChoice,
    ServiceSelected,
}

/// Selection sub-flow state embedded in [`ConversationState`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub status: SelectionStatus,
    /// Coarse category awaiting disambiguation, e.g. "laser".
    pub pending_category: Option<String>,
    /// Canonical service registry key once pinned down.
    pub selected_service_key: Option<String>,
    /// Raw user text of the last service mention.
    pub last_service_mention: Option<String>,
}

/// The durable aggregate per conversation thread.
///
/// At most one of `booking`/`selection` drives routing at a time; the
/// orchestrator enforces this by precedence (booking first), not by a hard
/// storage constraint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConversationState {
    pub last_intent: Option<Intent>,
    /// Sticky canonical service key from earlier turns.
    pub last_service: Option<String>,
    pub language: Option<Language>,
    /// Epoch seconds, all in the business timezone offset.
    pub last_seen_at: Option<f64>,
    pub last_outbound_at: Option<f64>,
    pub greeted_at: Option<f64>,
    #[serde(default)]
    pub booking: BookingState,
    #[serde(default)]
    pub selection: SelectionState,
}

impl ConversationState {
    pub fn with_last_seen(&self, ts: f64) -> Self {
        Self {
            last_seen_at: Some(ts),
            ..self.clone()
        }
    }

    pub fn with_last_outbound(&self, ts: f64) -> Self {
        Self {
            last_outbound_at: Some(ts),
            ..self.clone()
        }
    }

    pub fn with_greeted(&self, ts: f64) -> Self {
        Self {
            greeted_at: Some(ts),
            ..self.clone()
        }
    }

    pub fn with_language(&self, language: Language) -> Self {
        Self {
            language: Some(language),
            ..self.clone()
        }
    }

    pub fn with_last_intent(&self, intent: Intent) -> Self {
        Self {
            last_intent: Some(intent),
            ..self.clone()
        }
    }

    /// Set `last_service` only if it is not already set (sticky service).
    pub fn with_service_if_unset(&self, service: Option<&str>) -> Self {
        Self {
            last_service: self
                .last_service
                .clone()
                .or_else(|| service.map(str::to_owned)),
            ..self.clone()
        }
    }

    pub fn with_booking(&self, booking: BookingState) -> Self {
        Self {
            booking,
            ..self.clone()
        }
    }

    pub fn with_selection(&self, selection: SelectionState) -> Self {
        Self {
            selection,
            ..self.clone()
        }
    }

    /// Reset the booking sub-flow (explicit user cancellation).
    pub fn with_booking_reset(&self) -> Self {
        Self {
            booking: BookingState::default(),
            ..self.clone()
        }
    }
}
