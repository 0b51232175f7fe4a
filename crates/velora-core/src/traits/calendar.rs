// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar port for availability checks and event management.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::VeloraError;

/// Scheduling backend. All times are naive local times in the business
/// timezone.
#[async_trait]
pub trait Calendar: Send + Sync {
    /// True if the `[start, end)` window is free.
    async fn check_availability(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<bool, VeloraError>;

    /// Free slot starts on `date` for an appointment of `duration_minutes`,
    /// within `[start_hour, end_hour)` business hours, earliest first.
    async fn find_available_slots(
        &self,
        date: NaiveDate,
        duration_minutes: u32,
        start_hour: u32,
        end_hour: u32,
    ) -> Result<Vec<NaiveDateTime>, VeloraError>;

    /// Books an event and returns its backend id.
    async fn create_event(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        title: &str,
        description: &str,
    ) -> Result<String, VeloraError>;

    /// Cancels an event by id. Returns false if the id is unknown.
    async fn cancel_event(&self, event_id: &str) -> Result<bool, VeloraError>;
}
