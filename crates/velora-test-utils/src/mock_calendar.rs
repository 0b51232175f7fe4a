// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic in-memory calendar for tests and the local REPL.
//!
//! Offers a 30-minute slot grid inside business hours, overlap-checked
//! against booked events. Event ids are sequential and predictable.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tokio::sync::Mutex;

use velora_core::{Calendar, VeloraError};

/// Most slots ever returned from one availability query.
const MAX_SLOTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockEvent {
    pub id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
    pub description: String,
}

/// In-memory calendar with a fixed 30-minute grid.
pub struct MockCalendar {
    events: Mutex<Vec<MockEvent>>,
    next_id: AtomicU64,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// All booked events, in creation order. Test helper.
    pub async fn events(&self) -> Vec<MockEvent> {
        self.events.lock().await.clone()
    }

    fn overlaps(events: &[MockEvent], start: NaiveDateTime, end: NaiveDateTime) -> bool {
        events.iter().any(|e| start < e.end && end > e.start)
    }
}

impl Default for MockCalendar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Calendar for MockCalendar {
    async fn check_availability(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<bool, VeloraError> {
        let events = self.events.lock().await;
        Ok(!Self::overlaps(&events, start, end))
    }

    async fn find_available_slots(
        &self,
        date: NaiveDate,
        duration_minutes: u32,
        start_hour: u32,
        end_hour: u32,
    ) -> Result<Vec<NaiveDateTime>, VeloraError> {
        let open = date.and_hms_opt(start_hour, 0, 0);
        let close = date.and_hms_opt(end_hour, 0, 0);
        let (Some(open), Some(close)) = (open, close) else {
            return Err(VeloraError::Calendar {
                message: format!("invalid business hours {start_hour}..{end_hour}"),
                source: None,
            });
        };

        let duration = Duration::minutes(duration_minutes as i64);
        let events = self.events.lock().await;
        let mut slots = Vec::new();
        let mut cursor = open;
        while cursor + duration <= close && slots.len() < MAX_SLOTS {
            if !Self::overlaps(&events, cursor, cursor + duration) {
                slots.push(cursor);
            }
            cursor += Duration::minutes(30);
        }
        Ok(slots)
    }

    async fn create_event(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        title: &str,
        description: &str,
    ) -> Result<String, VeloraError> {
        let id = format!("mock_event_{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut events = self.events.lock().await;
        events.push(MockEvent {
            id: id.clone(),
            start,
            end,
            title: title.to_string(),
            description: description.to_string(),
        });
        Ok(id)
    }

    async fn cancel_event(&self, event_id: &str) -> Result<bool, VeloraError> {
        let mut events = self.events.lock().await;
        let before = events.len();
        events.retain(|e| e.id != event_id);
        Ok(events.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
    }

    #[tokio::test]
    async fn slot_grid_respects_hours_and_cap() {
        let calendar = MockCalendar::new();
        let slots = calendar.find_available_slots(date(), 60, 9, 19).await.unwrap();
        assert_eq!(slots.len(), 10);
        assert_eq!(slots[0], date().and_hms_opt(9, 0, 0).unwrap());
        assert_eq!(slots[1], date().and_hms_opt(9, 30, 0).unwrap());
    }

    #[tokio::test]
    async fn booked_window_is_excluded() {
        let calendar = MockCalendar::new();
        let start = date().and_hms_opt(9, 0, 0).unwrap();
        let end = date().and_hms_opt(10, 0, 0).unwrap();
        let id = calendar.create_event(start, end, "Test", "").await.unwrap();
        assert_eq!(id, "mock_event_1");

        assert!(!calendar.check_availability(start, end).await.unwrap());
        let slots = calendar.find_available_slots(date(), 60, 9, 19).await.unwrap();
        assert!(!slots.contains(&start));
        // 9:30 start overlaps the booked hour too.
        assert!(!slots.contains(&date().and_hms_opt(9, 30, 0).unwrap()));
        assert!(slots.contains(&end));
    }

    #[tokio::test]
    async fn cancel_frees_the_window() {
        let calendar = MockCalendar::new();
        let start = date().and_hms_opt(14, 0, 0).unwrap();
        let end = date().and_hms_opt(15, 0, 0).unwrap();
        let id = calendar.create_event(start, end, "Test", "").await.unwrap();
        assert!(calendar.cancel_event(&id).await.unwrap());
        assert!(!calendar.cancel_event(&id).await.unwrap());
        assert!(calendar.check_availability(start, end).await.unwrap());
    }
}
