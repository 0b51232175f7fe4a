// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking sub-flow state machine.
//!
//! Drives a thread from service selection through date and time collection
//! to a confirmed calendar event. Each step consumes one user message and
//! returns the action to voice plus the updated [`BookingState`]; the
//! caller persists the state and renders the action. Calendar failures
//! degrade to `Unavailable` without losing collected progress.

use std::sync::Arc;

use chrono::{NaiveDateTime, TimeDelta};
use tracing::warn;

use velora_core::{
    BookingState, BookingStatus, Calendar, ConversationState, Language, ServiceCatalog,
};

use crate::dates::{map_vague_time_to_range, parse_date_preference, parse_time_preference};

/// What the reply should say for this booking step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    AskService,
    AskDate,
    AskTime,
    SuggestSlots,
    Confirm,
    Booked,
    Unavailable,
    Reset,
}

/// One step of the booking flow.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub action: BookingAction,
    pub proposed_slots: Vec<NaiveDateTime>,
    pub updated_state: BookingState,
}

const CONFIRMATION_WORDS: &[&str] = &[
    "yes", "yeah", "yep", "sure", "ok", "okay", "confirm", "book it", "si", "sí", "claro",
    "vale", "confirmar",
];

pub struct BookingFlow {
    calendar: Arc<dyn Calendar>,
    catalog: Arc<dyn ServiceCatalog>,
    buffer_minutes: i64,
    open_hour: u32,
    close_hour: u32,
    max_suggested_slots: usize,
}

impl BookingFlow {
    pub fn new(
        calendar: Arc<dyn Calendar>,
        catalog: Arc<dyn ServiceCatalog>,
        buffer_minutes: i64,
        open_hour: u32,
        close_hour: u32,
        max_suggested_slots: usize,
    ) -> Self {
        Self {
            calendar,
            catalog,
            buffer_minutes,
            open_hour,
            close_hour,
            max_suggested_slots,
        }
    }

    /// Advance the flow by one user message.
    ///
    /// `service` is the service resolved for this message; when absent the
    /// flow falls back to the service already collected in `current` or
    /// carried in the wider conversation state.
    pub async fn process(
        &self,
        message_text: &str,
        current: &BookingState,
        service: Option<&str>,
        language: Language,
        conversation: &ConversationState,
        reference_date: chrono::NaiveDate,
    ) -> BookingOutcome {
        let normalized = message_text.to_lowercase();
        let resolved_service: Option<String> = service
            .map(str::to_string)
            .or_else(|| current.service_key.clone())
            .or_else(|| conversation.last_service.clone())
            .or_else(|| conversation.selection.selected_service_key.clone());

        match current.status {
            BookingStatus::None | BookingStatus::CollectingService => {
                match resolved_service {
                    Some(key) => self.start_flow(&key),
                    None => BookingOutcome {
                        action: BookingAction::AskService,
                        proposed_slots: Vec::new(),
                        updated_state: BookingState {
                            status: BookingStatus::CollectingService,
                            ..current.clone()
                        },
                    },
                }
            }
            BookingStatus::CollectingDate => {
                self.process_date_input(message_text, current, resolved_service.as_deref(), reference_date)
                    .await
            }
            BookingStatus::CollectingTime => {
                self.process_time_input(message_text, current, resolved_service.as_deref())
                    .await
            }
            BookingStatus::Confirming => {
                if is_confirmation(&normalized) {
                    self.confirm_booking(current, resolved_service.as_deref(), language)
                        .await
                } else {
                    BookingOutcome {
                        action: BookingAction::Confirm,
                        proposed_slots: current.proposed_time.into_iter().collect(),
                        updated_state: current.clone(),
                    }
                }
            }
            BookingStatus::Confirmed => BookingOutcome {
                action: BookingAction::Reset,
                proposed_slots: Vec::new(),
                updated_state: BookingState::default(),
            },
        }
    }

    fn start_flow(&self, service_key: &str) -> BookingOutcome {
        BookingOutcome {
            action: BookingAction::AskDate,
            proposed_slots: Vec::new(),
            updated_state: BookingState {
                status: BookingStatus::CollectingDate,
                service_key: Some(service_key.to_string()),
                duration_minutes: Some(self.catalog.duration_minutes(service_key)),
                ..BookingState::default()
            },
        }
    }

    async fn process_date_input(
        &self,
        message_text: &str,
        current: &BookingState,
        service: Option<&str>,
        reference_date: chrono::NaiveDate,
    ) -> BookingOutcome {
        let Some(date) = parse_date_preference(message_text, reference_date) else {
            return reask(BookingAction::AskDate, current);
        };

        let duration = self.service_duration(service);
        let slots = match self
            .calendar
            .find_available_slots(date, duration, self.open_hour, self.close_hour)
            .await
        {
            Ok(slots) => slots,
            Err(error) => {
                warn!(%error, %date, "calendar slot query failed");
                return reask(BookingAction::Unavailable, current);
            }
        };

        if slots.is_empty() {
            return reask(BookingAction::AskDate, current);
        }

        BookingOutcome {
            action: BookingAction::SuggestSlots,
            proposed_slots: slots.into_iter().take(self.max_suggested_slots).collect(),
            updated_state: BookingState {
                status: BookingStatus::CollectingTime,
                proposed_date: Some(date),
                service_key: service.map(str::to_string).or_else(|| current.service_key.clone()),
                duration_minutes: current.duration_minutes.or(Some(duration)),
                ..BookingState::default()
            },
        }
    }

    async fn process_time_input(
        &self,
        message_text: &str,
        current: &BookingState,
        service: Option<&str>,
    ) -> BookingOutcome {
        let Some(date) = current.proposed_date else {
            // Lost the date somehow; restart from date collection.
            return match service.or(current.service_key.as_deref()) {
                Some(key) => self.start_flow(key),
                None => reask(BookingAction::AskService, current),
            };
        };

        let duration = self.service_duration(service.or(current.service_key.as_deref()));

        if let Some((hour, minute)) = parse_time_preference(message_text) {
            let Some(start) = date.and_hms_opt(hour, minute, 0) else {
                return reask(BookingAction::AskTime, current);
            };
            let end = start + TimeDelta::minutes(i64::from(duration) + self.buffer_minutes);

            match self.calendar.check_availability(start, end).await {
                Ok(true) => {
                    return BookingOutcome {
                        action: BookingAction::Confirm,
                        proposed_slots: vec![start],
                        updated_state: BookingState {
                            status: BookingStatus::Confirming,
                            proposed_date: Some(date),
                            proposed_time: Some(start),
                            service_key: service
                                .map(str::to_string)
                                .or_else(|| current.service_key.clone()),
                            duration_minutes: Some(duration),
                            ..BookingState::default()
                        },
                    };
                }
                Ok(false) => {
                    // Requested time is taken; look one hour either side.
                    let window_start = hour.saturating_sub(1);
                    let window_end = (hour + 2).min(24);
                    match self
                        .calendar
                        .find_available_slots(date, duration, window_start, window_end)
                        .await
                    {
                        Ok(slots) if !slots.is_empty() => {
                            return BookingOutcome {
                                action: BookingAction::SuggestSlots,
                                proposed_slots: slots
                                    .into_iter()
                                    .take(self.max_suggested_slots)
                                    .collect(),
                                updated_state: current.clone(),
                            };
                        }
                        Ok(_) => {}
                        Err(error) => {
                            warn!(%error, "calendar nearby-slot query failed");
                            return reask(BookingAction::Unavailable, current);
                        }
                    }
                }
                Err(error) => {
                    warn!(%error, "calendar availability check failed");
                    return reask(BookingAction::Unavailable, current);
                }
            }
        }

        if let Some((start_hour, end_hour)) = map_vague_time_to_range(message_text) {
            match self
                .calendar
                .find_available_slots(date, duration, start_hour, end_hour)
                .await
            {
                Ok(slots) if !slots.is_empty() => {
                    return BookingOutcome {
                        action: BookingAction::SuggestSlots,
                        proposed_slots: slots.into_iter().take(self.max_suggested_slots).collect(),
                        updated_state: current.clone(),
                    };
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(%error, "calendar vague-range query failed");
                    return reask(BookingAction::Unavailable, current);
                }
            }
        }

        reask(BookingAction::AskTime, current)
    }

    async fn confirm_booking(
        &self,
        current: &BookingState,
        service: Option<&str>,
        _language: Language,
    ) -> BookingOutcome {
        let Some(start) = current.proposed_time else {
            return BookingOutcome {
                action: BookingAction::Reset,
                proposed_slots: Vec::new(),
                updated_state: BookingState::default(),
            };
        };

        let service = service.or(current.service_key.as_deref());
        let duration = self.service_duration(service);
        let end = start + TimeDelta::minutes(i64::from(duration) + self.buffer_minutes);

        let service_name = service
            .and_then(|key| self.catalog.service(key))
            .map(|entry| entry.display_name)
            .or_else(|| service.map(str::to_string))
            .unwrap_or_else(|| "appointment".to_string());

        match self
            .calendar
            .create_event(
                start,
                end,
                &format!("{service_name} Appointment"),
                &format!("Service: {service_name}"),
            )
            .await
        {
            Ok(event_id) => BookingOutcome {
                action: BookingAction::Booked,
                proposed_slots: Vec::new(),
                updated_state: BookingState {
                    status: BookingStatus::Confirmed,
                    proposed_date: current.proposed_date,
                    proposed_time: Some(start),
                    service_key: service.map(str::to_string),
                    calendar_event_id: Some(event_id),
                    duration_minutes: Some(duration),
                },
            },
            Err(error) => {
                warn!(%error, "calendar event creation failed");
                // Stay in Confirming so a retry message can still book.
                reask(BookingAction::Unavailable, current)
            }
        }
    }

    fn service_duration(&self, service: Option<&str>) -> u32 {
        match service {
            Some(key) => self.catalog.duration_minutes(key),
            None => 60,
        }
    }
}

fn reask(action: BookingAction, current: &BookingState) -> BookingOutcome {
    BookingOutcome {
        action,
        proposed_slots: Vec::new(),
        updated_state: current.clone(),
    }
}

fn is_confirmation(normalized: &str) -> bool {
    CONFIRMATION_WORDS.iter().any(|w| normalized.contains(w))
}
