// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message orchestration pipeline.
//!
//! One inbound message produces at most one reply. The pipeline order is
//! fixed: idempotency and debounce gates, active booking routing,
//! cancellation, selection routing, classification with rule overrides,
//! booking entry, outside-business handoff, once-per-day greeting,
//! composition, send, persist. Collaborator failures are caught here and
//! degrade the turn (skip, hand off, or re-ask); they never propagate out.

use std::sync::Arc;

use chrono::Offset;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use velora_config::VeloraConfig;
use velora_core::{
    BookingStatus, Calendar, ConversationStore, Intent, IntentClassification, IntentClassifier,
    KnowledgeBase, Language, Message, MessagePlatform, SelectionStatus, ServiceCatalog,
    VeloraError,
};
use velora_core::{HistoryEntry, HistoryRole};

use crate::booking::BookingFlow;
use crate::composer::{ComposeRequest, ComposedReply, ReplyComposer};
use crate::context::{resolve_context, ResolvedContext};
use crate::rules;
use crate::selection::SelectionFlow;

const CANCEL_KEYWORDS: &[&str] = &[
    "cancel",
    "stop",
    "never mind",
    "no thanks",
    "cancelar",
    "no gracias",
];

/// Outcome of handling one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// A reply was composed (and sent, when auto-reply is on).
    Replied(String),
    /// The message was a duplicate or coalesced into a newer one.
    Skipped,
    /// The turn was handed off to a human with a reason.
    Handoff(String),
}

pub struct MessageHandler {
    store: Arc<dyn ConversationStore>,
    kb: Arc<dyn KnowledgeBase>,
    catalog: Arc<dyn ServiceCatalog>,
    classifier: Arc<dyn IntentClassifier>,
    platform: Arc<dyn MessagePlatform>,
    booking: BookingFlow,
    composer: ReplyComposer,
    cooldown_seconds: f64,
    history_limit: u32,
    auto_reply: bool,
    timezone: chrono::FixedOffset,
    /// Per-thread turn serialization. Entries are created lazily and never
    /// removed; a single-process deployment constraint.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl MessageHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn ConversationStore>,
        kb: Arc<dyn KnowledgeBase>,
        catalog: Arc<dyn ServiceCatalog>,
        classifier: Arc<dyn IntentClassifier>,
        calendar: Arc<dyn Calendar>,
        platform: Arc<dyn MessagePlatform>,
        config: &VeloraConfig,
    ) -> Self {
        let booking = BookingFlow::new(
            Arc::clone(&calendar),
            Arc::clone(&catalog),
            config.engine.booking_buffer_minutes,
            config.business.open_hour,
            config.business.close_hour,
            config.engine.max_suggested_slots,
        );
        let composer = ReplyComposer::new(Arc::clone(&kb), Arc::clone(&catalog));
        let offset_seconds = config.business.timezone_offset_hours * 3600;
        let timezone = chrono::FixedOffset::east_opt(offset_seconds)
            .unwrap_or_else(|| chrono::Utc.fix());
        Self {
            store,
            kb,
            catalog,
            classifier,
            platform,
            booking,
            composer,
            cooldown_seconds: config.engine.cooldown_seconds,
            history_limit: config.engine.history_limit,
            auto_reply: config.engine.auto_reply,
            timezone,
            locks: DashMap::new(),
        }
    }

    /// Handle one inbound message end to end.
    ///
    /// Never fails the caller: every collaborator error is logged and
    /// degraded here. Turns for the same thread are serialized.
    pub async fn handle(&self, message: &Message) -> HandleOutcome {
        let lock = self
            .locks
            .entry(message.thread_id.0.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        match self.process(message).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    thread_id = %message.thread_id,
                    message_id = %message.id,
                    error = %err,
                    "failed to handle inbound message"
                );
                HandleOutcome::Skipped
            }
        }
    }

    async fn process(&self, message: &Message) -> Result<HandleOutcome, VeloraError> {
        let thread = &message.thread_id;
        let now = message.timestamp as f64;

        // Idempotency gate: a redelivered message never gets a second reply.
        if self.store.has_processed(thread, &message.id).await? {
            info!(thread_id = %thread, message_id = %message.id, "duplicate message ignored");
            return Ok(HandleOutcome::Skipped);
        }

        // Debounce gate. The arrival is recorded unconditionally so a burst
        // settles on its latest message.
        let decision = self
            .store
            .should_process(thread, &message.id, self.cooldown_seconds, now)
            .await?;
        self.store.mark_received(thread, &message.id, now).await?;
        if !decision.proceed {
            info!(
                thread_id = %thread,
                message_id = %message.id,
                coalesced_with = ?decision.coalesced_with,
                "message coalesced"
            );
            return Ok(HandleOutcome::Skipped);
        }
        self.store.mark_processed(thread, &message.id).await?;

        let meta = serde_json::json!({
            "message_id": message.id.0,
            "sender_id": message.sender_id,
            "platform": message.platform,
        });
        self.store
            .append_history(
                thread,
                &HistoryEntry::new(HistoryRole::User, &message.text, now).with_meta(meta),
            )
            .await?;

        let state = self.store.state(thread).await?;
        let recent = self.store.recent_history(thread, self.history_limit).await?;
        let context = resolve_context(&message.text, &recent, &state, self.kb.as_ref());

        let mut state = state.with_last_seen(now).with_language(context.language);
        self.store.set_state(thread, &state).await?;

        // Active booking flow captures the whole turn (unless cancelled).
        if state.booking.status != BookingStatus::None {
            let normalized = message.text.to_lowercase();
            if CANCEL_KEYWORDS.iter().any(|k| normalized.contains(k)) {
                state = state.with_booking_reset();
                self.store.set_state(thread, &state).await?;
                debug!(thread_id = %thread, "booking flow cancelled");
                // Fall through to the normal flow for the reply.
            } else {
                return self.continue_booking(message, state, &context, now).await;
            }
        }

        // Selection flow: thread is waiting for the user to pick a service.
        let mut selection_service: Option<String> = None;
        if state.selection.status == SelectionStatus::AwaitingServiceChoice {
            let outcome = SelectionFlow::new(self.kb.as_ref()).process(&message.text, &state.selection);
            state = state
                .with_selection(outcome.updated_state.clone())
                .with_service_if_unset(outcome.service_key.as_deref());
            self.store.set_state(thread, &state).await?;
            if outcome.needs_clarification
                && let Some(category) = outcome.category
            {
                return self
                    .send_clarification(message, state, &context, category, now)
                    .await;
            }
            selection_service = outcome.service_key;
        }

        // Classification, with deterministic rule overrides layered on top.
        let classification = match self
            .classifier
            .classify(&message.text, state.language)
            .await
        {
            Ok(classification) => classification,
            Err(err) => {
                warn!(thread_id = %thread, error = %err, "classifier failed, handing off");
                return self.handoff(message, "classifier_failure").await;
            }
        };
        if let Err(err) = check_classifier_contract(&classification, &message.text) {
            warn!(thread_id = %thread, error = %err, "classifier contract violated, handing off");
            return self.handoff(message, "classifier_failure").await;
        }

        let resolved_service = context
            .service_key
            .clone()
            .or(selection_service)
            .or_else(|| self.kb.resolve_registry_key(&message.text));
        let mut classification =
            apply_overrides(classification, &context, resolved_service.as_deref(), &state);

        // Ambiguous category with no concrete service parks the thread in
        // the selection flow and asks for the area.
        if resolved_service.is_none()
            && !context.is_booking_request
            && let Some(category) = self.kb.ambiguous_category(&message.text)
        {
            let outcome = SelectionFlow::new(self.kb.as_ref()).process(&message.text, &state.selection);
            state = state.with_selection(outcome.updated_state);
            self.store.set_state(thread, &state).await?;
            return self
                .send_clarification(message, state, &context, category, now)
                .await;
        }

        // Booking entry decision. A message carrying a date or time while
        // the thread was already talking booking or availability reads as
        // an answer to "when?", even without a schedule verb.
        let is_informational = rules::is_informational_question(&message.text);
        let is_results = rules::asks_about_results(&message.text);
        let date_follow_up = matches!(
            state.last_intent,
            Some(Intent::Booking | Intent::Availability)
        ) && rules::contains_date_or_time(&message.text);
        let booking_signal = context.is_booking_request
            || date_follow_up
            || (matches!(classification.intent, Intent::Booking | Intent::Availability)
                && !is_informational
                && !is_results);
        if booking_signal {
            return self.continue_booking(message, state, &context, now).await;
        }

        // Duration fast path: answer straight from the catalog.
        if context.is_duration_question
            && let Some(service) = resolved_service.as_deref()
        {
            let answer = self.duration_answer(service, context.language, context.is_price_question);
            let mut request = ComposeRequest::new(Intent::ServiceDetails, context.language);
            request.service = Some(service.to_string());
            request.yesno_answer = Some(answer);
            request.explicit_price_intent = context.is_price_question;
            request.greeting_applicable = self.greeting_applicable(message, &context, now).await;
            let state = state
                .with_last_intent(classification.intent)
                .with_service_if_unset(Some(service));
            return self.finish(message, state, request).await;
        }

        // Price questions without explicit price intent are steered away
        // from pricing templates.
        if matches!(classification.intent, Intent::Pricing | Intent::ServiceDetails)
            && !context.is_price_question
        {
            let lowered = message.text.to_lowercase();
            let wants_availability = ["availability", "spots", "available"]
                .iter()
                .any(|w| lowered.contains(w));
            if wants_availability {
                classification.intent = Intent::Availability;
            } else {
                classification.intent = Intent::ServicesList;
                classification.service = None;
            }
        }

        // Outside-business gate: unknown intent, out of scope, or no
        // template to answer with means a human takes over.
        let template = self.kb.template(
            classification.intent,
            classification.service.as_deref(),
            context.language,
        );
        if let Some(reason) = outside_business_reason(classification.intent, template.is_some()) {
            return self.handoff(message, reason).await;
        }

        let yes_no = rules::is_yes_no_question(&message.text);
        let brazilian = rules::is_brazilian_query(&message.text);
        let include_location = rules::contains_location_request(&message.text)
            && classification.intent != Intent::Location;

        let mut request = ComposeRequest::new(classification.intent, context.language);
        request.service = classification.service.clone();
        request.greeting_applicable = self.greeting_applicable(message, &context, now).await;
        request.yesno_answer = self.yesno_answer(&classification, &context, yes_no, brazilian, &message.text);
        request.include_location = include_location;
        request.explicit_price_intent = context.is_price_question;
        request.include_equipment = context.is_equipment_question;
        request.include_session_facts = context.is_sessions_question;
        request.user_message_text = Some(message.text.clone());

        let state = state
            .with_last_intent(classification.intent)
            .with_service_if_unset(
                classification
                    .service
                    .as_deref()
                    .or(context.service_key.as_deref()),
            );
        self.finish(message, state, request).await
    }

    async fn continue_booking(
        &self,
        message: &Message,
        state: velora_core::ConversationState,
        context: &ResolvedContext,
        now: f64,
    ) -> Result<HandleOutcome, VeloraError> {
        let reference_date = reference_date(now, self.timezone);
        let outcome = self
            .booking
            .process(
                &message.text,
                &state.booking,
                context.service_key.as_deref(),
                context.language,
                &state,
                reference_date,
            )
            .await;

        let state = state
            .with_booking(outcome.updated_state.clone())
            .with_service_if_unset(context.service_key.as_deref())
            .with_last_intent(Intent::Booking);

        let mut request = ComposeRequest::new(Intent::Booking, context.language);
        request.service = context.service_key.clone();
        request.booking_only_cta = true;
        request.explicit_price_intent = context.is_price_question;
        request.booking_outcome = Some(outcome);
        if !context.is_follow_up {
            request.greeting_applicable = self.greeting_applicable(message, context, now).await;
        }

        self.finish(message, state, request).await
    }

    async fn send_clarification(
        &self,
        message: &Message,
        state: velora_core::ConversationState,
        context: &ResolvedContext,
        category: String,
        now: f64,
    ) -> Result<HandleOutcome, VeloraError> {
        let mut request = ComposeRequest::new(Intent::ServiceDetails, context.language);
        request.clarification_category = Some(category);
        request.explicit_price_intent = context.is_price_question;
        request.greeting_applicable = self.greeting_applicable(message, context, now).await;
        let state = state.with_last_intent(Intent::ServiceDetails);
        self.finish(message, state, request).await
    }

    /// Compose, send, and persist the final state. One exit point for every
    /// replying path.
    async fn finish(
        &self,
        message: &Message,
        state: velora_core::ConversationState,
        request: ComposeRequest,
    ) -> Result<HandleOutcome, VeloraError> {
        let thread = &message.thread_id;
        let now = message.timestamp as f64;

        let ComposedReply { text, failure } = self.composer.compose(&request);
        if let Some(reason) = failure {
            warn!(
                thread_id = %thread,
                message_id = %message.id,
                reason = %reason,
                "reply validation failed, handing off"
            );
            self.store.set_state(thread, &state).await?;
            return self.handoff(message, &reason).await;
        }
        if text.trim().is_empty() {
            warn!(thread_id = %thread, message_id = %message.id, "empty reply text, skipping send");
            self.store.set_state(thread, &state).await?;
            return Ok(HandleOutcome::Skipped);
        }

        if self.auto_reply {
            match self.platform.send_text(&message.sender_id, &text).await {
                Ok(()) => {
                    self.store
                        .append_history(
                            thread,
                            &HistoryEntry::new(HistoryRole::Assistant, &text, now),
                        )
                        .await?;
                    self.store.mark_outbound(thread, now).await?;
                    info!(thread_id = %thread, message_id = %message.id, "reply sent");
                }
                Err(err) => {
                    warn!(thread_id = %thread, error = %err, "platform send failed");
                    self.store
                        .append_history(
                            thread,
                            &HistoryEntry::new(HistoryRole::System, "FAILED_SEND", now),
                        )
                        .await?;
                }
            }
        } else {
            info!(
                thread_id = %thread,
                message_id = %message.id,
                "auto-reply disabled, reply suppressed"
            );
        }

        self.store.set_state(thread, &state).await?;
        Ok(HandleOutcome::Replied(text))
    }

    async fn handoff(&self, message: &Message, reason: &str) -> Result<HandleOutcome, VeloraError> {
        let now = message.timestamp as f64;
        self.store
            .append_history(
                &message.thread_id,
                &HistoryEntry::new(HistoryRole::System, format!("HANDOFF: {reason}"), now),
            )
            .await?;
        info!(
            thread_id = %message.thread_id,
            message_id = %message.id,
            reason = %reason,
            "reply suppressed, handing off"
        );
        Ok(HandleOutcome::Handoff(reason.to_string()))
    }

    /// Greeting is applied at most once per local day per thread, and never
    /// to a bare acknowledgement.
    async fn greeting_applicable(
        &self,
        message: &Message,
        _context: &ResolvedContext,
        now: f64,
    ) -> bool {
        if rules::is_follow_up_ack(&message.text) {
            return false;
        }
        match self.store.should_greet_today(&message.thread_id, now).await {
            Ok(true) => {
                if let Err(err) = self.store.mark_greeted(&message.thread_id, now).await {
                    warn!(thread_id = %message.thread_id, error = %err, "failed to mark greeted");
                }
                true
            }
            Ok(false) => false,
            Err(err) => {
                warn!(thread_id = %message.thread_id, error = %err, "greeting check failed");
                false
            }
        }
    }

    fn duration_answer(&self, service: &str, language: Language, include_price: bool) -> String {
        let Some(entry) = self.catalog.service(service) else {
            return match language {
                Language::Es => "No tengo informacion sobre la duracion de este servicio.",
                Language::En => "I don't have information about the duration of this service.",
            }
            .to_string();
        };

        let duration = match entry.duration_minutes_max {
            Some(max) if max != entry.duration_minutes_min => {
                format!("{}–{} minutes", entry.duration_minutes_min, max)
            }
            _ => format!("{} minutes", entry.duration_minutes_min),
        };

        if include_price && let Some(min) = entry.price_min {
            let price = match entry.price_max {
                Some(max) if max != min => format!("${min}–${max}"),
                _ => format!("${min}"),
            };
            return match language {
                Language::Es => format!(
                    "{} toma aproximadamente {duration}. El precio es {price}.",
                    entry.display_name
                ),
                Language::En => format!(
                    "{} takes about {duration}. The price is {price}.",
                    entry.display_name
                ),
            };
        }

        match language {
            Language::Es => format!("{} toma aproximadamente {duration}.", entry.display_name),
            Language::En => format!("{} takes about {duration}.", entry.display_name),
        }
    }

    fn yesno_answer(
        &self,
        classification: &IntentClassification,
        context: &ResolvedContext,
        yes_no_question: bool,
        brazilian: bool,
        message_text: &str,
    ) -> Option<String> {
        if !yes_no_question {
            return None;
        }

        // For "do you offer X" questions, resolve from the question tail so
        // the filler words cannot hit a service alias.
        let service_query = if rules::is_service_existence_question(message_text) {
            rules::extract_service_query(message_text)
        } else {
            Some(message_text.to_string())
        };
        if let Some(query) = service_query
            && let Some(key) = self.kb.resolve_service_from_text(&query)
            && let Some(display) = self.kb.display_name(&key)
        {
            return Some(match context.language {
                Language::Es => format!("Si, ofrecemos {display}."),
                Language::En => format!("Yes, we offer {display}."),
            });
        }

        let display = classification
            .service
            .as_deref()
            .and_then(|key| self.kb.display_name(key));

        if matches!(
            classification.intent,
            Intent::Availability | Intent::Booking | Intent::Pricing
        ) && display.is_some()
        {
            if brazilian {
                return Some(
                    match context.language {
                        Language::Es => {
                            "Si, ofrecemos Brazilian. Por favor confirma si es Brazilian \
                             solamente o full body."
                        }
                        Language::En => {
                            "Yes, we offer Brazilian. Please confirm if Brazilian only or \
                             full body."
                        }
                    }
                    .to_string(),
                );
            }
            let display = display.unwrap_or_default();
            return Some(match context.language {
                Language::Es => format!("Si, tenemos disponibilidad para {display}."),
                Language::En => format!("Yes, we have availability for {display}."),
            });
        }

        if matches!(classification.intent, Intent::Availability | Intent::Booking) {
            return Some(
                match context.language {
                    Language::Es => "Si.",
                    Language::En => "Yes.",
                }
                .to_string(),
            );
        }

        if classification.intent == Intent::Location {
            return Some(
                match context.language {
                    Language::Es => "Si, estamos en Burbank.",
                    Language::En => "Yes, we are in Burbank.",
                }
                .to_string(),
            );
        }

        if classification.intent == Intent::Hours {
            return Some(
                match context.language {
                    Language::Es => "Si, estamos abiertos de lunes a domingo 10:00 AM a 7:00 PM.",
                    Language::En => "Yes, we are open Monday to Sunday 10:00 AM to 7:00 PM.",
                }
                .to_string(),
            );
        }

        None
    }
}

/// The classifier must echo a non-empty normalization of any non-empty
/// input; an empty echo means the upstream response was malformed.
fn check_classifier_contract(
    classification: &IntentClassification,
    input: &str,
) -> Result<(), VeloraError> {
    if !input.trim().is_empty() && classification.normalized_text.trim().is_empty() {
        return Err(VeloraError::ClassifierContract(
            "empty normalized_text for non-empty input".to_string(),
        ));
    }
    Ok(())
}

fn apply_overrides(
    mut classification: IntentClassification,
    context: &ResolvedContext,
    resolved_service: Option<&str>,
    state: &velora_core::ConversationState,
) -> IntentClassification {
    if let Some(service) = resolved_service {
        classification = classification.with_service(Some(service.to_string()));
        // A concrete service turns a generic list question into details,
        // and beats an unrecognized classifier label.
        if matches!(classification.intent, Intent::ServicesList | Intent::Unknown) {
            classification = classification.with_intent(Intent::ServiceDetails);
        }
    } else if matches!(
        classification.intent,
        Intent::Pricing | Intent::Availability | Intent::Booking
    ) && state.last_service.is_some()
        && !context.is_booking_request
    {
        classification = classification.with_service(state.last_service.clone());
    } else if classification.intent == Intent::Pricing {
        classification = classification
            .with_intent(Intent::ServicesList)
            .with_service(None);
    }
    classification.with_language(context.language)
}

/// Reasons a turn must go to a human instead of the engine replying.
fn outside_business_reason(intent: Intent, has_template: bool) -> Option<&'static str> {
    if intent == Intent::Unknown {
        return Some("unknown_intent");
    }
    if intent == Intent::OutOfScope {
        return Some("out_of_scope");
    }
    if !has_template {
        return Some("missing_kb");
    }
    None
}

fn reference_date(now: f64, timezone: chrono::FixedOffset) -> chrono::NaiveDate {
    chrono::DateTime::from_timestamp(now as i64, 0)
        .map(|utc| utc.with_timezone(&timezone).date_naive())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_contract_rejects_empty_echo() {
        let good = IntentClassification {
            intent: Intent::Pricing,
            language: Language::En,
            normalized_text: "how much is it".into(),
            service: None,
        };
        assert!(check_classifier_contract(&good, "How much is it?").is_ok());

        let bad = IntentClassification {
            normalized_text: String::new(),
            ..good
        };
        assert!(check_classifier_contract(&bad, "How much is it?").is_err());
        // An empty inbound message has nothing to normalize.
        assert!(check_classifier_contract(&bad, "  ").is_ok());
    }

    #[test]
    fn outside_business_gate() {
        assert_eq!(outside_business_reason(Intent::Unknown, true), Some("unknown_intent"));
        assert_eq!(outside_business_reason(Intent::OutOfScope, true), Some("out_of_scope"));
        assert_eq!(outside_business_reason(Intent::Hours, false), Some("missing_kb"));
        assert_eq!(outside_business_reason(Intent::Hours, true), None);
    }

    #[test]
    fn reference_date_uses_business_offset() {
        // 2026-03-05 04:00 UTC is still 2026-03-04 in UTC-8.
        let offset = chrono::FixedOffset::west_opt(8 * 3600).unwrap();
        let ts = chrono::NaiveDate::from_ymd_opt(2026, 3, 5)
            .unwrap()
            .and_hms_opt(4, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp() as f64;
        assert_eq!(
            reference_date(ts, offset),
            chrono::NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
        );
    }
}
