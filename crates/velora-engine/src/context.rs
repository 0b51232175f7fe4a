// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message context resolution.
//!
//! Pure function over the inbound text, recent history, and stored state.
//! Centralizes language detection, service resolution, and question-type
//! flags so the orchestrator routes on one consistent view.

use velora_core::{ConversationState, HistoryEntry, HistoryRole, KnowledgeBase, Language};

use crate::rules;

/// Resolved view of a single inbound message.
#[derive(Debug, Clone)]
pub struct ResolvedContext {
    pub language: Language,
    pub service_key: Option<String>,
    /// Whether the service came from the message text itself (as opposed
    /// to carried-over state).
    pub service_from_text: bool,
    pub is_booking_request: bool,
    pub is_duration_question: bool,
    pub is_price_question: bool,
    pub is_sessions_question: bool,
    pub is_equipment_question: bool,
    pub is_service_question: bool,
    pub is_follow_up: bool,
}

const SPANISH_INDICATORS: &[&str] = &[
    "hola",
    "gracias",
    "precio",
    "cuanto",
    "disponibilidad",
    "servicio",
];

const FOLLOW_UP_PATTERNS: &[&str] = &[
    "how much",
    "how long",
    "how many",
    "what about",
    "what is",
    "what s",
    "tell me",
    "cuanto",
    "cuanto tiempo",
    "cuantas",
    "que es",
];

const REFERENCE_WORDS: &[&str] = &["it", "that", "this", "eso", "esto", "lo", "la"];

/// Resolve language, service, and question flags for one inbound message.
pub fn resolve_context(
    user_text: &str,
    recent_history: &[HistoryEntry],
    state: &ConversationState,
    kb: &dyn KnowledgeBase,
) -> ResolvedContext {
    let language = state.language.unwrap_or_else(|| detect_language(user_text));

    let service_from_text = kb.resolve_registry_key(user_text);
    let from_text = service_from_text.is_some();
    let service_key = service_from_text.or_else(|| {
        state
            .last_service
            .clone()
            .or_else(|| state.booking.service_key.clone())
            .or_else(|| state.selection.selected_service_key.clone())
    });

    ResolvedContext {
        language,
        is_booking_request: rules::is_booking_request(user_text),
        is_duration_question: rules::asks_about_duration(user_text),
        is_price_question: rules::has_explicit_price_intent(user_text),
        is_sessions_question: rules::asks_about_sessions(user_text),
        is_equipment_question: rules::has_equipment_intent(user_text),
        is_service_question: from_text || service_key.is_some(),
        is_follow_up: detect_follow_up(user_text, recent_history, state),
        service_key,
        service_from_text: from_text,
    }
}

fn detect_language(text: &str) -> Language {
    let normalized = rules::normalize_text(text);
    if SPANISH_INDICATORS.iter().any(|w| normalized.contains(w)) {
        Language::Es
    } else {
        Language::En
    }
}

fn detect_follow_up(
    user_text: &str,
    recent_history: &[HistoryEntry],
    state: &ConversationState,
) -> bool {
    let normalized = rules::normalize_text(user_text);

    if FOLLOW_UP_PATTERNS.iter().any(|p| normalized.contains(p)) {
        return true;
    }

    // A reference word after an assistant turn reads as a follow-up.
    let last_assistant = recent_history
        .iter()
        .rev()
        .find(|entry| entry.role == HistoryRole::Assistant);
    if last_assistant.is_some() {
        let words: Vec<&str> = normalized.split_whitespace().collect();
        if REFERENCE_WORDS.iter().any(|w| words.contains(w)) {
            return true;
        }
    }

    // Short messages into an ongoing conversation are follow-ups.
    if (state.last_intent.is_some() || state.last_service.is_some() || state.booking.is_active())
        && normalized.split_whitespace().count() <= 5
    {
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use velora_core::Intent;
    use velora_knowledge::StructuredKnowledgeBase;

    use super::*;

    fn kb() -> StructuredKnowledgeBase {
        StructuredKnowledgeBase
    }

    #[test]
    fn language_defaults_to_english() {
        let ctx = resolve_context("what services do you have?", &[], &ConversationState::default(), &kb());
        assert_eq!(ctx.language, Language::En);
    }

    #[test]
    fn spanish_indicators_switch_language() {
        let ctx = resolve_context("hola, precios?", &[], &ConversationState::default(), &kb());
        assert_eq!(ctx.language, Language::Es);
    }

    #[test]
    fn stored_language_wins_over_detection() {
        let state = ConversationState::default().with_language(Language::Es);
        let ctx = resolve_context("what services do you have?", &[], &state, &kb());
        assert_eq!(ctx.language, Language::Es);
    }

    #[test]
    fn service_resolves_from_text_first() {
        let state = ConversationState::default().with_service_if_unset(Some("underarms"));
        let ctx = resolve_context("how much is full body diode laser?", &[], &state, &kb());
        assert_eq!(ctx.service_key.as_deref(), Some("full_body_diode_laser"));
        assert!(ctx.service_from_text);
    }

    #[test]
    fn service_falls_back_to_state() {
        let state = ConversationState::default().with_service_if_unset(Some("underarms"));
        let ctx = resolve_context("how much is it?", &[], &state, &kb());
        assert_eq!(ctx.service_key.as_deref(), Some("underarms"));
        assert!(!ctx.service_from_text);
    }

    #[test]
    fn short_message_with_ongoing_state_is_follow_up() {
        let state = ConversationState::default().with_last_intent(Intent::Pricing);
        let ctx = resolve_context("and underarms?", &[], &state, &kb());
        assert!(ctx.is_follow_up);
    }

    #[test]
    fn reference_word_after_assistant_turn_is_follow_up() {
        let history = vec![
            HistoryEntry::new(HistoryRole::User, "how much is a facial?", 1.0),
            HistoryEntry::new(HistoryRole::Assistant, "Facial pricing ...", 2.0),
        ];
        let ctx = resolve_context(
            "and does that include extraction treatment as well today",
            &history,
            &ConversationState::default(),
            &kb(),
        );
        assert!(ctx.is_follow_up);
    }

    #[test]
    fn fresh_question_is_not_follow_up() {
        let ctx = resolve_context(
            "do you have openings for brow lamination next month please",
            &[],
            &ConversationState::default(),
            &kb(),
        );
        assert!(!ctx.is_follow_up);
    }

    #[test]
    fn question_flags() {
        let ctx = resolve_context(
            "how much is laser and what machine do you use?",
            &[],
            &ConversationState::default(),
            &kb(),
        );
        assert!(ctx.is_price_question);
        assert!(ctx.is_equipment_question);
        assert!(!ctx.is_booking_request);
    }
}
