// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply composition and content validation.
//!
//! Replies are assembled from fixed blocks in a fixed order: greeting,
//! booking message, canonical service message, yes/no answer, detail,
//! equipment, session facts, location, CTA. Every assembled reply passes a
//! validation gate before it can leave the engine; any violation swaps the
//! reply for a safe services-list fallback and records a machine-readable
//! failure reason so the orchestrator can hand off instead of sending.

use std::sync::Arc;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use velora_core::{Intent, KnowledgeBase, Language, ServiceCatalog};

use crate::booking::{BookingAction, BookingOutcome};

/// The only sentences allowed to carry the sparkle CTA.
pub const CTA_SIGNATURES: &[&str] = &[
    "Which service are you interested in? ✨",
    "Would you like to book a time? ✨",
    "What day and time works for you? ✨",
    "Let us know how we can help ✨",
    "Que servicio te interesa? ✨",
    "Te gustaria agendar una cita? ✨",
    "Que dia y hora te funciona? ✨",
    "Dinos como podemos ayudarte ✨",
    "Which area are you interested in? ✨",
    "Que area te interesa? ✨",
];

const BANNED_WORDS: &[&str] = &["love", "hun", "babe", "sweetie", "honey"];

const FORBIDDEN_SYSTEM_PHRASES: &[&str] = &[
    "sorry",
    "not available",
    "system",
    "at this time",
    "unavailable",
    "error",
    "failed",
    "hubo un error",
    "lo siento",
    "sistema",
    "no disponible",
];

const DISALLOWED_EMOJI: &[&str] = &["💕", "🤍", "❤️", "💖", "🙏", "👍"];

static PRICING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:Pricing|Precio):\s*\$[0-9]+(?:–[0-9]+)?").unwrap());
static PRICING_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:Pricing|Precio):\s*\$").unwrap());

/// Everything the composer needs to know about one reply.
#[derive(Debug, Clone)]
pub struct ComposeRequest {
    pub intent: Intent,
    pub service: Option<String>,
    pub language: Language,
    pub greeting_applicable: bool,
    pub yesno_answer: Option<String>,
    pub include_location: bool,
    pub booking_only_cta: bool,
    pub explicit_price_intent: bool,
    pub include_equipment: bool,
    pub include_session_facts: bool,
    pub user_message_text: Option<String>,
    pub booking_outcome: Option<BookingOutcome>,
    /// Set when a selection step needs a category clarification instead of
    /// a service detail.
    pub clarification_category: Option<String>,
}

impl ComposeRequest {
    pub fn new(intent: Intent, language: Language) -> Self {
        Self {
            intent,
            service: None,
            language,
            greeting_applicable: false,
            yesno_answer: None,
            include_location: false,
            booking_only_cta: false,
            explicit_price_intent: false,
            include_equipment: false,
            include_session_facts: false,
            user_message_text: None,
            booking_outcome: None,
            clarification_category: None,
        }
    }
}

/// A composed reply. `failure` set means the text is the safe fallback and
/// the caller should hand off rather than send.
#[derive(Debug, Clone)]
pub struct ComposedReply {
    pub text: String,
    pub failure: Option<String>,
}

impl ComposedReply {
    fn ok(text: String) -> Self {
        Self { text, failure: None }
    }

    fn failed(language: Language, reason: impl Into<String>) -> Self {
        Self {
            text: fallback_services_list(language).to_string(),
            failure: Some(reason.into()),
        }
    }

    fn suppressed(reason: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            failure: Some(reason.into()),
        }
    }
}

pub struct ReplyComposer {
    kb: Arc<dyn KnowledgeBase>,
    catalog: Arc<dyn ServiceCatalog>,
}

impl ReplyComposer {
    pub fn new(kb: Arc<dyn KnowledgeBase>, catalog: Arc<dyn ServiceCatalog>) -> Self {
        Self { kb, catalog }
    }

    pub fn compose(&self, request: &ComposeRequest) -> ComposedReply {
        let language = request.language;
        let mut blocks: Vec<String> = Vec::new();

        if request.greeting_applicable {
            let greeting = greeting(language);
            if let Err(reason) = validate_greeting_block(greeting, language) {
                return ComposedReply::failed(language, format!("greeting_validation_failed_{reason}"));
            }
            blocks.push(greeting.to_string());
        }

        // Booking actions short-circuit: the booking message is the reply.
        if let Some(outcome) = &request.booking_outcome {
            let message = self.booking_message(outcome, language);
            if !message.is_empty() {
                blocks.push(message);
                let text = dedupe_paragraphs(&join_blocks(&blocks));
                if let Err(reason) = validate_reply(&text, false) {
                    return ComposedReply::failed(language, format!("booking_validation_failed_{reason}"));
                }
                return ComposedReply::ok(text);
            }
        }

        // A canonical service message replaces yes/no and detail wholesale.
        let canonical = self.canonical_message(request);
        let mut detail = String::new();

        if let Some(message) = &canonical {
            blocks.push(message.clone());
            detail = message.clone();
        } else {
            if let Some(answer) = &request.yesno_answer {
                let answer = strip_pricing_from_yesno(answer);
                if let Err(reason) = validate_yesno_block(&answer) {
                    return ComposedReply::failed(language, format!("yesno_validation_failed_{reason}"));
                }
                blocks.push(answer);
            }

            if !request.booking_only_cta {
                let Some(selected) = self.select_detail_block(request) else {
                    return ComposedReply::suppressed("missing_detail");
                };
                let selected = if matches!(request.intent, Intent::Availability | Intent::Booking) {
                    strip_cta_paragraphs(&selected)
                } else {
                    selected
                };
                if let Err(reason) = validate_detail_block(&selected) {
                    return ComposedReply::failed(language, format!("detail_validation_failed_{reason}"));
                }
                detail = selected.clone();
                blocks.push(selected);
            }
        }

        if request.include_equipment
            && let Some(template) = self.kb.template(Intent::Equipment, None, language)
        {
            blocks.push(template.text);
        }

        if request.include_session_facts
            && request.explicit_price_intent
            && let Some(service) = &request.service
            && let Some(fact) = self.kb.service_facts(service, language)
        {
            if let Err(reason) = validate_session_facts_block(&fact) {
                return ComposedReply::failed(
                    language,
                    format!("session_facts_validation_failed_{reason}"),
                );
            }
            blocks.push(fact);
        }

        if request.include_location {
            let Some(template) = self.kb.template(Intent::Location, None, language) else {
                return ComposedReply::suppressed("missing_location");
            };
            blocks.push(template.text);
        }

        let is_laser_family = self.is_laser_family(request);
        let is_services_list = request.intent == Intent::ServicesList;
        if let Some(cta) = self.select_cta_block(request, &detail, is_laser_family) {
            if let Err(reason) = validate_cta_block(&cta, is_laser_family, is_services_list) {
                return ComposedReply::failed(language, format!("cta_validation_failed_{reason}"));
            }
            blocks.push(cta);
        }

        let text = dedupe_paragraphs(&join_blocks(&blocks));

        if canonical.is_none() {
            let pricing_count = PRICING_RE.find_iter(&text).count();
            if pricing_count > 1 {
                return ComposedReply::failed(
                    language,
                    format!("pricing_duplication_{pricing_count}_occurrences"),
                );
            }
            if pricing_count > 0 && !request.explicit_price_intent {
                return ComposedReply::failed(language, "pricing_without_explicit_intent");
            }
        }

        if cta_count(&text) > 1 {
            return ComposedReply::failed(language, "cta_duplicate");
        }

        if canonical.is_none() && !detail.is_empty() && !text.contains(&detail) {
            return ComposedReply::failed(language, "missing_required_content");
        }

        if let Err(reason) = validate_reply(&text, canonical.is_some()) {
            return ComposedReply::failed(language, format!("validation_failed_{reason}"));
        }

        ComposedReply::ok(text)
    }

    fn canonical_message(&self, request: &ComposeRequest) -> Option<String> {
        let key = request
            .user_message_text
            .as_deref()
            .and_then(|text| self.kb.resolve_registry_key(text))
            .or_else(|| {
                request
                    .service
                    .as_deref()
                    .and_then(|service| self.kb.resolve_registry_key(service))
            })?;
        let lines = self.kb.canonical_message(&key, request.language)?;
        Some(lines.join("\n"))
    }

    /// Detail templates keyed by intent. Price and service-detail templates
    /// only surface on explicit price intent; otherwise the thread is
    /// steered toward booking.
    fn select_detail_block(&self, request: &ComposeRequest) -> Option<String> {
        let language = request.language;

        if let Some(category) = &request.clarification_category {
            return self
                .kb
                .category_clarification(category, language)
                .map(|t| t.text);
        }

        match request.intent {
            Intent::Pricing | Intent::ServiceDetails | Intent::Availability | Intent::Booking => {
                if request.service.is_some() {
                    if matches!(request.intent, Intent::Pricing | Intent::ServiceDetails)
                        && !request.explicit_price_intent
                    {
                        return self.kb.template(Intent::Booking, None, language).map(|t| t.text);
                    }
                    if matches!(request.intent, Intent::Availability | Intent::Booking) {
                        return self.kb.template(Intent::Booking, None, language).map(|t| t.text);
                    }
                    return self
                        .kb
                        .template(Intent::Pricing, request.service.as_deref(), language)
                        .or_else(|| {
                            self.kb.template(
                                Intent::ServiceDetails,
                                request.service.as_deref(),
                                language,
                            )
                        })
                        .map(|t| t.text);
                }
                if matches!(request.intent, Intent::Availability | Intent::Booking) {
                    return self.kb.template(Intent::Booking, None, language).map(|t| t.text);
                }
                self.kb.template(Intent::ServicesList, None, language).map(|t| t.text)
            }
            Intent::ServicesList => {
                self.kb.template(Intent::ServicesList, None, language).map(|t| t.text)
            }
            Intent::Location => self.kb.template(Intent::Location, None, language).map(|t| t.text),
            Intent::Hours => self.kb.template(Intent::Hours, None, language).map(|t| t.text),
            Intent::Equipment => self.kb.template(Intent::Equipment, None, language).map(|t| t.text),
            Intent::Eligibility => {
                self.kb.template(Intent::Eligibility, None, language).map(|t| t.text)
            }
            Intent::PromoPricing => {
                self.kb.template(Intent::PromoPricing, None, language).map(|t| t.text)
            }
            Intent::Closing => self.kb.template(Intent::Closing, None, language).map(|t| t.text),
            _ => None,
        }
    }

    /// Laser, brow, lash, facial, and massage services get the plain
    /// no-emoji CTA variant.
    fn is_laser_family(&self, request: &ComposeRequest) -> bool {
        let key_is_family = |key: &str| {
            let key = key.to_lowercase();
            ["laser", "brow", "lash", "facial", "microdermabrasion", "facelift"]
                .iter()
                .any(|family| key.contains(family))
        };

        if let Some(text) = &request.user_message_text
            && let Some(key) = self.kb.resolve_registry_key(text)
            && key_is_family(&key)
        {
            return true;
        }
        request.service.as_deref().is_some_and(key_is_family)
    }

    fn select_cta_block(
        &self,
        request: &ComposeRequest,
        detail: &str,
        is_laser_family: bool,
    ) -> Option<String> {
        let language = request.language;

        if is_laser_family {
            return Some(
                match language {
                    Language::Es => {
                        "Por favor avisanos si tienes alguna pregunta sobre el tratamiento \
                         o si te gustaria agendar una cita."
                    }
                    Language::En => {
                        "Please let us know if you have any questions regarding the treatment \
                         or if you would like to schedule an appointment."
                    }
                }
                .to_string(),
            );
        }

        if request.clarification_category.is_some() {
            return Some(
                match language {
                    Language::Es => "Que area te interesa? ✨",
                    Language::En => "Which area are you interested in? ✨",
                }
                .to_string(),
            );
        }

        if request.intent == Intent::Availability {
            let ask = ask_day_time(language);
            if detail.contains(ask) {
                return None;
            }
            return Some(ask.to_string());
        }

        if request.intent == Intent::Booking {
            let ask = ask_booking_preference(language);
            if detail.contains(ask) {
                return None;
            }
            return Some(ask.to_string());
        }

        if contains_cta_signature(detail) {
            return None;
        }

        match request.intent {
            Intent::ServicesList => Some(
                match language {
                    Language::Es => {
                        "Por favor avisanos si tienes alguna pregunta sobre nuestros tratamientos."
                    }
                    Language::En => {
                        "Please let us know if you have any questions regarding our treatments."
                    }
                }
                .to_string(),
            ),
            Intent::Hours | Intent::Location | Intent::Pricing | Intent::ServiceDetails => Some(
                match language {
                    Language::Es => "Dinos como podemos ayudarte ✨",
                    Language::En => "Let us know how we can help ✨",
                }
                .to_string(),
            ),
            _ => None,
        }
    }

    fn booking_message(&self, outcome: &BookingOutcome, language: Language) -> String {
        match outcome.action {
            BookingAction::AskService => match language {
                Language::Es => "Que servicio te interesa? ✨",
                Language::En => "Which service are you interested in? ✨",
            }
            .to_string(),
            BookingAction::AskDate => match language {
                Language::Es => "¿Qué fecha te funciona?",
                Language::En => "What date works for you?",
            }
            .to_string(),
            BookingAction::AskTime => match language {
                Language::Es => "¿Qué hora te funciona mejor?",
                Language::En => "What time works best for you?",
            }
            .to_string(),
            BookingAction::SuggestSlots => {
                if outcome.proposed_slots.is_empty() {
                    return match language {
                        Language::Es => "¿Qué día y hora te funciona?",
                        Language::En => "What day and time works for you?",
                    }
                    .to_string();
                }
                let slots = format_slots(&outcome.proposed_slots, language);
                match language {
                    Language::Es => {
                        format!("Tengo disponibilidad en: {slots}. ¿Cuál te funciona mejor?")
                    }
                    Language::En => {
                        format!("I have availability at: {slots}. Which works better for you?")
                    }
                }
            }
            BookingAction::Confirm => {
                let Some(slot) = outcome.proposed_slots.first() else {
                    return String::new();
                };
                let date_str = slot.format("%B %d").to_string();
                let time_str = slot.format("%I:%M %p").to_string();
                let service_name = outcome
                    .updated_state
                    .service_key
                    .as_deref()
                    .and_then(|key| self.catalog.service(key))
                    .map(|entry| entry.display_name)
                    .or_else(|| outcome.updated_state.service_key.clone())
                    .unwrap_or_else(|| "appointment".to_string());
                match language {
                    Language::Es => format!(
                        "¿Te gustaría que reserve {service_name} el {date_str} a las {time_str}?"
                    ),
                    Language::En => format!(
                        "Would you like me to book {service_name} on {date_str} at {time_str}?"
                    ),
                }
            }
            BookingAction::Booked => {
                let Some(time) = outcome.updated_state.proposed_time else {
                    return String::new();
                };
                let date_str = time.format("%B %d").to_string();
                let time_str = time.format("%I:%M %p").to_string();
                match language {
                    Language::Es => format!(
                        "¡Perfecto! He reservado tu cita para el {date_str} a las {time_str}. \
                         Te esperamos."
                    ),
                    Language::En => format!(
                        "Perfect! I've booked your appointment for {date_str} at {time_str}. \
                         We look forward to seeing you."
                    ),
                }
            }
            BookingAction::Unavailable | BookingAction::Reset => match language {
                Language::Es => "¿Qué día y hora te funciona?",
                Language::En => "What day and time works for you?",
            }
            .to_string(),
        }
    }
}

fn greeting(language: Language) -> &'static str {
    match language {
        Language::Es => "Hola, gracias por escribirnos!",
        Language::En => "Hello, thank you for reaching out!",
    }
}

fn ask_day_time(language: Language) -> &'static str {
    match language {
        Language::Es => "Que dia y hora te funciona? ✨",
        Language::En => "What day and time works for you? ✨",
    }
}

fn ask_booking_preference(language: Language) -> &'static str {
    match language {
        Language::Es => "Te gustaria agendar una cita? ✨",
        Language::En => "Would you like to book a time? ✨",
    }
}

pub fn fallback_services_list(language: Language) -> &'static str {
    match language {
        Language::Es => {
            "Ofrecemos:\n• Depilación Láser\n• Faciales y Tratamientos de Piel\n• Pestañas\n\
             • Cejas\n• Maquillaje Permanente\n• Servicios Combinados\n\n\
             Que servicio te interesa? ✨"
        }
        Language::En => {
            "We offer:\n• Laser Hair Removal\n• Facials & Skin Treatments\n• Lash Services\n\
             • Eyebrow Services\n• Permanent Makeup\n• Combo Services\n\n\
             Which service are you interested in? ✨"
        }
    }
}

fn format_slots(slots: &[NaiveDateTime], language: Language) -> String {
    let formatted: Vec<String> = slots.iter().map(|s| s.format("%I:%M %p").to_string()).collect();
    let conjunction = match language {
        Language::Es => "o",
        Language::En => "or",
    };
    match formatted.len() {
        0 => String::new(),
        1 => formatted[0].clone(),
        2 => format!("{} {conjunction} {}", formatted[0], formatted[1]),
        n => format!(
            "{} {conjunction} {}",
            formatted[..n - 1].join(", "),
            formatted[n - 1]
        ),
    }
}

fn join_blocks(blocks: &[String]) -> String {
    blocks
        .iter()
        .map(|b| b.trim())
        .filter(|b| !b.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn dedupe_paragraphs(text: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for paragraph in text.split("\n\n") {
        if !paragraph.trim().is_empty() && !seen.contains(&paragraph) {
            seen.push(paragraph);
        }
    }
    seen.join("\n\n")
}

fn cta_count(text: &str) -> usize {
    CTA_SIGNATURES.iter().filter(|sig| text.contains(*sig)).count()
}

fn contains_cta_signature(text: &str) -> bool {
    CTA_SIGNATURES.iter().any(|sig| text.contains(sig))
}

fn strip_cta_paragraphs(text: &str) -> String {
    text.split("\n\n")
        .filter(|p| !p.trim().is_empty() && !contains_cta_signature(p))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn strip_pricing_from_yesno(text: &str) -> String {
    let stripped = PRICING_RE.replace_all(text, "");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return collapsed;
    }
    if collapsed.ends_with('.') {
        collapsed
    } else {
        format!("{}.", collapsed.trim_end_matches(['.', ',']))
    }
}

fn validate_greeting_block(text: &str, language: Language) -> Result<(), String> {
    if text != greeting(language) {
        return Err("greeting_not_exact".to_string());
    }
    Ok(())
}

fn validate_yesno_block(text: &str) -> Result<(), String> {
    if !text.trim().ends_with('.') {
        return Err("yesno_invalid_format".to_string());
    }
    if PRICING_PREFIX_RE.is_match(text) {
        return Err("yesno_contains_pricing".to_string());
    }
    if ["🤍", "✨", "☀️", "💕", "💆", "📍"].iter().any(|e| text.contains(e)) {
        return Err("yesno_contains_emoji".to_string());
    }
    Ok(())
}

fn validate_detail_block(text: &str) -> Result<(), String> {
    if text.trim().is_empty() {
        return Err("detail_empty".to_string());
    }
    if contains_cta_signature(text) {
        return Err("detail_contains_cta".to_string());
    }
    Ok(())
}

fn validate_cta_block(text: &str, is_laser_family: bool, is_services_list: bool) -> Result<(), String> {
    if is_laser_family || is_services_list {
        if text.trim().is_empty() {
            return Err("cta_empty".to_string());
        }
        if PRICING_PREFIX_RE.is_match(text) {
            return Err("cta_contains_pricing".to_string());
        }
        return Ok(());
    }

    let signatures = cta_count(text);
    if signatures != 1 {
        return Err(format!("cta_count_{signatures}_not_one"));
    }
    let sparkles = text.matches('✨').count();
    if sparkles != 1 {
        return Err(format!("cta_emoji_count_{sparkles}_not_one"));
    }
    if PRICING_PREFIX_RE.is_match(text) {
        return Err("cta_contains_pricing".to_string());
    }
    Ok(())
}

fn validate_session_facts_block(text: &str) -> Result<(), String> {
    if PRICING_PREFIX_RE.is_match(text) || text.contains('$') {
        return Err("session_facts_contains_pricing".to_string());
    }
    let lowered = text.to_lowercase();
    for name in ["full body", "full legs", "laser", "brazilian", "bikini"] {
        if lowered.contains(name) {
            return Err("session_facts_contains_service_name".to_string());
        }
    }
    for word in ["guarantee", "promise", "always", "never"] {
        if lowered.contains(word) {
            return Err("session_facts_contains_guarantee".to_string());
        }
    }
    if ["🤍", "✨", "☀️", "💕", "💆", "📍"].iter().any(|e| text.contains(e)) {
        return Err("session_facts_contains_emoji".to_string());
    }
    Ok(())
}

fn validate_reply(text: &str, is_canonical: bool) -> Result<(), String> {
    if text.contains('—') {
        return Err("contains_em_dash".to_string());
    }

    let lowered = text.to_lowercase();
    for word in BANNED_WORDS {
        if lowered.contains(word) {
            return Err(format!("contains_banned_word_{word}"));
        }
    }

    if !is_canonical {
        let without_location = text.replace("📍", "");
        if DISALLOWED_EMOJI.iter().any(|e| without_location.contains(e)) {
            return Err("contains_disallowed_emoji".to_string());
        }
    }

    if cta_count(text) > 1 {
        return Err("cta_duplicate".to_string());
    }

    for phrase in FORBIDDEN_SYSTEM_PHRASES {
        if lowered.contains(phrase) {
            return Err(format!("contains_system_language_{phrase}"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use velora_knowledge::{ServiceCatalogStore, StructuredKnowledgeBase};

    use super::*;

    fn composer() -> ReplyComposer {
        ReplyComposer::new(Arc::new(StructuredKnowledgeBase), Arc::new(ServiceCatalogStore))
    }

    #[test]
    fn pricing_reply_has_exactly_one_pricing_block_and_cta() {
        let mut request = ComposeRequest::new(Intent::Pricing, Language::En);
        request.service = Some("full_body_diode_laser".to_string());
        request.explicit_price_intent = true;
        let reply = composer().compose(&request);
        assert!(reply.failure.is_none(), "failure: {:?}", reply.failure);
        assert!(reply.text.contains("Full Body Diode Laser"));
        assert!(reply.text.contains("Pricing: $150"));
        assert_eq!(PRICING_RE.find_iter(&reply.text).count(), 1);
        // Laser family gets the plain CTA variant.
        assert!(reply.text.contains("Please let us know if you have any questions"));
    }

    #[test]
    fn pricing_without_explicit_intent_steers_to_booking() {
        let mut request = ComposeRequest::new(Intent::Pricing, Language::En);
        request.service = Some("microdermabrasion".to_string());
        let reply = composer().compose(&request);
        assert!(reply.failure.is_none());
        assert!(!reply.text.contains('$'));
        assert!(reply.text.contains("preferred day and time"));
    }

    #[test]
    fn greeting_prepended_when_applicable() {
        let mut request = ComposeRequest::new(Intent::Hours, Language::En);
        request.greeting_applicable = true;
        let reply = composer().compose(&request);
        assert!(reply.failure.is_none());
        assert!(reply.text.starts_with("Hello, thank you for reaching out!"));
        assert!(reply.text.contains("10:00 AM to 7:00 PM"));
    }

    #[test]
    fn spanish_greeting_is_exact() {
        let mut request = ComposeRequest::new(Intent::Hours, Language::Es);
        request.greeting_applicable = true;
        let reply = composer().compose(&request);
        assert!(reply.failure.is_none());
        assert!(reply.text.starts_with("Hola, gracias por escribirnos!"));
    }

    #[test]
    fn yesno_block_loses_its_pricing() {
        let mut request = ComposeRequest::new(Intent::ServicesList, Language::En);
        request.yesno_answer = Some("Yes, we offer Underarms Pricing: $45".to_string());
        let reply = composer().compose(&request);
        assert!(reply.failure.is_none(), "failure: {:?}", reply.failure);
        assert!(reply.text.contains("Yes, we offer Underarms."));
        assert!(!reply.text.contains("$45"));
    }

    #[test]
    fn composition_is_idempotent() {
        let mut request = ComposeRequest::new(Intent::Pricing, Language::En);
        request.service = Some("underarms".to_string());
        request.explicit_price_intent = true;
        let first = composer().compose(&request);
        let second = composer().compose(&request);
        assert_eq!(first.text, second.text);
        assert!(first.failure.is_none());
    }

    #[test]
    fn canonical_message_short_circuits_detail() {
        let mut request = ComposeRequest::new(Intent::Pricing, Language::En);
        request.user_message_text = Some("how much is laser hair removal?".to_string());
        request.service = Some("laser_hair_removal".to_string());
        request.explicit_price_intent = true;
        let reply = composer().compose(&request);
        assert!(reply.failure.is_none(), "failure: {:?}", reply.failure);
        assert!(reply.text.contains("Laser Hair Removal"));
        // Canonical lines are carried verbatim, pricing included.
        assert!(reply.text.contains("Pricing: $150"));
    }

    #[test]
    fn missing_detail_suppresses_reply() {
        let request = ComposeRequest::new(Intent::Unknown, Language::En);
        let reply = composer().compose(&request);
        assert_eq!(reply.failure.as_deref(), Some("missing_detail"));
        assert!(reply.text.is_empty());
    }

    #[test]
    fn booking_outcome_short_circuits() {
        let mut request = ComposeRequest::new(Intent::Booking, Language::En);
        request.booking_outcome = Some(BookingOutcome {
            action: BookingAction::AskDate,
            proposed_slots: Vec::new(),
            updated_state: velora_core::BookingState::default(),
        });
        let reply = composer().compose(&request);
        assert!(reply.failure.is_none());
        assert_eq!(reply.text, "What date works for you?");
    }

    #[test]
    fn suggest_slots_lists_times() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let mut request = ComposeRequest::new(Intent::Booking, Language::En);
        request.booking_outcome = Some(BookingOutcome {
            action: BookingAction::SuggestSlots,
            proposed_slots: vec![
                date.and_hms_opt(10, 0, 0).unwrap(),
                date.and_hms_opt(10, 30, 0).unwrap(),
            ],
            updated_state: velora_core::BookingState::default(),
        });
        let reply = composer().compose(&request);
        assert!(reply.failure.is_none());
        assert!(reply.text.contains("10:00 AM or 10:30 AM"));
    }

    #[test]
    fn location_appended_on_request() {
        let mut request = ComposeRequest::new(Intent::Hours, Language::En);
        request.include_location = true;
        let reply = composer().compose(&request);
        assert!(reply.failure.is_none());
        assert!(reply.text.contains("📍 375 N First St"));
    }

    #[test]
    fn em_dash_fails_validation() {
        assert!(validate_reply("Pricing — by area.", false).is_err());
        assert!(validate_reply("Pricing by area.", false).is_ok());
    }

    #[test]
    fn banned_words_fail_validation() {
        assert!(validate_reply("Thanks love!", false).is_err());
        assert!(validate_reply("See you soon hun", false).is_err());
    }

    #[test]
    fn system_language_fails_validation() {
        assert!(validate_reply("Sorry, the system failed", false).is_err());
        assert!(validate_reply("That slot is not available at this time", false).is_err());
    }

    #[test]
    fn disallowed_emoji_fails_outside_canonical() {
        assert!(validate_reply("Thank you 🙏", false).is_err());
        assert!(validate_reply("We are at 📍 Main St", false).is_ok());
    }

    #[test]
    fn duration_answer_rides_the_yesno_slot() {
        let mut request = ComposeRequest::new(Intent::ServiceDetails, Language::En);
        request.service = Some("underarms".to_string());
        request.yesno_answer = Some("Underarms takes about 15 minutes.".to_string());
        let reply = composer().compose(&request);
        assert!(reply.failure.is_none(), "failure: {:?}", reply.failure);
        assert!(reply.text.contains("Underarms takes about 15 minutes."));
        // No pricing was asked for, none appears.
        assert!(!reply.text.contains('$'));
    }

    #[test]
    fn clarification_category_renders_area_list() {
        let mut request = ComposeRequest::new(Intent::Pricing, Language::En);
        request.clarification_category = Some("laser".to_string());
        request.explicit_price_intent = true;
        let reply = composer().compose(&request);
        assert!(reply.failure.is_none(), "failure: {:?}", reply.failure);
        assert!(reply.text.contains("depends on the area"));
        assert!(reply.text.contains("Which area are you interested in? ✨"));
    }
}
