// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword and pattern predicates over inbound message text.
//!
//! Everything here is pure and deterministic: lowercase, fold accents,
//! strip punctuation, then match against fixed keyword sets. These
//! predicates gate routing decisions in the orchestrator, so they err on
//! the side of precision (e.g. booking requires a schedule verb, not just
//! "session").

use std::sync::LazyLock;

use regex::Regex;

const YES_NO_PATTERNS: &[&str] = &[
    "is there",
    "do you",
    "are you",
    "can i",
    "do you accept",
    "do you offer",
];

const SERVICE_EXISTENCE_PATTERNS: &[&str] = &["do you offer", "do you do", "do you provide"];

const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "hola"];

/// Lowercase, fold Spanish accents to ASCII, drop punctuation, collapse
/// whitespace. All predicates in this module operate on this form.
pub fn normalize_text(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        match c {
            'á' => folded.push('a'),
            'é' => folded.push('e'),
            'í' => folded.push('i'),
            'ó' => folded.push('o'),
            'ú' | 'ü' => folded.push('u'),
            'ñ' => folded.push('n'),
            '+' => folded.push(' '),
            _ => folded.push(c),
        }
    }
    let mut out = String::with_capacity(folded.len());
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push(' ');
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_greeting(text: &str) -> String {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let mut idx = 0;
    while idx < parts.len() && GREETING_WORDS.contains(&parts[idx]) {
        idx += 1;
    }
    parts[idx..].join(" ")
}

/// True for questions that expect a yes/no answer, after stripping any
/// leading greeting words ("hi do you offer ..." still counts).
pub fn is_yes_no_question(text: &str) -> bool {
    let normalized = strip_greeting(&normalize_text(text));
    YES_NO_PATTERNS.iter().any(|p| normalized.starts_with(p))
}

pub fn is_service_existence_question(text: &str) -> bool {
    let normalized = normalize_text(text);
    SERVICE_EXISTENCE_PATTERNS.iter().any(|p| normalized.contains(p))
}

/// Tail of a service existence question ("do you offer lash extensions?"
/// yields "lash extensions").
pub fn extract_service_query(text: &str) -> Option<String> {
    let normalized = normalize_text(text);
    for pattern in SERVICE_EXISTENCE_PATTERNS {
        if let Some(pos) = normalized.find(pattern) {
            let tail = normalized[pos + pattern.len()..].trim();
            if !tail.is_empty() {
                return Some(tail.to_string());
            }
            return None;
        }
    }
    None
}

pub fn is_brazilian_query(text: &str) -> bool {
    normalize_text(text).contains("brazilian")
}

pub fn contains_location_request(text: &str) -> bool {
    let normalized = normalize_text(text);
    ["location", "address", "where", "located"]
        .iter()
        .any(|t| normalized.contains(t))
}

/// Explicit request to book or schedule. Requires a schedule verb or an
/// appointment phrase; date or service mentions alone do not qualify.
pub fn is_booking_request(text: &str) -> bool {
    let normalized = normalize_text(text);
    let booking_verbs = [
        "book",
        "schedule",
        "appointment",
        "reserve",
        "reservar",
        "agendar",
        "cita",
    ];
    let booking_patterns = [
        "i would like to book",
        "i want to book",
        "i would like to schedule",
        "i want to schedule",
        "ready to book",
        "i want to make an appointment",
        "i would like to make an appointment",
        "can i schedule",
        "can i book",
        "would like to schedule",
        "want to schedule",
        "make an appointment",
        "set up an appointment",
    ];
    booking_verbs.iter().any(|v| normalized.contains(v))
        || booking_patterns.iter().any(|p| normalized.contains(p))
}

/// Pricing blocks are only composed when this returns true.
pub fn has_explicit_price_intent(text: &str) -> bool {
    if text.contains('$') {
        return true;
    }
    let normalized = normalize_text(text);
    [
        "price", "pricing", "cost", "how much", "how many", "cuanto", "precio", "costo",
        "dollar", "dollars",
    ]
    .iter()
    .any(|k| normalized.contains(k))
}

pub fn has_equipment_intent(text: &str) -> bool {
    let normalized = normalize_text(text);
    [
        "machine",
        "equipment",
        "laser machine",
        "what laser",
        "which laser",
        "maquina",
        "equipo",
    ]
    .iter()
    .any(|k| normalized.contains(k))
}

pub fn asks_about_sessions(text: &str) -> bool {
    let normalized = normalize_text(text);
    [
        "how many times",
        "how many sessions",
        "how often",
        "how long does it take",
        "how many do i need",
        "how many visits",
        "cuantas veces",
        "cuantas sesiones",
        "cuanto tiempo",
    ]
    .iter()
    .any(|k| normalized.contains(k))
}

pub fn asks_about_duration(text: &str) -> bool {
    let normalized = normalize_text(text);
    [
        "how long does",
        "how long is",
        "what is the duration",
        "how much time",
        "how long should i expect",
        "how long is the appointment",
        "cuanto tiempo toma",
        "cuanto dura",
        "duracion",
    ]
    .iter()
    .any(|k| normalized.contains(k))
}

/// Questions about results or expectations that must not pull the thread
/// into the booking flow even when the classifier says availability.
pub fn is_informational_question(text: &str) -> bool {
    let normalized = normalize_text(text);
    [
        "will i see",
        "will i get",
        "will i have",
        "what will",
        "what should i expect",
        "what to expect",
        "when will i see",
        "when will i get",
        "how long until",
        "how long before",
        "when do i see",
        "when do i get",
        "results after",
        "results from",
        "outcome",
        "effectiveness",
        "how effective",
        "what happens",
        "que esperar",
        "cuando vere",
        "cuando tendre",
        "resultados",
    ]
    .iter()
    .any(|p| normalized.contains(p))
}

pub fn asks_about_results(text: &str) -> bool {
    let normalized = normalize_text(text);
    [
        "see results",
        "get results",
        "have results",
        "results after",
        "results from",
        "results with",
        "when will i see",
        "when do i see",
        "when will i get",
        "when do i get",
        "after first session",
        "after one session",
        "after 1 session",
        "how many sessions until",
        "sessions until",
        "does it work after",
        "work after one",
        "work after 1",
        "effective after",
        "resultados",
        "cuando vere resultados",
        "cuando tendre resultados",
        "despues de la primera sesion",
    ]
    .iter()
    .any(|p| normalized.contains(p))
}

static TIME_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}\s*(am|pm|:\d{2})").unwrap());

/// Whether the message carries date or time information, i.e. could be a
/// reply to a booking question.
pub fn contains_date_or_time(text: &str) -> bool {
    let normalized = normalize_text(text);

    let date_keywords = [
        "today",
        "tomorrow",
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
        "next week",
        "next month",
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
        "hoy",
        "manana",
        "lunes",
        "martes",
        "miercoles",
        "jueves",
        "viernes",
        "sabado",
        "domingo",
    ];
    // "am"/"pm" only count next to a digit (see TIME_DIGITS_RE);
    // the bare words are too common in ordinary prose.
    let time_keywords = [
        "morning",
        "afternoon",
        "evening",
        "night",
        "manana",
        "tarde",
        "noche",
    ];

    let words: Vec<&str> = normalized.split_whitespace().collect();
    let has_date = date_keywords
        .iter()
        .any(|k| k.contains(' ') && normalized.contains(k) || words.contains(k));
    // Match clock digits against the raw text: normalization strips the
    // colon out of "10:30".
    let has_time = time_keywords.iter().any(|k| words.contains(k))
        || TIME_DIGITS_RE.is_match(&text.to_lowercase());

    has_date || has_time
}

/// Bare acknowledgement messages that should not re-trigger a greeting.
pub fn is_follow_up_ack(text: &str) -> bool {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    matches!(
        normalized.as_str(),
        "thanks" | "thank you" | "ok" | "okay" | "yes" | "yep" | "👍" | "🙏"
    )
}
