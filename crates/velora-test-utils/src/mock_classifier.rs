// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-heuristic intent classifier for tests and the local REPL.
//!
//! Deterministic: a scripted response queue takes precedence, then a fixed
//! keyword table, then `Unknown`. A failure flag exercises degraded paths.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use velora_core::{Intent, IntentClassification, IntentClassifier, Language, VeloraError};

pub struct MockClassifier {
    scripted: Mutex<VecDeque<IntentClassification>>,
    fail_next: AtomicBool,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Queue a response returned before any keyword matching.
    pub async fn push_response(&self, classification: IntentClassification) {
        self.scripted.lock().await.push_back(classification);
    }

    /// Make the next `classify` call fail with an upstream error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn keyword_intent(text: &str) -> Intent {
        let lowered = text.to_lowercase();
        let contains = |keys: &[&str]| keys.iter().any(|k| lowered.contains(k));

        if contains(&["book", "appointment", "schedule", "reserve", "agendar", "cita"]) {
            Intent::Booking
        } else if contains(&["availability", "available", "disponibilidad", "spots", "openings"]) {
            Intent::Availability
        } else if contains(&["promo", "discount", "descuento", "special"]) {
            Intent::PromoPricing
        } else if contains(&["price", "cost", "how much", "cuanto", "precio", "$"]) {
            Intent::Pricing
        } else if contains(&["where", "location", "address", "donde", "ubicacion", "parking"]) {
            Intent::Location
        } else if contains(&["hours", "open today", "what time do you", "horario"]) {
            Intent::Hours
        } else if contains(&["machine", "equipment", "what laser do you", "que laser"]) {
            Intent::Equipment
        } else if contains(&["pregnant", "age", "eligible", "embarazada", "safe for"]) {
            Intent::Eligibility
        } else if contains(&["thank", "gracias", "perfect", "great"]) {
            Intent::Closing
        } else if contains(&["services", "what do you offer", "menu", "servicios", "treatments"]) {
            Intent::ServicesList
        } else if contains(&["laser", "facial", "brow", "lash", "wax", "session", "brazilian"]) {
            Intent::ServiceDetails
        } else {
            Intent::Unknown
        }
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentClassifier for MockClassifier {
    async fn classify(
        &self,
        text: &str,
        language_hint: Option<Language>,
    ) -> Result<IntentClassification, VeloraError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(VeloraError::ClassifierUpstream {
                message: "mock classifier failure".to_string(),
                source: None,
            });
        }
        if let Some(scripted) = self.scripted.lock().await.pop_front() {
            return Ok(scripted);
        }
        Ok(IntentClassification {
            intent: Self::keyword_intent(text),
            language: language_hint.unwrap_or(Language::En),
            normalized_text: text.trim().to_lowercase(),
            service: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keyword_table_maps_common_questions() {
        let classifier = MockClassifier::new();
        let cases = [
            ("Can I book an appointment?", Intent::Booking),
            ("How much is full body?", Intent::Pricing),
            ("Where are you located?", Intent::Location),
            ("What services do you offer?", Intent::ServicesList),
            ("Do you have any availability friday?", Intent::Availability),
            ("asdf qwerty", Intent::Unknown),
        ];
        for (text, intent) in cases {
            let result = classifier.classify(text, None).await.unwrap();
            assert_eq!(result.intent, intent, "text: {text}");
        }
    }

    #[tokio::test]
    async fn scripted_response_wins() {
        let classifier = MockClassifier::new();
        classifier
            .push_response(IntentClassification {
                intent: Intent::Hours,
                language: Language::Es,
                normalized_text: "x".into(),
                service: None,
            })
            .await;
        let result = classifier.classify("book now", None).await.unwrap();
        assert_eq!(result.intent, Intent::Hours);
        // Queue drained, falls back to keywords.
        let result = classifier.classify("book now", None).await.unwrap();
        assert_eq!(result.intent, Intent::Booking);
    }

    #[tokio::test]
    async fn fail_next_fails_once() {
        let classifier = MockClassifier::new();
        classifier.fail_next();
        assert!(classifier.classify("hi", None).await.is_err());
        assert!(classifier.classify("hi", None).await.is_ok());
    }
}
