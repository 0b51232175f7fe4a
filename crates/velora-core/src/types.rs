// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common value types shared across the Velora workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation thread (derived from the sender).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for an inbound message, assigned by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An inbound message as delivered by the platform webhook.
///
/// Created once per webhook event and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub thread_id: ThreadId,
    pub sender_id: String,
    pub text: String,
    /// Epoch seconds as reported by the platform.
    pub timestamp: i64,
    /// Platform tag, e.g. "instagram".
    pub platform: String,
}

/// Supported reply languages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
}

/// Closed set of intents the engine knows how to answer.
///
/// The classifier emits free-form labels; anything outside this set parses
/// to [`Intent::Unknown`], which the handoff logic treats as out of scope.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ServicesList,
    Pricing,
    PromoPricing,
    ServiceDetails,
    Location,
    Hours,
    Availability,
    Booking,
    Equipment,
    Eligibility,
    Closing,
    OutOfScope,
    Unknown,
}

impl Intent {
    /// Parse a classifier label, mapping anything unrecognized to `Unknown`.
    pub fn from_label(label: &str) -> Intent {
        label.parse().unwrap_or(Intent::Unknown)
    }
}

/// Output of the external intent classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentClassification {
    pub intent: Intent,
    pub language: Language,
    pub normalized_text: String,
    pub service: Option<String>,
}

impl IntentClassification {
    /// Return a copy with a different intent.
    pub fn with_intent(&self, intent: Intent) -> Self {
        Self {
            intent,
            ..self.clone()
        }
    }

    /// Return a copy with a different resolved service.
    pub fn with_service(&self, service: Option<String>) -> Self {
        Self {
            service,
            ..self.clone()
        }
    }

    /// Return a copy with a different language.
    pub fn with_language(&self, language: Language) -> Self {
        Self {
            language,
            ..self.clone()
        }
    }
}

/// Author of a history entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Assistant,
    /// Records handoff/failure reasons for observability; never sent to users.
    System,
}

/// One entry in a thread's append-only, capped history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: HistoryRole,
    pub text: String,
    /// Epoch seconds.
    pub ts: f64,
    #[serde(default)]
    pub meta: serde_json::Value,
}

impl HistoryEntry {
    pub fn new(role: HistoryRole, text: impl Into<String>, ts: f64) -> Self {
        Self {
            role,
            text: text.into(),
            ts,
            meta: serde_json::Value::Null,
        }
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = meta;
        self
    }
}

/// Result of the intake debounce check for one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceDecision {
    /// Whether the caller should process this message.
    pub proceed: bool,
    /// When not proceeding, the id of the previously recorded message this
    /// one coalesced into.
    pub coalesced_with: Option<MessageId>,
}

impl DebounceDecision {
    pub fn proceed() -> Self {
        Self {
            proceed: true,
            coalesced_with: None,
        }
    }

    pub fn coalesced(with: MessageId) -> Self {
        Self {
            proceed: false,
            coalesced_with: Some(with),
        }
    }
}

/// A response template from the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTemplate {
    pub text: String,
}

impl ResponseTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A service catalog entry: display name plus price and duration ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub key: String,
    pub display_name: String,
    pub category: String,
    pub price_min: Option<u32>,
    pub price_max: Option<u32>,
    pub duration_minutes_min: u32,
    pub duration_minutes_max: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn intent_label_round_trip() {
        for intent in [
            Intent::ServicesList,
            Intent::Pricing,
            Intent::PromoPricing,
            Intent::ServiceDetails,
            Intent::Location,
            Intent::Hours,
            Intent::Availability,
            Intent::Booking,
            Intent::Equipment,
            Intent::Eligibility,
            Intent::Closing,
            Intent::OutOfScope,
        ] {
            let label = intent.to_string();
            assert_eq!(Intent::from_label(&label), intent);
        }
    }

    #[test]
    fn unknown_labels_map_to_unknown() {
        assert_eq!(Intent::from_label("weather_forecast"), Intent::Unknown);
        assert_eq!(Intent::from_label(""), Intent::Unknown);
    }

    #[test]
    fn language_parses_lowercase() {
        assert_eq!(Language::from_str("en").unwrap(), Language::En);
        assert_eq!(Language::from_str("es").unwrap(), Language::Es);
        assert_eq!(Language::Es.to_string(), "es");
    }

    #[test]
    fn classification_with_updates_are_copies() {
        let base = IntentClassification {
            intent: Intent::Pricing,
            language: Language::En,
            normalized_text: "how much is it".into(),
            service: None,
        };
        let updated = base
            .with_intent(Intent::ServicesList)
            .with_service(Some("full_body_diode_laser".into()));
        assert_eq!(base.intent, Intent::Pricing);
        assert_eq!(updated.intent, Intent::ServicesList);
        assert_eq!(updated.normalized_text, base.normalized_text);
        assert!(base.service.is_none());
    }

    #[test]
    fn debounce_decision_constructors() {
        assert!(DebounceDecision::proceed().proceed);
        let d = DebounceDecision::coalesced(MessageId("m1".into()));
        assert!(!d.proceed);
        assert_eq!(d.coalesced_with, Some(MessageId("m1".into())));
    }
}
