// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge base port: service resolution and response templates.

use crate::types::{Intent, Language, ResponseTemplate};

/// Structured business knowledge. Pure lookups over in-memory data, so the
/// trait stays synchronous.
pub trait KnowledgeBase: Send + Sync {
    /// Canned reply for an intent, optionally specialized to a service.
    /// Falls back to English when no localized template exists.
    fn template(
        &self,
        intent: Intent,
        service: Option<&str>,
        language: Language,
    ) -> Option<ResponseTemplate>;

    /// Resolves free text to a canonical service key, if the text names one
    /// specifically enough.
    fn resolve_service_from_text(&self, text: &str) -> Option<String>;

    /// Resolves a loose service name (classifier output, alias, fuzzy
    /// match) to a canonical registry key.
    fn resolve_registry_key(&self, name: &str) -> Option<String>;

    /// Human-facing display name for a canonical key.
    fn display_name(&self, key: &str) -> Option<String>;

    /// If the text names a whole category (e.g. "laser") without enough
    /// detail to pick a service, returns that category.
    fn ambiguous_category(&self, text: &str) -> Option<String>;

    /// Clarification prompt sent when a category question is ambiguous.
    fn category_clarification(&self, category: &str, language: Language)
        -> Option<ResponseTemplate>;

    /// Free-form fact attached to a service (session guidance, aftercare).
    /// Falls back to English when no localized fact exists.
    fn service_facts(&self, key: &str, language: Language) -> Option<String>;

    /// Pre-approved canonical message lines for a service.
    fn canonical_message(&self, key: &str, language: Language) -> Option<Vec<String>>;
}
