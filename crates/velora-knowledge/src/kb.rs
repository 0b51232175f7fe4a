// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured knowledge base over the static service registry.
//!
//! Resolution order follows specificity: semantic buckets, then exact
//! alias substring (longest aliases first), then token-subset, then fuzzy
//! matching with a similarity floor. The goal is that vague wording like
//! "clean my pores" still lands on the right canonical key.

use velora_core::{Intent, KnowledgeBase, Language, ResponseTemplate};

use crate::registry::{service_def, ServiceDef, SEMANTIC_BUCKETS, SERVICES};
use crate::templates::{default_template, LASER_CLARIFICATION_EN, LASER_CLARIFICATION_ES};

/// Single words too generic to resolve a service when they are the entire
/// message ("laser", "facial", ...).
const GENERIC_WORDS: &[&str] = &[
    "laser", "brow", "brows", "lash", "lashes", "facial", "pmu", "exfoliate",
];

/// Area words that make a laser question specific enough to skip the
/// clarification prompt.
const SPECIFIC_AREA_INDICATORS: &[&str] = &[
    "full body",
    "face",
    "arm",
    "leg",
    "brazilian",
    "bikini",
    "jawline",
    "upper lip",
    "forehead",
    "cheek",
    "chin",
    "neck",
    "nose",
    "sideburn",
    "men",
    "man",
    "women",
    "woman",
    "lower leg",
    "lower arm",
    "chest",
    "abdomen",
    "back",
    "underarm",
    "upper body",
    "lower body",
];

/// Wordings that name the laser category without an area.
const AMBIGUOUS_LASER_PATTERNS: &[&str] =
    &["laser", "depilacion laser", "laser hair removal"];

#[derive(Debug, Default)]
pub struct StructuredKnowledgeBase;

impl StructuredKnowledgeBase {
    pub fn new() -> Self {
        Self
    }
}

impl KnowledgeBase for StructuredKnowledgeBase {
    fn template(
        &self,
        intent: Intent,
        service: Option<&str>,
        language: Language,
    ) -> Option<ResponseTemplate> {
        if matches!(
            intent,
            Intent::Pricing | Intent::ServiceDetails | Intent::PromoPricing
        ) && let Some(key) = service
            && let Some(def) = service_def(key)
        {
            return Some(ResponseTemplate::new(render_service_template(def, language)));
        }
        default_template(intent, language).map(ResponseTemplate::new)
    }

    fn resolve_service_from_text(&self, text: &str) -> Option<String> {
        self.resolve_registry_key(text)
    }

    fn resolve_registry_key(&self, name: &str) -> Option<String> {
        let normalized = normalize_text(name);
        if normalized.is_empty() {
            return None;
        }

        // Direct canonical key, e.g. classifier output already resolved.
        let as_key = normalized.replace(' ', "_");
        if service_def(&as_key).is_some() {
            return Some(as_key);
        }

        // Semantic buckets first: they capture meaning, not names. The
        // blackhead facial wins "exfoliate" unless microderm is explicit.
        for (key, phrases) in SEMANTIC_BUCKETS {
            for phrase in *phrases {
                if normalized.contains(phrase) {
                    if *key == "microdermabrasion"
                        && normalized.contains("exfoliate")
                        && !normalized.contains("microderm")
                    {
                        continue;
                    }
                    return Some((*key).to_string());
                }
            }
        }

        let candidates = alias_candidates();
        let word_count = normalized.split_whitespace().count();

        // Exact substring matches, longest aliases first.
        for (key, alias) in &candidates {
            if contains_phrase(&normalized, alias) {
                let alias_words = alias.split_whitespace().count();
                if alias_words == 1 && word_count == 1 && GENERIC_WORDS.contains(&alias.as_str()) {
                    continue;
                }
                return Some((*key).to_string());
            }
        }

        let too_generic = |alias: &str| {
            alias.split_whitespace().count() == 1
                && word_count == 1
                && GENERIC_WORDS.contains(&alias)
        };

        // Token-subset: all alias words present somewhere in the text.
        let text_words: Vec<&str> = normalized.split_whitespace().collect();
        for (key, alias) in &candidates {
            if too_generic(alias) {
                continue;
            }
            let alias_words: Vec<&str> = alias.split_whitespace().collect();
            if !alias_words.is_empty()
                && alias_words.iter().all(|w| text_words.contains(w))
            {
                return Some((*key).to_string());
            }
        }

        // Fuzzy matches over sliding word windows.
        for (key, alias) in &candidates {
            if too_generic(alias) {
                continue;
            }
            if fuzzy_match(alias, &normalized, 0.85) {
                return Some((*key).to_string());
            }
        }

        None
    }

    fn display_name(&self, key: &str) -> Option<String> {
        service_def(key).map(|def| def.display_name.to_string())
    }

    fn ambiguous_category(&self, text: &str) -> Option<String> {
        let normalized = normalize_text(text);
        for pattern in AMBIGUOUS_LASER_PATTERNS {
            if contains_phrase(&normalized, pattern) {
                let specific = SPECIFIC_AREA_INDICATORS
                    .iter()
                    .any(|indicator| normalized.contains(indicator));
                if !specific {
                    return Some("laser".to_string());
                }
            }
        }
        None
    }

    fn category_clarification(
        &self,
        category: &str,
        language: Language,
    ) -> Option<ResponseTemplate> {
        if category != "laser" {
            return None;
        }
        let text = match language {
            Language::En => LASER_CLARIFICATION_EN,
            Language::Es => LASER_CLARIFICATION_ES,
        };
        Some(ResponseTemplate::new(text))
    }

    fn service_facts(&self, key: &str, language: Language) -> Option<String> {
        let (en, es) = service_def(key)?.facts?;
        let fact = match language {
            Language::En => en,
            Language::Es => es,
        };
        Some(fact.to_string())
    }

    fn canonical_message(&self, key: &str, language: Language) -> Option<Vec<String>> {
        let def = service_def(key)?;
        let lines = match language {
            Language::Es if !def.canonical_es.is_empty() => def.canonical_es,
            _ => def.canonical_en,
        };
        if lines.is_empty() {
            return None;
        }
        Some(lines.iter().map(|line| (*line).to_string()).collect())
    }
}

/// Render a pricing/details template for a service from registry data.
fn render_service_template(def: &ServiceDef, language: Language) -> String {
    let lines = match language {
        Language::Es if !def.canonical_es.is_empty() => def.canonical_es,
        _ if !def.canonical_en.is_empty() => def.canonical_en,
        _ => &[][..],
    };
    if !lines.is_empty() {
        return lines.join("\n");
    }

    let label = match language {
        Language::En => "Pricing",
        Language::Es => "Precio",
    };
    match (def.price_min, def.price_max) {
        (Some(min), Some(max)) => format!("{}\n{label}: ${min}–{max}", def.display_name),
        (Some(min), None) => format!("{}\n{label}: ${min}", def.display_name),
        (None, _) => def.display_name.to_string(),
    }
}

/// All (key, normalized alias) pairs, sorted most-specific first: multi-word
/// phrases before single words, longer before shorter, then key order for
/// determinism.
fn alias_candidates() -> Vec<(&'static str, String)> {
    let mut candidates: Vec<(&'static str, String)> = SERVICES
        .iter()
        .flat_map(|def| {
            def.aliases
                .iter()
                .map(|alias| (def.key, normalize_text(alias)))
        })
        .collect();
    candidates.sort_by(|a, b| {
        let a_words = a.1.split_whitespace().count();
        let b_words = b.1.split_whitespace().count();
        let a_phrase = a_words > 1;
        let b_phrase = b_words > 1;
        b_phrase
            .cmp(&a_phrase)
            .then(b_words.cmp(&a_words))
            .then(a.0.cmp(b.0))
    });
    candidates
}

/// Lowercase, fold Spanish accents, strip punctuation, collapse whitespace.
pub(crate) fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_space = true;
    for ch in text.to_lowercase().chars() {
        let mapped = match ch {
            'á' => Some('a'),
            'é' => Some('e'),
            'í' => Some('i'),
            'ó' => Some('o'),
            'ú' | 'ü' => Some('u'),
            'ñ' => Some('n'),
            c if c.is_ascii_alphanumeric() => Some(c),
            _ => None,
        };
        match mapped {
            Some(c) => {
                out.push(c);
                last_space = false;
            }
            None => {
                if !last_space {
                    out.push(' ');
                    last_space = true;
                }
            }
        }
    }
    out.trim().to_string()
}

/// Whole-phrase containment on word boundaries.
fn contains_phrase(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let text_words: Vec<&str> = text.split_whitespace().collect();
    let phrase_words: Vec<&str> = phrase.split_whitespace().collect();
    if phrase_words.len() > text_words.len() {
        return false;
    }
    text_words
        .windows(phrase_words.len())
        .any(|window| window == phrase_words.as_slice())
}

/// Sliding-window fuzzy comparison of an alias against the text.
fn fuzzy_match(alias: &str, text: &str, threshold: f64) -> bool {
    let alias_words: Vec<&str> = alias.split_whitespace().collect();
    let text_words: Vec<&str> = text.split_whitespace().collect();
    if alias_words.is_empty() || text_words.is_empty() {
        return false;
    }

    let window = alias_words.len();
    if text_words.len() < window {
        return strsim::normalized_levenshtein(alias, text) >= threshold;
    }

    text_words.windows(window).any(|chunk| {
        let chunk = chunk.join(" ");
        strsim::normalized_levenshtein(alias, &chunk) >= threshold
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb() -> StructuredKnowledgeBase {
        StructuredKnowledgeBase::new()
    }

    #[test]
    fn resolves_exact_phrases() {
        assert_eq!(
            kb().resolve_registry_key("how much is full body diode laser?"),
            Some("full_body_diode_laser".to_string())
        );
        assert_eq!(
            kb().resolve_registry_key("brazilian bikini please"),
            Some("brazilian_bikini".to_string())
        );
    }

    #[test]
    fn longer_aliases_win_over_shorter() {
        // "full body diode laser" must beat the bare "full body" alias.
        assert_eq!(
            kb().resolve_registry_key("full body diode laser"),
            Some("full_body_diode_laser".to_string())
        );
        // "lower legs" must beat "legs".
        assert_eq!(
            kb().resolve_registry_key("price for lower legs"),
            Some("lower_legs".to_string())
        );
    }

    #[test]
    fn canonical_keys_pass_through() {
        assert_eq!(
            kb().resolve_registry_key("full_body_diode_laser"),
            Some("full_body_diode_laser".to_string())
        );
    }

    #[test]
    fn semantic_buckets_catch_descriptions() {
        assert_eq!(
            kb().resolve_registry_key("I want to clean my clogged pores"),
            Some("facial_deep_blackhead_removal".to_string())
        );
        assert_eq!(
            kb().resolve_registry_key("do you treat razor bumps"),
            Some("full_face_laser".to_string())
        );
    }

    #[test]
    fn exfoliate_prefers_facial_unless_microderm_named() {
        assert_eq!(
            kb().resolve_registry_key("I need exfoliation"),
            Some("facial_deep_blackhead_removal".to_string())
        );
        assert_eq!(
            kb().resolve_registry_key("microderm exfoliation"),
            Some("microdermabrasion".to_string())
        );
    }

    #[test]
    fn bare_generic_word_does_not_resolve_via_alias() {
        // A lone "facial" is generic, but still matches the semantic path
        // or nothing at all depending on wording; bare "lash" resolves to
        // nothing specific.
        assert_eq!(kb().resolve_registry_key("brows"), None);
    }

    #[test]
    fn fuzzy_match_tolerates_typos() {
        assert_eq!(
            kb().resolve_registry_key("microdermabrasion pls"),
            Some("microdermabrasion".to_string())
        );
        assert_eq!(
            kb().resolve_registry_key("eyebrow laminaton"),
            Some("eyebrow_lamination".to_string())
        );
    }

    #[test]
    fn ambiguous_laser_without_area() {
        assert_eq!(
            kb().ambiguous_category("how much is laser?"),
            Some("laser".to_string())
        );
        assert_eq!(
            kb().ambiguous_category("cuanto cuesta la depilacion laser"),
            Some("laser".to_string())
        );
    }

    #[test]
    fn specific_area_is_not_ambiguous() {
        assert_eq!(kb().ambiguous_category("laser for full body"), None);
        assert_eq!(kb().ambiguous_category("chin laser price"), None);
        assert_eq!(kb().ambiguous_category("book a facial"), None);
    }

    #[test]
    fn clarification_template_lists_areas() {
        let template = kb()
            .category_clarification("laser", Language::En)
            .expect("laser clarification exists");
        assert!(template.text.contains("Full Body"));
        assert!(template.text.contains("Brazilian"));
        assert!(kb().category_clarification("brows", Language::En).is_none());
    }

    #[test]
    fn pricing_template_is_generated_from_registry() {
        let template = kb()
            .template(Intent::Pricing, Some("full_body_diode_laser"), Language::En)
            .expect("pricing template");
        assert!(template.text.contains("Full Body Diode Laser"));
        assert!(template.text.contains("Pricing: $150"));

        let es = kb()
            .template(Intent::Pricing, Some("chin"), Language::Es)
            .expect("es pricing template");
        assert!(es.text.contains("Precio: $30"));
    }

    #[test]
    fn pricing_without_service_has_no_template() {
        assert!(kb().template(Intent::Pricing, None, Language::En).is_none());
    }

    #[test]
    fn default_templates_fall_through() {
        let template = kb()
            .template(Intent::Hours, None, Language::Es)
            .expect("hours template");
        assert!(template.text.contains("Horario"));
    }

    #[test]
    fn facts_fall_back_to_english() {
        let fact = kb()
            .service_facts("full_body_diode_laser", Language::En)
            .expect("sessions fact");
        assert!(fact.contains("6 sessions"));
        assert!(kb().service_facts("chin", Language::En).is_none());
    }

    #[test]
    fn canonical_message_lines_for_promos() {
        let lines = kb()
            .canonical_message("lash_lamination_tinting", Language::En)
            .expect("lash promo lines");
        assert_eq!(lines[0], "LASH LAMINATION PROMO");
        assert!(kb().canonical_message("chin", Language::En).is_none());
    }

    #[test]
    fn normalization_folds_accents_and_punctuation() {
        assert_eq!(normalize_text("¿Depilación Láser?"), "depilacion laser");
        assert_eq!(normalize_text("Facial + Deep  Blackhead!!"), "facial deep blackhead");
        assert_eq!(
            kb().ambiguous_category("¿cuánto cuesta la depilación láser?"),
            Some("laser".to_string())
        );
    }

    #[test]
    fn display_names_resolve() {
        assert_eq!(
            kb().display_name("brazilian_bikini").as_deref(),
            Some("Brazilian (Bikini)")
        );
        assert_eq!(kb().display_name("nope"), None);
    }
}
