// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service selection sub-flow.
//!
//! When a user names a category ("laser", "lashes") rather than a concrete
//! service, the thread parks in `AwaitingServiceChoice` until a specific
//! service resolves. A direct registry hit always wins and completes the
//! selection.

use velora_core::{KnowledgeBase, SelectionState, SelectionStatus};

/// One step of the selection flow.
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    pub updated_state: SelectionState,
    pub service_key: Option<String>,
    pub category: Option<String>,
    pub needs_clarification: bool,
}

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("laser", &["laser", "hair removal", "depilacion"]),
    ("brows", &["brow", "eyebrow", "ceja", "cejas"]),
    ("lashes", &["lash", "eyelash", "pestana", "pestanas"]),
    (
        "facial",
        &["facial", "skin", "piel", "exfoliate", "exfoliation", "deep clean", "blackhead"],
    ),
    ("pmu", &["permanent makeup", "pmu", "tattoo", "tatuaje", "microblading"]),
];

pub struct SelectionFlow<'a> {
    kb: &'a dyn KnowledgeBase,
}

impl<'a> SelectionFlow<'a> {
    pub fn new(kb: &'a dyn KnowledgeBase) -> Self {
        Self { kb }
    }

    pub fn process(&self, message_text: &str, current: &SelectionState) -> SelectionOutcome {
        // Already selected: pass through.
        if current.status == SelectionStatus::ServiceSelected
            && let Some(key) = &current.selected_service_key
        {
            return SelectionOutcome {
                updated_state: current.clone(),
                service_key: Some(key.clone()),
                category: None,
                needs_clarification: false,
            };
        }

        if let Some(key) = self.kb.resolve_registry_key(message_text) {
            return SelectionOutcome {
                updated_state: SelectionState {
                    status: SelectionStatus::ServiceSelected,
                    pending_category: None,
                    selected_service_key: Some(key.clone()),
                    last_service_mention: Some(message_text.to_string()),
                },
                service_key: Some(key),
                category: None,
                needs_clarification: false,
            };
        }

        if let Some(category) = detect_category(message_text) {
            let ambiguous = self.kb.ambiguous_category(message_text).is_some();
            return SelectionOutcome {
                updated_state: SelectionState {
                    status: SelectionStatus::AwaitingServiceChoice,
                    pending_category: Some(category.to_string()),
                    selected_service_key: None,
                    last_service_mention: Some(message_text.to_string()),
                },
                service_key: None,
                category: Some(category.to_string()),
                needs_clarification: ambiguous,
            };
        }

        SelectionOutcome {
            updated_state: current.clone(),
            service_key: None,
            category: None,
            needs_clarification: false,
        }
    }
}

fn detect_category(text: &str) -> Option<&'static str> {
    let normalized = crate::rules::normalize_text(text);
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use velora_knowledge::StructuredKnowledgeBase;

    use super::*;

    fn flow_kb() -> StructuredKnowledgeBase {
        StructuredKnowledgeBase
    }

    #[test]
    fn direct_service_mention_selects() {
        let kb = flow_kb();
        let outcome = SelectionFlow::new(&kb).process("lash extensions please", &SelectionState::default());
        assert_eq!(outcome.service_key.as_deref(), Some("lash_extensions_all_shapes"));
        assert_eq!(outcome.updated_state.status, SelectionStatus::ServiceSelected);
        assert!(!outcome.needs_clarification);
    }

    #[test]
    fn bare_laser_asks_for_area() {
        let kb = flow_kb();
        let outcome = SelectionFlow::new(&kb).process("laser", &SelectionState::default());
        assert_eq!(outcome.category.as_deref(), Some("laser"));
        assert_eq!(outcome.updated_state.status, SelectionStatus::AwaitingServiceChoice);
        assert!(outcome.needs_clarification);
    }

    #[test]
    fn named_laser_service_resolves_instead_of_clarifying() {
        let kb = flow_kb();
        let outcome =
            SelectionFlow::new(&kb).process("how much is laser hair removal?", &SelectionState::default());
        assert_eq!(outcome.service_key.as_deref(), Some("laser_hair_removal"));
        assert_eq!(outcome.updated_state.status, SelectionStatus::ServiceSelected);
    }

    #[test]
    fn selected_state_passes_through() {
        let kb = flow_kb();
        let current = SelectionState {
            status: SelectionStatus::ServiceSelected,
            pending_category: None,
            selected_service_key: Some("underarms".to_string()),
            last_service_mention: None,
        };
        let outcome = SelectionFlow::new(&kb).process("anything", &current);
        assert_eq!(outcome.service_key.as_deref(), Some("underarms"));
        assert_eq!(outcome.updated_state, current);
    }

    #[test]
    fn unrelated_text_leaves_state_unchanged() {
        let kb = flow_kb();
        let outcome = SelectionFlow::new(&kb).process("where are you located?", &SelectionState::default());
        assert!(outcome.service_key.is_none());
        assert!(outcome.category.is_none());
        assert_eq!(outcome.updated_state, SelectionState::default());
    }
}
