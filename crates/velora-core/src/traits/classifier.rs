// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification port.

use async_trait::async_trait;

use crate::error::VeloraError;
use crate::types::{IntentClassification, Language};

/// Maps free-form user text to a closed intent label.
///
/// The classifier is advisory: the engine layers deterministic rule
/// overrides on top of its output, and an unrecognized label degrades to
/// [`crate::types::Intent::Unknown`] rather than failing the turn.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(
        &self,
        text: &str,
        language_hint: Option<Language>,
    ) -> Result<IntentClassification, VeloraError>;
}
