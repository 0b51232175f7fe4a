// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Velora conversation engine.

use thiserror::Error;

/// The primary error type used across all Velora port traits and core operations.
///
/// Variants are split by collaborator so the orchestrator can degrade each
/// boundary independently: a calendar failure turns into an "unavailable"
/// booking outcome, a platform failure into a logged system history entry,
/// and a store failure into a skipped turn (fail closed).
#[derive(Debug, Error)]
pub enum VeloraError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Conversation store errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Calendar collaborator errors (availability query, event creation).
    #[error("calendar error: {message}")]
    Calendar {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound message platform errors (send failure, rate limiting, HTTP 403).
    #[error("platform error: {message}")]
    Platform {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Intent classifier network or service failure.
    #[error("classifier upstream error: {message}")]
    ClassifierUpstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Intent classifier returned malformed or incomplete output.
    ///
    /// A defect in the collaborator, not a transient failure: the turn is
    /// aborted rather than degraded.
    #[error("classifier contract violation: {0}")]
    ClassifierContract(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VeloraError {
    /// Wrap an arbitrary error as a storage failure.
    pub fn storage<E: std::error::Error + Send + Sync + 'static>(source: E) -> Self {
        VeloraError::Storage {
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct_and_display() {
        let config = VeloraError::Config("bad toml".into());
        assert!(config.to_string().contains("bad toml"));

        let storage = VeloraError::storage(std::io::Error::other("disk full"));
        assert!(storage.to_string().contains("disk full"));

        let calendar = VeloraError::Calendar {
            message: "slot query failed".into(),
            source: None,
        };
        assert!(calendar.to_string().contains("slot query failed"));

        let contract = VeloraError::ClassifierContract("empty intent".into());
        assert!(contract.to_string().contains("empty intent"));
    }
}
