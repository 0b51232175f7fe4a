// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as hour ranges and non-negative durations.

use thiserror::Error;

use crate::model::VeloraConfig;

/// A configuration error surfaced at load time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Deserialization failed (bad TOML, unknown key, wrong type).
    #[error("config parse error: {message}{}", suggestion_suffix(.suggestion))]
    Parse {
        message: String,
        /// Closest known key, when the error names an unknown field.
        suggestion: Option<String>,
    },

    /// The config deserialized but a semantic constraint failed.
    #[error("config validation error: {message}")]
    Validation { message: String },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(key) => format!(" (did you mean `{key}`?)"),
        None => String::new(),
    }
}

/// Known top-level and section key names, used for typo suggestions.
const KNOWN_KEYS: &[&str] = &[
    "agent",
    "business",
    "engine",
    "storage",
    "name",
    "log_level",
    "timezone_offset_hours",
    "open_hour",
    "close_hour",
    "cooldown_seconds",
    "history_limit",
    "processed_cap",
    "booking_buffer_minutes",
    "auto_reply",
    "max_suggested_slots",
    "database_path",
    "wal_mode",
];

/// Suggest the closest known config key for an unrecognized one.
///
/// Returns `None` when nothing is close enough to be a plausible typo.
pub fn suggest_key(unknown: &str) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|candidate| (strsim::jaro_winkler(unknown, candidate), *candidate))
        .filter(|(score, _)| *score >= 0.85)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.to_string())
}

/// Convert a figment error into a [`ConfigError::Parse`], attaching a typo
/// suggestion when the message names an unknown field.
pub fn parse_error(err: &figment::Error) -> ConfigError {
    let message = err.to_string();
    let suggestion = message
        .split('`')
        .nth(1)
        .filter(|_| message.contains("unknown field"))
        .and_then(suggest_key);
    ConfigError::Parse {
        message,
        suggestion,
    }
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VeloraConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.business.open_hour >= config.business.close_hour {
        errors.push(ConfigError::Validation {
            message: format!(
                "business.open_hour ({}) must be before business.close_hour ({})",
                config.business.open_hour, config.business.close_hour
            ),
        });
    }

    if config.business.close_hour > 24 {
        errors.push(ConfigError::Validation {
            message: format!(
                "business.close_hour must be at most 24, got {}",
                config.business.close_hour
            ),
        });
    }

    if !(-14..=14).contains(&config.business.timezone_offset_hours) {
        errors.push(ConfigError::Validation {
            message: format!(
                "business.timezone_offset_hours must be between -14 and 14, got {}",
                config.business.timezone_offset_hours
            ),
        });
    }

    if config.engine.cooldown_seconds < 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.cooldown_seconds must be non-negative, got {}",
                config.engine.cooldown_seconds
            ),
        });
    }

    if config.engine.booking_buffer_minutes < 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.booking_buffer_minutes must be non-negative, got {}",
                config.engine.booking_buffer_minutes
            ),
        });
    }

    if config.engine.history_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.history_limit must be at least 1".to_string(),
        });
    }

    if config.engine.processed_cap == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.processed_cap must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&VeloraConfig::default()).is_ok());
    }

    #[test]
    fn suggest_key_catches_transpositions() {
        assert_eq!(suggest_key("auto_repyl").as_deref(), Some("auto_reply"));
        assert_eq!(suggest_key("databse_path").as_deref(), Some("database_path"));
    }

    #[test]
    fn suggest_key_rejects_distant_strings() {
        assert_eq!(suggest_key("zzzzzz"), None);
    }

    #[test]
    fn inverted_hours_are_rejected() {
        let mut config = VeloraConfig::default();
        config.business.open_hour = 19;
        config.business.close_hour = 9;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.to_string().contains("open_hour")));
    }

    #[test]
    fn negative_cooldown_is_rejected() {
        let mut config = VeloraConfig::default();
        config.engine.cooldown_seconds = -1.0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
