// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Velora configuration system.

use velora_config::model::VeloraConfig;
use velora_config::{load_and_validate_str, load_config_from_str, suggest_key};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_velora_config() {
    let toml = r#"
[agent]
name = "test-agent"
log_level = "debug"

[business]
name = "Test Studio"
timezone_offset_hours = -5
open_hour = 10
close_hour = 18

[engine]
cooldown_seconds = 5.0
history_limit = 25
processed_cap = 500
booking_buffer_minutes = 30
auto_reply = true
max_suggested_slots = 3

[storage]
database_path = "/tmp/test.db"
wal_mode = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "test-agent");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.business.name, "Test Studio");
    assert_eq!(config.business.timezone_offset_hours, -5);
    assert_eq!(config.business.open_hour, 10);
    assert_eq!(config.business.close_hour, 18);
    assert_eq!(config.engine.cooldown_seconds, 5.0);
    assert_eq!(config.engine.history_limit, 25);
    assert_eq!(config.engine.processed_cap, 500);
    assert_eq!(config.engine.booking_buffer_minutes, 30);
    assert!(config.engine.auto_reply);
    assert_eq!(config.engine.max_suggested_slots, 3);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
}

/// Empty TOML produces the full default configuration.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.agent.name, "velora");
    assert_eq!(config.business.timezone_offset_hours, -8);
    assert_eq!(config.business.open_hour, 9);
    assert_eq!(config.business.close_hour, 19);
    assert_eq!(config.engine.cooldown_seconds, 3.0);
    assert_eq!(config.engine.history_limit, 50);
    assert_eq!(config.engine.processed_cap, 1000);
    assert_eq!(config.engine.booking_buffer_minutes, 15);
    assert!(!config.engine.auto_reply);
    assert_eq!(config.engine.max_suggested_slots, 2);
    assert!(config.storage.wal_mode);
}

/// Unknown field in [engine] section is rejected by deny_unknown_fields.
#[test]
fn unknown_field_in_engine_produces_error() {
    let toml = r#"
[engine]
cooldwon_seconds = 5.0
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("cooldwon_seconds"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Partial section keeps defaults for unspecified fields.
#[test]
fn partial_section_keeps_defaults() {
    let toml = r#"
[engine]
auto_reply = true
"#;

    let config = load_config_from_str(toml).expect("partial section should deserialize");
    assert!(config.engine.auto_reply);
    assert_eq!(config.engine.cooldown_seconds, 3.0);
    assert_eq!(config.engine.max_suggested_slots, 2);
}

/// load_and_validate_str rejects semantically invalid values.
#[test]
fn validation_rejects_inverted_business_hours() {
    let toml = r#"
[business]
open_hour = 20
close_hour = 8
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors
        .iter()
        .any(|e| e.to_string().contains("open_hour")));
}

/// load_and_validate_str accepts a valid config end to end.
#[test]
fn validation_accepts_valid_config() {
    let toml = r#"
[business]
timezone_offset_hours = 1

[engine]
cooldown_seconds = 0.0
"#;

    let config = load_and_validate_str(toml).expect("should load and validate");
    assert_eq!(config.business.timezone_offset_hours, 1);
    assert_eq!(config.engine.cooldown_seconds, 0.0);
}

/// Typo suggestions find the nearest known key.
#[test]
fn typo_suggestion_for_misspelled_key() {
    assert_eq!(
        suggest_key("cooldown_secondz").as_deref(),
        Some("cooldown_seconds")
    );
    assert_eq!(suggest_key("completely_unrelated_xyz"), None);
}

/// Wrong type for a known field is a parse error.
#[test]
fn wrong_type_is_rejected() {
    let toml = r#"
[engine]
history_limit = "lots"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Serialize-deserialize round trip preserves the default config.
#[test]
fn default_config_round_trips_through_toml() {
    let config = VeloraConfig::default();
    let serialized = toml::to_string(&config).expect("should serialize");
    let reparsed = load_config_from_str(&serialized).expect("should reparse");
    assert_eq!(reparsed.agent.name, config.agent.name);
    assert_eq!(
        reparsed.engine.booking_buffer_minutes,
        config.engine.booking_buffer_minutes
    );
}
