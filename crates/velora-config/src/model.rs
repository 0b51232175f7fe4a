// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Velora conversation engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Velora configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VeloraConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Business identity, timezone, and operating hours.
    #[serde(default)]
    pub business: BusinessConfig,

    /// Message-handling engine tuning.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "velora".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Business identity and scheduling envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BusinessConfig {
    /// Business name used in calendar event titles.
    #[serde(default = "default_business_name")]
    pub name: String,

    /// Fixed UTC offset of the business, in whole hours. All timestamps
    /// and appointment times are interpreted in this offset.
    #[serde(default = "default_timezone_offset_hours")]
    pub timezone_offset_hours: i32,

    /// First bookable hour of the day (24h clock).
    #[serde(default = "default_open_hour")]
    pub open_hour: u32,

    /// Hour the last appointment must end by (24h clock).
    #[serde(default = "default_close_hour")]
    pub close_hour: u32,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: default_business_name(),
            timezone_offset_hours: default_timezone_offset_hours(),
            open_hour: default_open_hour(),
            close_hour: default_close_hour(),
        }
    }
}

fn default_business_name() -> String {
    "Velora Studio".to_string()
}

fn default_timezone_offset_hours() -> i32 {
    -8
}

fn default_open_hour() -> u32 {
    9
}

fn default_close_hour() -> u32 {
    19
}

/// Message-handling engine tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Debounce window in seconds. A second message from the same thread
    /// inside this window is coalesced instead of answered separately.
    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: f64,

    /// Maximum history entries returned per thread.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Maximum processed message ids retained per thread for idempotency.
    #[serde(default = "default_processed_cap")]
    pub processed_cap: u32,

    /// Minimum lead time before an appointment can start, in minutes.
    #[serde(default = "default_booking_buffer_minutes")]
    pub booking_buffer_minutes: i64,

    /// When false, composed replies are logged but not sent.
    #[serde(default)]
    pub auto_reply: bool,

    /// Alternative slots offered when a requested time is taken.
    #[serde(default = "default_max_suggested_slots")]
    pub max_suggested_slots: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: default_cooldown_seconds(),
            history_limit: default_history_limit(),
            processed_cap: default_processed_cap(),
            booking_buffer_minutes: default_booking_buffer_minutes(),
            auto_reply: false,
            max_suggested_slots: default_max_suggested_slots(),
        }
    }
}

fn default_cooldown_seconds() -> f64 {
    3.0
}

fn default_history_limit() -> u32 {
    50
}

fn default_processed_cap() -> u32 {
    1000
}

fn default_booking_buffer_minutes() -> i64 {
    15
}

fn default_max_suggested_slots() -> usize {
    2
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("velora").join("velora.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("velora.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}
