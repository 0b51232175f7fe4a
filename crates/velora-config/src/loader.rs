// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./velora.toml` > `~/.config/velora/velora.toml` > `/etc/velora/velora.toml`
//! with environment variable overrides via `VELORA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VeloraConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/velora/velora.toml` (system-wide)
/// 3. `~/.config/velora/velora.toml` (user XDG config)
/// 4. `./velora.toml` (local directory)
/// 5. `VELORA_*` environment variables
pub fn load_config() -> Result<VeloraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VeloraConfig::default()))
        .merge(Toml::file("/etc/velora/velora.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("velora/velora.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("velora.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<VeloraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VeloraConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VeloraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VeloraConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `VELORA_ENGINE_COOLDOWN_SECONDS`
/// must map to `engine.cooldown_seconds`, not `engine.cooldown.seconds`.
fn env_provider() -> Env {
    Env::prefixed("VELORA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: VELORA_ENGINE_AUTO_REPLY -> "engine_auto_reply"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("business_", "business.", 1)
            .replacen("engine_", "engine.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
