// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./veil.toml` > `~/.config/veil/veil.toml` > `/etc/veil/veil.toml`
//! with environment variable overrides via `VEIL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use tracing::debug;

use crate::model::VeilConfig;

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/veil/veil.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "veil.toml";

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("veil/veil.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/veil/veil.toml` (system-wide)
/// 3. `~/.config/veil/veil.toml` (user XDG config)
/// 4. `./veil.toml` (local directory)
/// 5. `VEIL_*` environment variables
pub fn load_config() -> Result<VeilConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<VeilConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VeilConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VeilConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VeilConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    let layers = [
        Some(PathBuf::from(SYSTEM_CONFIG_PATH)),
        user_config_path(),
        Some(PathBuf::from(LOCAL_CONFIG_PATH)),
    ];

    let mut figment = Figment::new().merge(Serialized::defaults(VeilConfig::default()));
    for path in layers.into_iter().flatten() {
        if path.is_file() {
            debug!(path = %path.display(), "config file layer found");
        } else {
            debug!(path = %path.display(), "config file layer absent, skipped");
        }
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Map `VEIL_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `VEIL_CACHE_DEFAULT_TTL_MS` is `cache.default_ttl_ms`.
/// Plugin tables are not settable from the environment.
fn env_provider() -> Env {
    Env::prefixed("VEIL_").map(|key| {
        let mapped = map_env_key(key.as_str());
        mapped.into()
    })
}

fn map_env_key(key: &str) -> String {
    key.replacen("log_", "log.", 1)
        .replacen("cache_", "cache.", 1)
        .replacen("decrypt_", "decrypt.", 1)
        .replacen("bridge_", "bridge.", 1)
        .replacen("remote_", "remote.", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn build_figment_reports_each_file_layer() {
        let _ = build_figment();
        assert!(logs_contain(SYSTEM_CONFIG_PATH));
        assert!(logs_contain(LOCAL_CONFIG_PATH));
        assert!(logs_contain("config file layer"));
    }

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("log_level"), "log.level");
        assert_eq!(map_env_key("cache_default_ttl_ms"), "cache.default_ttl_ms");
        assert_eq!(map_env_key("cache_sweep_enabled"), "cache.sweep_enabled");
        assert_eq!(map_env_key("decrypt_window_size"), "decrypt.window_size");
        assert_eq!(map_env_key("bridge_enabled"), "bridge.enabled");
        assert_eq!(map_env_key("remote_endpoint_prefix"), "remote.endpoint_prefix");
    }
}
