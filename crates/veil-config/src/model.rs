// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Veil privacy SDK.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Veil configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VeilConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// TTL cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Batched decryption settings.
    #[serde(default)]
    pub decrypt: DecryptConfig,

    /// Cross-protocol bridge settings.
    #[serde(default)]
    pub bridge: BridgeSettings,

    /// Remote privacy service settings.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Per-plugin settings keyed by plugin id, applied before plugins load.
    #[serde(default)]
    pub plugins: HashMap<String, PluginSettings>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// TTL cache configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Default time-to-live for cached values, in milliseconds.
    #[serde(default = "default_ttl_ms")]
    pub default_ttl_ms: u64,

    /// Interval between background sweeps of expired entries, in milliseconds.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,

    /// Whether to run the background sweep at all.
    #[serde(default = "default_true")]
    pub sweep_enabled: bool,
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_ms: default_ttl_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
            sweep_enabled: true,
        }
    }
}

fn default_ttl_ms() -> u64 {
    300_000
}

fn default_sweep_interval_ms() -> u64 {
    60_000
}

fn default_true() -> bool {
    true
}

/// Batched decryption configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DecryptConfig {
    /// Number of items decrypted concurrently per window.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

impl Default for DecryptConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
        }
    }
}

fn default_window_size() -> usize {
    5
}

/// Cross-protocol bridge configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeSettings {
    /// Whether the bridge system accepts executions at startup.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Remote privacy service configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    /// Prepended to every well-known endpoint name (e.g. `v1/`).
    #[serde(default)]
    pub endpoint_prefix: String,
}

/// Settings for one plugin.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginSettings {
    /// A disabled plugin is skipped when loaded.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Opaque plugin-specific settings.
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            config: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = VeilConfig::default();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.cache.default_ttl(), Duration::from_secs(300));
        assert_eq!(config.cache.sweep_interval(), Duration::from_secs(60));
        assert!(config.cache.sweep_enabled);
        assert_eq!(config.decrypt.window_size, 5);
        assert!(config.bridge.enabled);
        assert!(config.remote.endpoint_prefix.is_empty());
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn plugin_table_deserializes() {
        let toml_str = r#"
[plugins.zk-suite]
enabled = false

[plugins.zk-suite.config]
curve = "bn254"
max_constraints = 1000000
"#;
        let config: VeilConfig = toml::from_str(toml_str).unwrap();
        let plugin = &config.plugins["zk-suite"];
        assert!(!plugin.enabled);
        assert_eq!(plugin.config["curve"], serde_json::json!("bn254"));
        assert_eq!(plugin.config["max_constraints"], serde_json::json!(1_000_000));
    }

    #[test]
    fn plugin_settings_deny_unknown_fields() {
        let toml_str = r#"
[plugins.zk-suite]
enabeld = true
"#;
        assert!(toml::from_str::<VeilConfig>(toml_str).is_err());
    }
}
