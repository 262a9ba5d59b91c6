// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::VeilConfig;

/// Accepted values for `log.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Largest accepted `decrypt.window_size`.
pub const MAX_DECRYPT_WINDOW: usize = 64;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &VeilConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        fail(format!(
            "log.level `{}` must be one of {}",
            config.log.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.cache.default_ttl_ms == 0 {
        fail("cache.default_ttl_ms must be greater than 0".to_string());
    }

    if config.cache.sweep_interval_ms == 0 {
        fail("cache.sweep_interval_ms must be greater than 0".to_string());
    }

    let window = config.decrypt.window_size;
    if !(1..=MAX_DECRYPT_WINDOW).contains(&window) {
        fail(format!(
            "decrypt.window_size must be between 1 and {MAX_DECRYPT_WINDOW}, got {window}"
        ));
    }

    let mut ids: Vec<&String> = config.plugins.keys().collect();
    ids.sort();
    for id in ids {
        if id.trim().is_empty() {
            fail("plugins table contains an empty plugin id".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
