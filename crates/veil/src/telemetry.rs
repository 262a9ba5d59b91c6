// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing subscriber setup for applications embedding the SDK.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber at `log_level` for every `veil*` target.
///
/// `RUST_LOG` takes precedence when set. Returns `false` if a global
/// subscriber was already installed.
pub fn init_tracing(log_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init()
        .is_ok()
}

// Target directives match by prefix, so `veil` also covers `veil_registry` etc.
fn default_directives(log_level: &str) -> String {
    format!("veil={log_level},warn")
}
