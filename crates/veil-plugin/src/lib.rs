// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin lifecycle manager and manifest parser.
//!
//! Plugins are bundles of primitives with an `init`/`destroy` lifecycle. The
//! [`PluginManager`] loads them into a shared registry at runtime and keeps a
//! per-plugin [`PluginConfig`].

pub mod manager;
pub mod manifest;
pub mod plugin;

pub use manager::{PluginConfigPatch, PluginManager};
pub use manifest::parse_plugin_manifest;
pub use plugin::{LoadOutcome, Plugin, PluginConfig, PluginMetadata};
