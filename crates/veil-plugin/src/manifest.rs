// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifest parsing from `plugin.toml` files.
//!
//! A manifest carries a plugin's [`PluginMetadata`] so bundles can ship their
//! descriptive fields alongside the code instead of hard-coding them.

use serde::Deserialize;
use veil_core::VeilError;

use crate::plugin::PluginMetadata;

/// Intermediate TOML deserialization struct for `plugin.toml`.
#[derive(Debug, Deserialize)]
struct PluginManifestFile {
    plugin: PluginSection,
}

/// The `[plugin]` section of a `plugin.toml` file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginSection {
    id: String,
    name: String,
    version: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    license: String,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Parse plugin metadata from TOML content.
///
/// Validates that id and name are non-empty and that version is valid semver.
pub fn parse_plugin_manifest(toml_content: &str) -> Result<PluginMetadata, VeilError> {
    let file: PluginManifestFile = toml::from_str(toml_content)
        .map_err(|e| VeilError::Config(format!("invalid plugin manifest: {e}")))?;

    let section = file.plugin;

    if section.id.trim().is_empty() {
        return Err(VeilError::Config(
            "plugin manifest: id must not be empty".to_string(),
        ));
    }

    if section.name.trim().is_empty() {
        return Err(VeilError::Config(
            "plugin manifest: name must not be empty".to_string(),
        ));
    }

    semver::Version::parse(&section.version).map_err(|e| {
        VeilError::Config(format!(
            "plugin manifest: invalid version '{}': {e}",
            section.version
        ))
    })?;

    Ok(PluginMetadata {
        id: section.id,
        name: section.name,
        version: section.version,
        description: section.description,
        author: section.author,
        license: section.license,
        dependencies: section.dependencies,
        tags: section.tags,
    })
}
