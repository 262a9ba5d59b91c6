// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin capability trait and per-plugin configuration.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use veil_core::{Primitive, VeilError};
use veil_registry::PrimitiveRegistry;

/// Descriptive fields of a plugin bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Unique id; at most one plugin per id can be loaded.
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub license: String,
    /// Ids of plugins this one expects to be present. Advisory.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PluginMetadata {
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            description: String::new(),
            author: String::new(),
            license: String::new(),
            dependencies: Vec::new(),
            tags: Vec::new(),
        }
    }
}

/// A deployable bundle contributing primitives to the registry.
///
/// Lifecycle on load: `init` runs first, then every primitive from
/// `primitives` is registered. On unload: `destroy` runs first, then the
/// primitives are unregistered.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn metadata(&self) -> &PluginMetadata;

    /// Called with exclusive access to the registry before the plugin's
    /// primitives are registered. An error aborts the load.
    async fn init(&self, registry: &mut PrimitiveRegistry) -> Result<(), VeilError>;

    /// Called before the plugin's primitives are unregistered.
    async fn destroy(&self) -> Result<(), VeilError> {
        Ok(())
    }

    /// The primitives this plugin contributes.
    fn primitives(&self) -> Vec<Arc<dyn Primitive>>;

    /// Shorthand for `metadata().id`.
    fn id(&self) -> &str {
        &self.metadata().id
    }
}

/// Per-plugin settings. Defaults to enabled with an empty config map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    pub enabled: bool,
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            config: serde_json::Map::new(),
        }
    }
}

/// What [`PluginManager::load_plugin`](crate::PluginManager::load_plugin) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// `init` ran and every primitive was registered.
    Loaded,
    /// The plugin's config is disabled; nothing was registered.
    SkippedDisabled,
}
