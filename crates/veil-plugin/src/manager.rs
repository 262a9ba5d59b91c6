// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin lifecycle management.
//!
//! The [`PluginManager`] loads, unloads, reloads, and configures plugins,
//! registering their primitives into a shared registry. Loaded plugins and
//! their configs live behind one lock, held for the whole of a load or
//! unload, so a plugin id is never loaded twice concurrently.
//!
//! Error conventions:
//! - `load_plugin` returns `Err` for a duplicate id or a failing `init`.
//! - `unload_plugin`, `reload_plugin`, and the config setters return `false`
//!   instead of failing.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use veil_core::VeilError;
use veil_registry::SharedRegistry;

use crate::plugin::{LoadOutcome, Plugin, PluginConfig, PluginMetadata};

/// Partial update for a [`PluginConfig`]. `config` entries are merged key by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginConfigPatch {
    pub enabled: Option<bool>,
    pub config: Option<Map<String, Value>>,
}

#[derive(Default)]
struct PluginState {
    plugins: IndexMap<String, Arc<dyn Plugin>>,
    configs: HashMap<String, PluginConfig>,
}

/// Loads plugin bundles into a shared primitive registry.
pub struct PluginManager {
    registry: SharedRegistry,
    state: Mutex<PluginState>,
}

impl PluginManager {
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            state: Mutex::new(PluginState::default()),
        }
    }

    /// The registry plugins register their primitives into.
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Load a plugin: run `init`, then register its primitives.
    ///
    /// Fails with [`VeilError::PluginAlreadyLoaded`] if the id is loaded, and
    /// with `init`'s error if it fails (nothing is registered in that case).
    /// A disabled plugin is skipped without error.
    pub async fn load_plugin(&self, plugin: Arc<dyn Plugin>) -> Result<LoadOutcome, VeilError> {
        let id = plugin.id().to_string();
        let mut state = self.state.lock().await;

        if state.plugins.contains_key(&id) {
            warn!(plugin_id = %id, "plugin already loaded");
            return Err(VeilError::PluginAlreadyLoaded(id));
        }

        let enabled = state.configs.entry(id.clone()).or_default().enabled;
        if !enabled {
            info!(plugin_id = %id, "plugin disabled, skipping load");
            return Ok(LoadOutcome::SkippedDisabled);
        }

        let primitives = plugin.primitives();
        {
            let mut registry = self.registry.write().await;
            if let Err(err) = plugin.init(&mut registry).await {
                error!(plugin_id = %id, error = %err, "plugin init failed");
                return Err(err);
            }
            for primitive in &primitives {
                registry.register(Arc::clone(primitive));
            }
        }

        info!(
            plugin_id = %id,
            version = %plugin.metadata().version,
            primitives = primitives.len(),
            "loaded plugin"
        );
        state.plugins.insert(id, plugin);
        Ok(LoadOutcome::Loaded)
    }

    /// Unload a plugin: run `destroy`, then unregister its primitives.
    ///
    /// Returns `false` if the plugin is not loaded or `destroy` fails; in the
    /// latter case the plugin stays loaded with its primitives registered.
    pub async fn unload_plugin(&self, id: &str) -> bool {
        let mut state = self.state.lock().await;
        let Some(plugin) = state.plugins.get(id).cloned() else {
            debug!(plugin_id = %id, "unload ignored, plugin not loaded");
            return false;
        };

        if let Err(err) = plugin.destroy().await {
            error!(plugin_id = %id, error = %err, "plugin destroy failed");
            return false;
        }

        {
            let mut registry = self.registry.write().await;
            for primitive in plugin.primitives() {
                registry.unregister(primitive.id());
            }
        }

        state.plugins.shift_remove(id);
        info!(plugin_id = %id, "unloaded plugin");
        true
    }

    /// Unload and load the same plugin object again.
    ///
    /// Returns `false` if the plugin is not loaded, the unload fails, or the
    /// load fails. A failed load leaves the plugin unloaded.
    pub async fn reload_plugin(&self, id: &str) -> bool {
        let Some(plugin) = self.get_plugin(id).await else {
            return false;
        };

        if !self.unload_plugin(id).await {
            warn!(plugin_id = %id, "reload aborted, unload failed");
            return false;
        }

        match self.load_plugin(plugin).await {
            Ok(_) => {
                info!(plugin_id = %id, "reloaded plugin");
                true
            }
            Err(err) => {
                error!(plugin_id = %id, error = %err, "plugin reload failed");
                false
            }
        }
    }

    /// Seed a plugin's config before it is first loaded.
    pub async fn preconfigure(&self, id: impl Into<String>, config: PluginConfig) {
        let id = id.into();
        debug!(plugin_id = %id, enabled = config.enabled, "plugin preconfigured");
        self.state.lock().await.configs.insert(id, config);
    }

    /// Toggle a plugin's enabled flag. Returns `false` if the plugin has no config.
    ///
    /// Takes effect on the next load; a loaded plugin stays loaded.
    pub async fn set_plugin_enabled(&self, id: &str, enabled: bool) -> bool {
        match self.state.lock().await.configs.get_mut(id) {
            Some(config) => {
                config.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Returns `false` for unknown plugins.
    pub async fn is_plugin_enabled(&self, id: &str) -> bool {
        self.state
            .lock()
            .await
            .configs
            .get(id)
            .is_some_and(|c| c.enabled)
    }

    /// Merge `patch` into a plugin's config. Returns `false` if it has no config.
    pub async fn update_plugin_config(&self, id: &str, patch: PluginConfigPatch) -> bool {
        let mut state = self.state.lock().await;
        let Some(config) = state.configs.get_mut(id) else {
            return false;
        };
        if let Some(enabled) = patch.enabled {
            config.enabled = enabled;
        }
        if let Some(entries) = patch.config {
            config.config.extend(entries);
        }
        true
    }

    pub async fn get_plugin_config(&self, id: &str) -> Option<PluginConfig> {
        self.state.lock().await.configs.get(id).cloned()
    }

    pub async fn get_plugin(&self, id: &str) -> Option<Arc<dyn Plugin>> {
        self.state.lock().await.plugins.get(id).cloned()
    }

    pub async fn is_plugin_loaded(&self, id: &str) -> bool {
        self.state.lock().await.plugins.contains_key(id)
    }

    /// All loaded plugins, in load order.
    pub async fn get_all_plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.state.lock().await.plugins.values().cloned().collect()
    }

    pub async fn get_plugin_metadata(&self, id: &str) -> Option<PluginMetadata> {
        self.state
            .lock()
            .await
            .plugins
            .get(id)
            .map(|p| p.metadata().clone())
    }

    /// Metadata of all loaded plugins, in load order.
    pub async fn get_all_plugin_metadata(&self) -> Vec<PluginMetadata> {
        self.get_all_plugins()
            .await
            .iter()
            .map(|p| p.metadata().clone())
            .collect()
    }
}
