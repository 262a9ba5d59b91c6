// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry and router for operations that map data between protocols.
//!
//! Bridge operations are kept apart from the primitive registry: they are
//! routed by (source, target) protocol and never composed into workflows.
//! Each operation is stored together with its [`BridgeConfig`]; the two are
//! registered and removed as a pair.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use veil_core::{Payload, VeilError};

/// An operation translating privacy data from one protocol domain to another.
#[async_trait]
pub trait BridgeOperation: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn source_protocol(&self) -> &str;

    fn target_protocol(&self) -> &str;

    async fn execute(&self, input: Payload) -> Result<Payload, VeilError>;
}

/// Routing and enablement settings for one bridge operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub source_protocol: String,
    pub target_protocol: String,
    pub enabled: bool,
    /// Field mapping hints passed through to the operation's owner.
    #[serde(default)]
    pub mapping_rules: Map<String, Value>,
}

impl BridgeConfig {
    /// An enabled config with no mapping rules.
    pub fn new(source_protocol: impl Into<String>, target_protocol: impl Into<String>) -> Self {
        Self {
            source_protocol: source_protocol.into(),
            target_protocol: target_protocol.into(),
            enabled: true,
            mapping_rules: Map::new(),
        }
    }
}

/// Partial update for a [`BridgeConfig`]. `mapping_rules` entries are merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BridgeConfigPatch {
    pub source_protocol: Option<String>,
    pub target_protocol: Option<String>,
    pub enabled: Option<bool>,
    pub mapping_rules: Option<Map<String, Value>>,
}

struct BridgeEntry {
    operation: Arc<dyn BridgeOperation>,
    config: BridgeConfig,
}

/// Cross-protocol bridge system.
pub struct CrossProtocolBridge {
    bridges: RwLock<IndexMap<String, BridgeEntry>>,
    enabled: AtomicBool,
}

impl CrossProtocolBridge {
    /// Create an empty, enabled bridge system.
    pub fn new() -> Self {
        Self {
            bridges: RwLock::new(IndexMap::new()),
            enabled: AtomicBool::new(true),
        }
    }

    /// Register an operation with its config, replacing any bridge with the same id.
    pub async fn register_bridge(&self, operation: Arc<dyn BridgeOperation>, config: BridgeConfig) {
        let id = operation.id().to_string();
        info!(
            bridge_id = %id,
            source = %config.source_protocol,
            target = %config.target_protocol,
            "registered bridge"
        );
        self.bridges
            .write()
            .await
            .insert(id, BridgeEntry { operation, config });
    }

    /// Remove an operation and its config. Returns `false` if unknown.
    pub async fn unregister_bridge(&self, id: &str) -> bool {
        let removed = self.bridges.write().await.shift_remove(id).is_some();
        if removed {
            info!(bridge_id = %id, "unregistered bridge");
        }
        removed
    }

    /// Run a bridge operation.
    ///
    /// Fails if the bridge system is disabled, the id is unknown, or the
    /// bridge's config is disabled.
    pub async fn execute_bridge(&self, id: &str, input: Payload) -> Result<Payload, VeilError> {
        if !self.is_enabled() {
            warn!(bridge_id = %id, "bridge system disabled");
            return Err(VeilError::BridgeSystemDisabled);
        }

        let operation = {
            let bridges = self.bridges.read().await;
            let entry = bridges
                .get(id)
                .ok_or_else(|| VeilError::BridgeNotFound(id.to_string()))?;
            if !entry.config.enabled {
                return Err(VeilError::BridgeDisabled(id.to_string()));
            }
            Arc::clone(&entry.operation)
        };

        debug!(
            bridge_id = %id,
            source = %operation.source_protocol(),
            target = %operation.target_protocol(),
            "executing bridge"
        );
        operation.execute(input).await
    }

    /// Enabled bridges configured for exactly this protocol pair, in
    /// registration order.
    pub async fn get_bridges_between_protocols(
        &self,
        source_protocol: &str,
        target_protocol: &str,
    ) -> Vec<Arc<dyn BridgeOperation>> {
        self.bridges
            .read()
            .await
            .values()
            .filter(|entry| {
                entry.config.enabled
                    && entry.config.source_protocol == source_protocol
                    && entry.config.target_protocol == target_protocol
            })
            .map(|entry| Arc::clone(&entry.operation))
            .collect()
    }

    /// Every registered bridge, in registration order.
    pub async fn get_all_bridges(&self) -> Vec<Arc<dyn BridgeOperation>> {
        self.bridges
            .read()
            .await
            .values()
            .map(|entry| Arc::clone(&entry.operation))
            .collect()
    }

    pub async fn get_bridge_config(&self, id: &str) -> Option<BridgeConfig> {
        self.bridges
            .read()
            .await
            .get(id)
            .map(|entry| entry.config.clone())
    }

    /// Merge `patch` into a bridge's config. Returns `false` if unknown.
    pub async fn update_bridge_config(&self, id: &str, patch: BridgeConfigPatch) -> bool {
        let mut bridges = self.bridges.write().await;
        let Some(entry) = bridges.get_mut(id) else {
            return false;
        };
        let config = &mut entry.config;
        if let Some(source) = patch.source_protocol {
            config.source_protocol = source;
        }
        if let Some(target) = patch.target_protocol {
            config.target_protocol = target;
        }
        if let Some(enabled) = patch.enabled {
            config.enabled = enabled;
        }
        if let Some(rules) = patch.mapping_rules {
            config.mapping_rules.extend(rules);
        }
        debug!(bridge_id = %id, "updated bridge config");
        true
    }

    /// Enable or disable the whole bridge system.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        info!(enabled, "bridge system toggled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

impl Default for CrossProtocolBridge {
    fn default() -> Self {
        Self::new()
    }
}
