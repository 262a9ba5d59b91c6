// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The explicitly constructed context wiring every SDK component together.
//!
//! There is no global instance. Each [`VeilContext`] owns its own registry,
//! engine, plugin manager, bridge, and caches, so two contexts never observe
//! each other's registrations.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use veil_bridge::CrossProtocolBridge;
use veil_cache::{decrypt_batch, CryptoCache, CryptoClient, DecryptedItem, EncryptedItem, TtlCache};
use veil_config::VeilConfig;
use veil_core::{PrimitiveDescriptor, RemoteEndpoint, RemoteInvoker, RemotePrimitive, VeilError};
use veil_engine::ComposabilityEngine;
use veil_plugin::{PluginConfig, PluginManager};
use veil_registry::{PrimitiveRegistry, SharedRegistry};

/// One SDK instance.
pub struct VeilContext {
    registry: SharedRegistry,
    engine: ComposabilityEngine,
    plugins: PluginManager,
    bridge: CrossProtocolBridge,
    cache: Arc<TtlCache<Value>>,
    crypto: CryptoClient,
    invoker: Arc<dyn RemoteInvoker>,
    endpoint_prefix: String,
    decrypt_window: usize,
}

impl VeilContext {
    /// Build a context from validated config.
    ///
    /// Must be called inside a tokio runtime when `cache.sweep_enabled` is
    /// set, since the sweep tasks are spawned here.
    pub async fn new(config: &VeilConfig, invoker: Arc<dyn RemoteInvoker>) -> Self {
        let registry = PrimitiveRegistry::shared();
        let engine = ComposabilityEngine::new(Arc::clone(&registry));

        let plugins = PluginManager::new(Arc::clone(&registry));
        for (id, settings) in &config.plugins {
            plugins
                .preconfigure(
                    id.clone(),
                    PluginConfig {
                        enabled: settings.enabled,
                        config: settings.config.clone(),
                    },
                )
                .await;
        }

        let bridge = CrossProtocolBridge::new();
        bridge.set_enabled(config.bridge.enabled);

        let ttl = config.cache.default_ttl();
        let (cache, crypto_store) = if config.cache.sweep_enabled {
            let interval = config.cache.sweep_interval();
            (
                TtlCache::with_sweeper(ttl, interval),
                TtlCache::with_sweeper(ttl, interval),
            )
        } else {
            (TtlCache::new(ttl), TtlCache::new(ttl))
        };

        let crypto = CryptoClient::new(Arc::clone(&invoker))
            .with_cache(Arc::new(CryptoCache::from_store(crypto_store)))
            .with_endpoint_prefix(config.remote.endpoint_prefix.clone());

        info!(
            plugins_configured = config.plugins.len(),
            bridge_enabled = config.bridge.enabled,
            decrypt_window = config.decrypt.window_size,
            "veil context initialized"
        );

        Self {
            registry,
            engine,
            plugins,
            bridge,
            cache: Arc::new(cache),
            crypto,
            invoker,
            endpoint_prefix: config.remote.endpoint_prefix.clone(),
            decrypt_window: config.decrypt.window_size,
        }
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &ComposabilityEngine {
        &self.engine
    }

    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    pub fn bridge(&self) -> &CrossProtocolBridge {
        &self.bridge
    }

    /// General-purpose TTL cache, e.g. for [`veil_cache::Memoized`] results.
    pub fn cache(&self) -> &Arc<TtlCache<Value>> {
        &self.cache
    }

    pub fn crypto(&self) -> &CryptoClient {
        &self.crypto
    }

    /// A primitive forwarding to a well-known endpoint under the configured prefix.
    pub fn remote_primitive(
        &self,
        descriptor: PrimitiveDescriptor,
        endpoint: RemoteEndpoint,
    ) -> RemotePrimitive {
        RemotePrimitive::new(
            descriptor,
            format!("{}{}", self.endpoint_prefix, endpoint),
            Arc::clone(&self.invoker),
        )
    }

    /// Decrypt `items` using the configured window size.
    pub async fn decrypt_batch(
        &self,
        items: &[EncryptedItem],
        password: &str,
    ) -> Result<Vec<DecryptedItem>, VeilError> {
        decrypt_batch(&self.crypto, items, password, self.decrypt_window).await
    }

    /// Stop background cache sweeps. Cached values stay readable.
    pub fn shutdown(&self) {
        self.cache.stop_sweeper();
        if let Some(crypto_cache) = self.crypto.cache() {
            crypto_cache.stop_sweeper();
        }
        info!("veil context shut down");
    }
}
