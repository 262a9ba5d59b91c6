// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypt/decrypt through the remote service with an optional result cache.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Serialize;
use tokio::time::Duration;
use tracing::debug;
use veil_core::{RemoteEndpoint, RemoteInvoker, VeilError};

use crate::ttl::TtlCache;

/// Cache key for a crypto result.
///
/// The hash is order-sensitive over (operation, data, password) and carries no
/// security property. It only deduplicates repeated calls in-process.
pub fn cache_key(operation: &str, data: &str, password: &str) -> String {
    let mut hasher = DefaultHasher::new();
    operation.hash(&mut hasher);
    data.hash(&mut hasher);
    password.hash(&mut hasher);
    format!("{operation}:{:016x}", hasher.finish())
}

/// Cache of encrypt/decrypt results keyed by [`cache_key`].
pub struct CryptoCache {
    inner: TtlCache<String>,
}

impl CryptoCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: TtlCache::new(ttl),
        }
    }

    /// Wrap an existing store, e.g. one with a background sweep.
    pub fn from_store(inner: TtlCache<String>) -> Self {
        Self { inner }
    }

    pub async fn get(&self, operation: &str, data: &str, password: &str) -> Option<String> {
        self.inner.get(&cache_key(operation, data, password)).await
    }

    pub async fn set(&self, operation: &str, data: &str, password: &str, result: String) {
        self.inner
            .set(cache_key(operation, data, password), result)
            .await;
    }

    pub async fn clear(&self) {
        self.inner.clear().await;
    }

    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.is_empty().await
    }

    pub fn stop_sweeper(&self) {
        self.inner.stop_sweeper();
    }
}

#[derive(Serialize)]
struct CryptoRequest<'a> {
    data: &'a str,
    password: &'a str,
}

/// Client for the remote `encrypt` and `decrypt` endpoints.
#[derive(Clone)]
pub struct CryptoClient {
    invoker: Arc<dyn RemoteInvoker>,
    cache: Option<Arc<CryptoCache>>,
    endpoint_prefix: String,
}

impl CryptoClient {
    pub fn new(invoker: Arc<dyn RemoteInvoker>) -> Self {
        Self {
            invoker,
            cache: None,
            endpoint_prefix: String::new(),
        }
    }

    /// Serve repeated calls from `cache` instead of the remote service.
    pub fn with_cache(mut self, cache: Arc<CryptoCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Prepend `prefix` to every endpoint name.
    pub fn with_endpoint_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.endpoint_prefix = prefix.into();
        self
    }

    pub fn cache(&self) -> Option<&Arc<CryptoCache>> {
        self.cache.as_ref()
    }

    pub async fn encrypt(&self, data: &str, password: &str) -> Result<String, VeilError> {
        self.call(RemoteEndpoint::Encrypt, data, password).await
    }

    pub async fn decrypt(&self, data: &str, password: &str) -> Result<String, VeilError> {
        self.call(RemoteEndpoint::Decrypt, data, password).await
    }

    async fn call(
        &self,
        endpoint: RemoteEndpoint,
        data: &str,
        password: &str,
    ) -> Result<String, VeilError> {
        let operation = endpoint.to_string();
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&operation, data, password).await {
                debug!(operation = %operation, "crypto result served from cache");
                return Ok(hit);
            }
        }

        let path = format!("{}{}", self.endpoint_prefix, operation);
        let body = serde_json::to_vec(&CryptoRequest { data, password })?;
        let bytes = self.invoker.invoke(&path, body).await?.into_data(&path)?;
        let result = String::from_utf8(bytes).map_err(|e| VeilError::Remote {
            endpoint: path.clone(),
            message: format!("response is not valid UTF-8: {e}"),
        })?;

        if let Some(cache) = &self.cache {
            cache.set(&operation, data, password, result.clone()).await;
        }
        Ok(result)
    }
}
