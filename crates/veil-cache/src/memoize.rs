// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memoization of expensive async operations on top of [`TtlCache`].

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use tokio::time::Duration;
use tracing::debug;
use veil_core::VeilError;

use crate::ttl::TtlCache;

type KeyFn<A> = Box<dyn Fn(&A) -> String + Send + Sync>;

/// Wraps an async operation so repeated calls with equal arguments are served
/// from a cache.
///
/// The cache key is the JSON encoding of the arguments unless a key function
/// is supplied. Only resolved values are cached; errors pass through and the
/// next call retries. Synchronous operations can be wrapped by returning
/// `std::future::ready(..)`.
pub struct Memoized<A, V, F> {
    cache: Arc<TtlCache<V>>,
    operation: F,
    key_fn: Option<KeyFn<A>>,
    ttl: Option<Duration>,
    _args: PhantomData<fn(A)>,
}

impl<A, V, F, Fut> Memoized<A, V, F>
where
    A: Serialize,
    V: Clone + Send + 'static,
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<V, VeilError>>,
{
    pub fn new(cache: Arc<TtlCache<V>>, operation: F) -> Self {
        Self {
            cache,
            operation,
            key_fn: None,
            ttl: None,
            _args: PhantomData,
        }
    }

    /// Derive cache keys with `key_fn` instead of serialising the arguments.
    pub fn with_key(mut self, key_fn: impl Fn(&A) -> String + Send + Sync + 'static) -> Self {
        self.key_fn = Some(Box::new(key_fn));
        self
    }

    /// Cache results for `ttl` instead of the cache's default.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Return the cached value for `args`, or run the operation and cache its result.
    pub async fn call(&self, args: A) -> Result<V, VeilError> {
        let key = match &self.key_fn {
            Some(key_fn) => key_fn(&args),
            None => serde_json::to_string(&args)?,
        };

        if let Some(hit) = self.cache.get(&key).await {
            debug!(key = %key, "memoized result served from cache");
            return Ok(hit);
        }

        let value = (self.operation)(args).await?;
        let ttl = self.ttl.unwrap_or_else(|| self.cache.default_ttl());
        self.cache.set_with_ttl(key, value.clone(), ttl).await;
        Ok(value)
    }
}
