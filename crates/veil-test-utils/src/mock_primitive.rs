// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock primitives for deterministic engine and registry tests.
//!
//! None of these touch the remote service. Each records how often it ran so
//! tests can assert which steps of a workflow actually executed.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use veil_core::{Payload, Primitive, PrimitiveDescriptor, VeilError};

/// Returns its input unchanged plus `"<id>": true`, so a chained payload
/// records every step it passed through.
pub struct EchoPrimitive {
    descriptor: PrimitiveDescriptor,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl EchoPrimitive {
    pub fn new(id: &str, category: &str) -> Self {
        Self::with_descriptor(PrimitiveDescriptor::new(id, id, category))
    }

    pub fn with_descriptor(descriptor: PrimitiveDescriptor) -> Self {
        Self {
            descriptor,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep for `delay` on every call before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Convenience for registering the same mock in several places.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Primitive for EchoPrimitive {
    fn descriptor(&self) -> &PrimitiveDescriptor {
        &self.descriptor
    }

    async fn execute(&self, mut input: Payload) -> Result<Payload, VeilError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        input.insert(self.descriptor.id.clone(), json!(true));
        Ok(input)
    }
}

/// Fails every call with [`VeilError::Execution`].
pub struct FailingPrimitive {
    descriptor: PrimitiveDescriptor,
    message: String,
    calls: AtomicUsize,
}

impl FailingPrimitive {
    pub fn new(id: &str, message: &str) -> Self {
        Self {
            descriptor: PrimitiveDescriptor::new(id, id, "failing"),
            message: message.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Primitive for FailingPrimitive {
    fn descriptor(&self) -> &PrimitiveDescriptor {
        &self.descriptor
    }

    async fn execute(&self, _input: Payload) -> Result<Payload, VeilError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(VeilError::execution(&self.descriptor.id, &self.message))
    }
}

type ExecuteFn = Box<dyn Fn(Payload) -> Result<Payload, VeilError> + Send + Sync>;

/// A primitive whose behaviour is a synchronous closure.
pub struct FnPrimitive {
    descriptor: PrimitiveDescriptor,
    execute: ExecuteFn,
    calls: AtomicUsize,
}

impl FnPrimitive {
    pub fn new(
        descriptor: PrimitiveDescriptor,
        execute: impl Fn(Payload) -> Result<Payload, VeilError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            descriptor,
            execute: Box::new(execute),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Primitive for FnPrimitive {
    fn descriptor(&self) -> &PrimitiveDescriptor {
        &self.descriptor
    }

    async fn execute(&self, input: Payload) -> Result<Payload, VeilError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.execute)(input)
    }
}
