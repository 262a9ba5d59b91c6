// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock bridge operation.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use veil_bridge::{BridgeConfig, BridgeOperation};
use veil_core::{Payload, VeilError};

/// Copies its input and stamps `"bridged_from"` / `"bridged_to"` with its
/// protocol pair.
pub struct MockBridge {
    id: String,
    source: String,
    target: String,
    calls: AtomicUsize,
}

impl MockBridge {
    pub fn new(id: &str, source: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// An enabled config matching this bridge's protocol pair.
    pub fn config(&self) -> BridgeConfig {
        BridgeConfig::new(&self.source, &self.target)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BridgeOperation for MockBridge {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "mock bridge"
    }

    fn source_protocol(&self) -> &str {
        &self.source
    }

    fn target_protocol(&self) -> &str {
        &self.target
    }

    async fn execute(&self, mut input: Payload) -> Result<Payload, VeilError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        input.insert("bridged_from".into(), json!(self.source));
        input.insert("bridged_to".into(), json!(self.target));
        Ok(input)
    }
}
