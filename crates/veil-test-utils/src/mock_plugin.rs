// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock plugin with switchable lifecycle failures.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use veil_core::{Primitive, VeilError};
use veil_plugin::{Plugin, PluginMetadata};
use veil_registry::PrimitiveRegistry;

use crate::mock_primitive::EchoPrimitive;

/// A plugin contributing a fixed set of primitives.
///
/// `init` and `destroy` succeed unless switched to fail with
/// [`MockPlugin::set_fail_init`] / [`MockPlugin::set_fail_destroy`].
pub struct MockPlugin {
    metadata: PluginMetadata,
    primitives: Vec<Arc<dyn Primitive>>,
    fail_init: AtomicBool,
    fail_destroy: AtomicBool,
    init_calls: AtomicUsize,
    destroy_calls: AtomicUsize,
}

impl MockPlugin {
    pub fn new(id: &str, primitives: Vec<Arc<dyn Primitive>>) -> Self {
        Self {
            metadata: PluginMetadata::new(id, format!("Mock {id}"), "1.0.0"),
            primitives,
            fail_init: AtomicBool::new(false),
            fail_destroy: AtomicBool::new(false),
            init_calls: AtomicUsize::new(0),
            destroy_calls: AtomicUsize::new(0),
        }
    }

    /// A plugin contributing one [`EchoPrimitive`] per id, all in `category`.
    pub fn with_echo_primitives(id: &str, category: &str, primitive_ids: &[&str]) -> Self {
        let primitives = primitive_ids
            .iter()
            .map(|pid| Arc::new(EchoPrimitive::new(pid, category)) as Arc<dyn Primitive>)
            .collect();
        Self::new(id, primitives)
    }

    pub fn set_fail_init(&self, fail: bool) {
        self.fail_init.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_destroy(&self, fail: bool) {
        self.fail_destroy.store(fail, Ordering::SeqCst);
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn destroy_calls(&self) -> usize {
        self.destroy_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Plugin for MockPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    async fn init(&self, _registry: &mut PrimitiveRegistry) -> Result<(), VeilError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(VeilError::PluginInit {
                plugin_id: self.metadata.id.clone(),
                message: "mock init failure".into(),
            });
        }
        Ok(())
    }

    async fn destroy(&self) -> Result<(), VeilError> {
        self.destroy_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_destroy.load(Ordering::SeqCst) {
            return Err(VeilError::PluginDestroy {
                plugin_id: self.metadata.id.clone(),
                message: "mock destroy failure".into(),
            });
        }
        Ok(())
    }

    fn primitives(&self) -> Vec<Arc<dyn Primitive>> {
        self.primitives.clone()
    }
}
