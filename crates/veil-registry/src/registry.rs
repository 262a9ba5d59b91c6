// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of privacy primitives and workflows.
//!
//! The [`PrimitiveRegistry`] owns the primitive map, the per-category index,
//! the metadata projection, and registered workflows. Components share one
//! registry through [`SharedRegistry`]; every mutator takes `&mut self`, so the
//! primitive map, category index, and metadata change together under one
//! write guard.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::{debug, info};
use veil_core::Primitive;

use crate::metadata::{MetadataPatch, PrimitiveMetadata};
use crate::workflow::Workflow;

/// A registry handle shared by the engine, plugin manager, and callers.
pub type SharedRegistry = Arc<RwLock<PrimitiveRegistry>>;

/// In-memory index of primitives, categories, and workflows.
///
/// Primitive ids are unique: registering an existing id replaces the previous
/// primitive (last write wins) and keeps its position in iteration order.
pub struct PrimitiveRegistry {
    primitives: IndexMap<String, Arc<dyn Primitive>>,
    metadata: HashMap<String, PrimitiveMetadata>,
    categories: IndexMap<String, Vec<String>>,
    workflows: IndexMap<String, Arc<Workflow>>,
}

impl PrimitiveRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            primitives: IndexMap::new(),
            metadata: HashMap::new(),
            categories: IndexMap::new(),
            workflows: IndexMap::new(),
        }
    }

    /// Create an empty registry wrapped for sharing.
    pub fn shared() -> SharedRegistry {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Register a primitive, overwriting any primitive with the same id.
    pub fn register(&mut self, primitive: Arc<dyn Primitive>) {
        let descriptor = primitive.descriptor().clone();
        let id = descriptor.id.clone();
        let category = descriptor.category.clone();

        let previous_category = self
            .primitives
            .get(&id)
            .map(|p| p.descriptor().category.clone());
        let overwritten = previous_category.is_some();
        if let Some(previous) = previous_category
            && previous != category
        {
            self.remove_from_category(&previous, &id);
        }

        self.primitives.insert(id.clone(), primitive);

        let members = self.categories.entry(category.clone()).or_default();
        if !members.contains(&id) {
            members.push(id.clone());
        }

        let now = Utc::now();
        let created_at = self
            .metadata
            .get(&id)
            .map(|m| m.created_at)
            .unwrap_or(now);
        self.metadata.insert(
            id.clone(),
            PrimitiveMetadata::from_descriptor(&descriptor, created_at, now),
        );

        info!(primitive_id = %id, category = %category, overwritten, "registered primitive");
    }

    /// Remove a primitive with its metadata and category membership.
    ///
    /// Returns `false` if the id was not registered.
    pub fn unregister(&mut self, id: &str) -> bool {
        let Some(primitive) = self.primitives.shift_remove(id) else {
            debug!(primitive_id = %id, "unregister ignored, primitive not registered");
            return false;
        };
        self.metadata.remove(id);
        let category = primitive.descriptor().category.clone();
        self.remove_from_category(&category, id);

        info!(primitive_id = %id, category = %category, "unregistered primitive");
        true
    }

    fn remove_from_category(&mut self, category: &str, id: &str) {
        if let Some(members) = self.categories.get_mut(category) {
            members.retain(|member| member != id);
            if members.is_empty() {
                self.categories.shift_remove(category);
            }
        }
    }

    /// Look up a primitive by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Primitive>> {
        self.primitives.get(id).cloned()
    }

    /// Returns true if a primitive with this id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.primitives.contains_key(id)
    }

    /// Look up a primitive's metadata by id.
    pub fn get_metadata(&self, id: &str) -> Option<PrimitiveMetadata> {
        self.metadata.get(id).cloned()
    }

    /// Primitives in `category`, in registration order.
    pub fn get_by_category(&self, category: &str) -> Vec<Arc<dyn Primitive>> {
        self.categories
            .get(category)
            .map(|ids| ids.iter().filter_map(|id| self.get(id)).collect())
            .unwrap_or_default()
    }

    /// Ids of every primitive in `category`, in registration order.
    pub fn get_category_ids(&self, category: &str) -> Vec<String> {
        self.categories.get(category).cloned().unwrap_or_default()
    }

    /// Every non-empty category, in first-registration order.
    pub fn get_categories(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    /// Every registered id, in registration order.
    pub fn get_all_ids(&self) -> Vec<String> {
        self.primitives.keys().cloned().collect()
    }

    /// Every registered primitive, in registration order.
    pub fn get_all(&self) -> Vec<Arc<dyn Primitive>> {
        self.primitives.values().cloned().collect()
    }

    /// Case-insensitive substring search over name, description, and tags.
    ///
    /// Matches against the stored metadata, so patches applied through
    /// [`update_metadata`](Self::update_metadata) are searchable. Results
    /// follow registration order; there is no relevance ranking.
    pub fn search(&self, query: &str) -> Vec<Arc<dyn Primitive>> {
        let needle = query.to_lowercase();
        self.primitives
            .iter()
            .filter(|(id, _)| {
                self.metadata.get(id.as_str()).is_some_and(|m| {
                    m.name.to_lowercase().contains(&needle)
                        || m.description.to_lowercase().contains(&needle)
                        || m.tags.iter().any(|t| t.to_lowercase().contains(&needle))
                })
            })
            .map(|(_, p)| Arc::clone(p))
            .collect()
    }

    /// Merge `patch` into a primitive's metadata and refresh `updated_at`.
    ///
    /// Returns `false` if the id is not registered.
    pub fn update_metadata(&mut self, id: &str, patch: MetadataPatch) -> bool {
        match self.metadata.get_mut(id) {
            Some(metadata) => {
                metadata.apply(patch, Utc::now());
                debug!(primitive_id = %id, "updated primitive metadata");
                true
            }
            None => false,
        }
    }

    /// Register a workflow, overwriting any workflow with the same id.
    pub fn register_workflow(&mut self, workflow: Workflow) -> Arc<Workflow> {
        let workflow = Arc::new(workflow);
        info!(
            workflow_id = %workflow.id,
            operations = workflow.operations.len(),
            "registered workflow"
        );
        self.workflows
            .insert(workflow.id.clone(), Arc::clone(&workflow));
        workflow
    }

    /// Remove a workflow. Returns `false` if the id was not registered.
    pub fn unregister_workflow(&mut self, id: &str) -> bool {
        let removed = self.workflows.shift_remove(id).is_some();
        if removed {
            info!(workflow_id = %id, "unregistered workflow");
        }
        removed
    }

    /// Look up a workflow by id.
    pub fn get_workflow(&self, id: &str) -> Option<Arc<Workflow>> {
        self.workflows.get(id).cloned()
    }

    /// Every registered workflow, in registration order.
    pub fn get_all_workflows(&self) -> Vec<Arc<Workflow>> {
        self.workflows.values().cloned().collect()
    }

    /// Returns the number of registered primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Returns true if no primitives are registered.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl Default for PrimitiveRegistry {
    fn default() -> Self {
        Self::new()
    }
}
