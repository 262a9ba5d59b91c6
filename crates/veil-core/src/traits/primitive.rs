// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The privacy primitive capability: a descriptor plus an async `execute`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::VeilError;
use crate::types::Payload;

/// Descriptive fields of a primitive.
///
/// `dependencies` is advisory only: nothing in the registry or engine
/// enforces it. `inputs` and `outputs` list the payload keys the primitive
/// reads and writes; workflows derive their own key lists from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveDescriptor {
    /// Unique id within a registry.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the primitive does.
    #[serde(default)]
    pub description: String,
    /// Category used by the registry's category index (e.g. "encryption").
    pub category: String,
    /// Semantic version string.
    pub version: String,
    /// Author identifier.
    #[serde(default)]
    pub author: String,
    /// Free-form tags matched by registry search.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Ids of primitives this one expects to run after.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Payload keys consumed.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Payload keys produced.
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl PrimitiveDescriptor {
    /// Create a descriptor with version `0.1.0` and every optional field empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: category.into(),
            version: "0.1.0".to_string(),
            author: String::new(),
            tags: BTreeSet::new(),
            dependencies: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }
}

/// A single privacy operation.
///
/// Implementations are usually thin callers of the remote service and must be
/// safe to retry: composed callers may invoke `execute` again with the same
/// input after a failure.
#[async_trait]
pub trait Primitive: Send + Sync {
    /// Returns the primitive's descriptive fields.
    fn descriptor(&self) -> &PrimitiveDescriptor;

    /// Runs the operation against `input` and returns its output fields.
    async fn execute(&self, input: Payload) -> Result<Payload, VeilError>;

    /// Shorthand for `descriptor().id`.
    fn id(&self) -> &str {
        &self.descriptor().id
    }
}
