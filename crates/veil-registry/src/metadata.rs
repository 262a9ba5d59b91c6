// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry-owned metadata projection of registered primitives.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use veil_core::PrimitiveDescriptor;

/// Descriptive fields of a registered primitive plus registry timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub version: String,
    pub author: String,
    pub tags: BTreeSet<String>,
    pub dependencies: Vec<String>,
    /// When the id was first registered.
    pub created_at: DateTime<Utc>,
    /// When the primitive or its metadata last changed.
    pub updated_at: DateTime<Utc>,
}

impl PrimitiveMetadata {
    pub(crate) fn from_descriptor(
        descriptor: &PrimitiveDescriptor,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            category: descriptor.category.clone(),
            version: descriptor.version.clone(),
            author: descriptor.author.clone(),
            tags: descriptor.tags.clone(),
            dependencies: descriptor.dependencies.clone(),
            created_at,
            updated_at,
        }
    }

    pub(crate) fn apply(&mut self, patch: MetadataPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(version) = patch.version {
            self.version = version;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(dependencies) = patch.dependencies {
            self.dependencies = dependencies;
        }
        self.updated_at = now;
    }
}

/// Partial update for [`PrimitiveMetadata`]. `None` fields are left untouched.
///
/// The category is not patchable; it changes only by re-registering the
/// primitive, which also moves it in the category index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub tags: Option<BTreeSet<String>>,
    pub dependencies: Option<Vec<String>>,
}
