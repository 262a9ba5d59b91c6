// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Primitive and workflow registry for the Veil privacy SDK.
//!
//! The registry is the single owner of primitive, metadata, and workflow
//! storage. It is shared by the composability engine and the plugin manager
//! through a [`SharedRegistry`] handle.

pub mod metadata;
pub mod registry;
pub mod workflow;

pub use metadata::{MetadataPatch, PrimitiveMetadata};
pub use registry::{PrimitiveRegistry, SharedRegistry};
pub use workflow::{OperationRef, Workflow, WorkflowStep};
