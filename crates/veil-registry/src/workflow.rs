// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workflow definitions: ordered sequences of primitives run as one unit.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use veil_core::Primitive;

/// A lightweight reference to a primitive, resolved against the registry at
/// execution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRef {
    pub id: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl OperationRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

/// One operation of a workflow.
#[derive(Clone)]
pub enum WorkflowStep {
    /// A full primitive carried by the workflow. Used only when the registry
    /// has no primitive registered under the same id.
    Embedded(Arc<dyn Primitive>),
    /// A reference that must resolve in the registry.
    Reference(OperationRef),
}

impl WorkflowStep {
    /// Reference a registered primitive by id.
    pub fn reference(id: impl Into<String>) -> Self {
        Self::Reference(OperationRef::new(id))
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Embedded(primitive) => primitive.id(),
            Self::Reference(op) => &op.id,
        }
    }

    /// Payload keys the step declares as inputs.
    pub fn inputs(&self) -> &[String] {
        match self {
            Self::Embedded(primitive) => &primitive.descriptor().inputs,
            Self::Reference(op) => &op.inputs,
        }
    }

    /// Payload keys the step declares as outputs.
    pub fn outputs(&self) -> &[String] {
        match self {
            Self::Embedded(primitive) => &primitive.descriptor().outputs,
            Self::Reference(op) => &op.outputs,
        }
    }

    /// The embedded primitive, if this step carries one.
    pub fn embedded(&self) -> Option<Arc<dyn Primitive>> {
        match self {
            Self::Embedded(primitive) => Some(Arc::clone(primitive)),
            Self::Reference(_) => None,
        }
    }
}

impl From<Arc<dyn Primitive>> for WorkflowStep {
    fn from(primitive: Arc<dyn Primitive>) -> Self {
        Self::Embedded(primitive)
    }
}

impl From<OperationRef> for WorkflowStep {
    fn from(op: OperationRef) -> Self {
        Self::Reference(op)
    }
}

impl std::fmt::Debug for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded(primitive) => f
                .debug_tuple("Embedded")
                .field(&primitive.id())
                .finish(),
            Self::Reference(op) => f.debug_tuple("Reference").field(op).finish(),
        }
    }
}

/// A named, ordered sequence of operations.
///
/// `inputs` are the first operation's declared inputs and `outputs` are the
/// last operation's declared outputs.
#[derive(Debug, Clone)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub operations: Vec<WorkflowStep>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl Workflow {
    /// Build a workflow, deriving its input/output key lists from the first
    /// and last operation.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        operations: Vec<WorkflowStep>,
    ) -> Self {
        let inputs = operations
            .first()
            .map(|op| op.inputs().to_vec())
            .unwrap_or_default();
        let outputs = operations
            .last()
            .map(|op| op.outputs().to_vec())
            .unwrap_or_default();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            operations,
            inputs,
            outputs,
        }
    }

    /// Ids of every operation, in execution order.
    pub fn operation_ids(&self) -> Vec<&str> {
        self.operations.iter().map(WorkflowStep::id).collect()
    }
}
