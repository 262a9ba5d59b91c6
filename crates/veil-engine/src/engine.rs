// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequential composition of privacy primitives.
//!
//! The [`ComposabilityEngine`] runs single operations, registered workflows,
//! and ad hoc chains. Steps run strictly one after another: each step sees the
//! initial input with every earlier step's output merged in.
//!
//! Failure handling differs by entry point:
//! - [`ComposabilityEngine::execute_operation`] and
//!   [`ComposabilityEngine::chain_operations`] return the step's error.
//! - [`ComposabilityEngine::execute_workflow`] captures it into a failed
//!   [`ExecutionResult`] and only errors when the workflow id is unknown.

use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use veil_core::{merge_payload, Payload, Primitive, VeilError};
use veil_registry::{SharedRegistry, Workflow, WorkflowStep};

use crate::result::{ChainResult, ExecutionResult, WorkflowValidation};

/// Output key carrying an operation's wall-clock duration in milliseconds.
pub const EXECUTION_TIME_KEY: &str = "_executionTime";

/// Output key carrying the id of the operation that produced the output.
pub const OPERATION_ID_KEY: &str = "_operationId";

/// Executes primitives and workflows against a shared registry.
///
/// The engine owns only its execution history: the most recent result per
/// workflow id.
pub struct ComposabilityEngine {
    registry: SharedRegistry,
    history: RwLock<IndexMap<String, ExecutionResult>>,
}

impl ComposabilityEngine {
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            history: RwLock::new(IndexMap::new()),
        }
    }

    /// The registry this engine resolves primitives and workflows against.
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Execute one operation, tagging its output with timing and origin.
    pub async fn execute_operation(
        &self,
        operation: &dyn Primitive,
        input: Payload,
    ) -> Result<Payload, VeilError> {
        let started = Instant::now();
        match operation.execute(input).await {
            Ok(mut output) => {
                let duration_ms = elapsed_ms(started);
                output.insert(EXECUTION_TIME_KEY.to_string(), json!(duration_ms));
                output.insert(OPERATION_ID_KEY.to_string(), json!(operation.id()));
                debug!(operation_id = %operation.id(), duration_ms, "operation completed");
                Ok(output)
            }
            Err(err) => {
                error!(operation_id = %operation.id(), error = %err, "operation failed");
                Err(err)
            }
        }
    }

    /// Run a registered workflow.
    ///
    /// Returns `Err(WorkflowNotFound)` if the id is not registered. Every
    /// other failure is reported through a result with `success == false`,
    /// empty `outputs`, and the number of steps that started.
    pub async fn execute_workflow(
        &self,
        workflow_id: &str,
        input: Payload,
    ) -> Result<ExecutionResult, VeilError> {
        let workflow = self
            .registry
            .read()
            .await
            .get_workflow(workflow_id)
            .ok_or_else(|| VeilError::WorkflowNotFound(workflow_id.to_string()))?;

        let started = Instant::now();
        info!(
            workflow_id = %workflow_id,
            steps = workflow.operations.len(),
            "executing workflow"
        );

        let mut current = input;
        let mut outputs = Payload::new();
        let mut operations_executed = 0;

        for step in &workflow.operations {
            let outcome = match self.resolve_step(step).await {
                Some(primitive) => {
                    operations_executed += 1;
                    self.execute_operation(primitive.as_ref(), current.clone())
                        .await
                }
                None => Err(VeilError::OperationNotFound(step.id().to_string())),
            };

            match outcome {
                Ok(output) => {
                    merge_payload(&mut current, &output);
                    merge_payload(&mut outputs, &output);
                }
                Err(err) => {
                    warn!(
                        workflow_id = %workflow_id,
                        step = %step.id(),
                        operations_executed,
                        error = %err,
                        "workflow failed"
                    );
                    let result = ExecutionResult::failed(
                        workflow_id,
                        err.to_string(),
                        elapsed_ms(started),
                        operations_executed,
                    );
                    self.record(result.clone()).await;
                    return Ok(result);
                }
            }
        }

        let result = ExecutionResult::succeeded(
            workflow_id,
            outputs,
            elapsed_ms(started),
            operations_executed,
        );
        info!(
            workflow_id = %workflow_id,
            operations_executed,
            duration_ms = result.execution_time_ms,
            "workflow completed"
        );
        self.record(result.clone()).await;
        Ok(result)
    }

    /// Run an unregistered list of operations with the same data threading as
    /// a workflow. The first failing step's error is returned as is.
    pub async fn chain_operations(
        &self,
        operations: &[Arc<dyn Primitive>],
        initial_input: Payload,
    ) -> Result<ChainResult, VeilError> {
        let mut current = initial_input;
        let mut results = Vec::with_capacity(operations.len());

        for operation in operations {
            let output = self
                .execute_operation(operation.as_ref(), current.clone())
                .await?;
            merge_payload(&mut current, &output);
            results.push(output);
        }

        Ok(ChainResult {
            total_operations: results.len(),
            results,
            final_output: current,
        })
    }

    /// Build a workflow from `operations`, register it, and return it.
    pub async fn create_workflow_from_operations(
        &self,
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        operations: Vec<WorkflowStep>,
    ) -> Arc<Workflow> {
        let workflow = Workflow::new(id, name, description, operations);
        self.registry.write().await.register_workflow(workflow)
    }

    /// Check a workflow without running it.
    ///
    /// Reports an empty operation list and every step id that is not
    /// registered in the registry.
    pub async fn validate_workflow(&self, workflow: &Workflow) -> WorkflowValidation {
        let mut errors = Vec::new();

        if workflow.operations.is_empty() {
            errors.push("workflow must contain at least one operation".to_string());
        }

        let registry = self.registry.read().await;
        for step in &workflow.operations {
            if !registry.contains(step.id()) {
                errors.push(format!("operation `{}` is not registered", step.id()));
            }
        }

        WorkflowValidation {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// The most recent result for `workflow_id`, if it has run.
    pub async fn get_execution_result(&self, workflow_id: &str) -> Option<ExecutionResult> {
        self.history.read().await.get(workflow_id).cloned()
    }

    /// The most recent result of every workflow that has run.
    pub async fn get_all_execution_results(&self) -> Vec<ExecutionResult> {
        self.history.read().await.values().cloned().collect()
    }

    pub async fn clear_execution_history(&self) {
        self.history.write().await.clear();
    }

    /// Prefer the registered primitive; fall back to the one embedded in the step.
    async fn resolve_step(&self, step: &WorkflowStep) -> Option<Arc<dyn Primitive>> {
        let registered = self.registry.read().await.get(step.id());
        registered.or_else(|| step.embedded())
    }

    async fn record(&self, result: ExecutionResult) {
        self.history
            .write()
            .await
            .insert(result.workflow_id.clone(), result);
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use veil_core::PrimitiveDescriptor;
    use veil_registry::{OperationRef, PrimitiveRegistry};

    /// Writes `value` under `key`, or fails when `fail` is set.
    struct SetField {
        descriptor: PrimitiveDescriptor,
        key: &'static str,
        value: serde_json::Value,
        fail: bool,
    }

    #[async_trait]
    impl Primitive for SetField {
        fn descriptor(&self) -> &PrimitiveDescriptor {
            &self.descriptor
        }

        async fn execute(&self, _input: Payload) -> Result<Payload, VeilError> {
            if self.fail {
                return Err(VeilError::execution(&self.descriptor.id, "step exploded"));
            }
            let mut out = Payload::new();
            out.insert(self.key.to_string(), self.value.clone());
            Ok(out)
        }
    }

    fn set_field(id: &str, key: &'static str, value: serde_json::Value) -> Arc<dyn Primitive> {
        Arc::new(SetField {
            descriptor: PrimitiveDescriptor::new(id, id, "test"),
            key,
            value,
            fail: false,
        })
    }

    fn failing(id: &str) -> Arc<dyn Primitive> {
        Arc::new(SetField {
            descriptor: PrimitiveDescriptor::new(id, id, "test"),
            key: "unused",
            value: json!(null),
            fail: true,
        })
    }

    #[tokio::test]
    async fn execute_operation_tags_output() {
        let engine = ComposabilityEngine::new(PrimitiveRegistry::shared());
        let op = set_field("tagger", "k", json!(1));

        let out = engine.execute_operation(op.as_ref(), Payload::new()).await.unwrap();
        assert_eq!(out["k"], json!(1));
        assert_eq!(out[OPERATION_ID_KEY], json!("tagger"));
        assert!(out[EXECUTION_TIME_KEY].is_u64());
    }

    #[tokio::test]
    async fn execute_operation_propagates_failure() {
        let engine = ComposabilityEngine::new(PrimitiveRegistry::shared());
        let err = engine
            .execute_operation(failing("bad").as_ref(), Payload::new())
            .await
            .unwrap_err();
        assert!(matches!(err, VeilError::Execution { .. }));
    }

    #[tokio::test]
    async fn unknown_workflow_is_an_error() {
        let engine = ComposabilityEngine::new(PrimitiveRegistry::shared());
        let err = engine
            .execute_workflow("nope", Payload::new())
            .await
            .unwrap_err();
        assert!(matches!(err, VeilError::WorkflowNotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn registered_primitive_wins_over_embedded() {
        let registry = PrimitiveRegistry::shared();
        registry
            .write()
            .await
            .register(set_field("shared-id", "source", json!("registry")));
        let engine = ComposabilityEngine::new(Arc::clone(&registry));

        engine
            .create_workflow_from_operations(
                "wf",
                "WF",
                "",
                vec![WorkflowStep::Embedded(set_field(
                    "shared-id",
                    "source",
                    json!("embedded"),
                ))],
            )
            .await;

        let result = engine.execute_workflow("wf", Payload::new()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.outputs["source"], json!("registry"));
    }

    #[tokio::test]
    async fn embedded_primitive_used_when_unregistered() {
        let engine = ComposabilityEngine::new(PrimitiveRegistry::shared());
        engine
            .create_workflow_from_operations(
                "wf",
                "WF",
                "",
                vec![WorkflowStep::Embedded(set_field("local", "x", json!(7)))],
            )
            .await;

        let result = engine.execute_workflow("wf", Payload::new()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.outputs["x"], json!(7));
        assert_eq!(result.operations_executed, 1);
    }

    #[tokio::test]
    async fn unresolvable_reference_fails_without_counting_the_step() {
        let registry = PrimitiveRegistry::shared();
        registry.write().await.register(set_field("a", "a", json!(1)));
        let engine = ComposabilityEngine::new(Arc::clone(&registry));
        engine
            .create_workflow_from_operations(
                "wf",
                "WF",
                "",
                vec![
                    WorkflowStep::reference("a"),
                    WorkflowStep::reference("ghost"),
                ],
            )
            .await;

        let result = engine.execute_workflow("wf", Payload::new()).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.operations_executed, 1);
        assert!(result.outputs.is_empty());
        assert!(result.error.unwrap().contains("ghost"));
    }

    #[tokio::test]
    async fn empty_workflow_fails_validation_but_executes() {
        let engine = ComposabilityEngine::new(PrimitiveRegistry::shared());
        let wf = engine
            .create_workflow_from_operations("empty", "Empty", "", vec![])
            .await;

        let validation = engine.validate_workflow(&wf).await;
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.len(), 1);

        let result = engine.execute_workflow("empty", Payload::new()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.operations_executed, 0);
    }

    #[tokio::test]
    async fn validation_names_every_unregistered_step() {
        let registry = PrimitiveRegistry::shared();
        registry.write().await.register(set_field("known", "k", json!(1)));
        let engine = ComposabilityEngine::new(Arc::clone(&registry));

        let wf = Workflow::new(
            "wf",
            "WF",
            "",
            vec![
                WorkflowStep::reference("known"),
                WorkflowStep::Reference(OperationRef::new("missing-1")),
                WorkflowStep::reference("missing-2"),
            ],
        );
        let validation = engine.validate_workflow(&wf).await;
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.len(), 2);
        assert!(validation.errors[0].contains("missing-1"));
        assert!(validation.errors[1].contains("missing-2"));
    }

    #[tokio::test]
    async fn history_keeps_latest_run_per_workflow() {
        let engine = ComposabilityEngine::new(PrimitiveRegistry::shared());
        engine
            .create_workflow_from_operations(
                "wf",
                "WF",
                "",
                vec![WorkflowStep::Embedded(set_field("s", "n", json!(1)))],
            )
            .await;

        engine.execute_workflow("wf", Payload::new()).await.unwrap();
        engine.execute_workflow("wf", Payload::new()).await.unwrap();

        assert_eq!(engine.get_all_execution_results().await.len(), 1);
        assert!(engine.get_execution_result("wf").await.unwrap().success);

        engine.clear_execution_history().await;
        assert!(engine.get_execution_result("wf").await.is_none());
    }
}
