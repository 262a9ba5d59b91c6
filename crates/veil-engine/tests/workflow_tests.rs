// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for workflow execution and chaining with mock primitives.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use veil_core::{Payload, Primitive, PrimitiveDescriptor, VeilError};
use veil_engine::{ComposabilityEngine, EXECUTION_TIME_KEY, OPERATION_ID_KEY};
use veil_registry::{PrimitiveRegistry, WorkflowStep};
use veil_test_utils::{EchoPrimitive, FailingPrimitive, FnPrimitive};

fn payload(pairs: &[(&str, serde_json::Value)]) -> Payload {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn three_step_workflow_with_failing_middle_step() {
    let registry = PrimitiveRegistry::shared();
    let first = Arc::new(EchoPrimitive::new("encrypt", "encryption"));
    let second = Arc::new(FailingPrimitive::new("prove", "circuit rejected"));
    let third = Arc::new(EchoPrimitive::new("disclose", "disclosure"));
    {
        let mut reg = registry.write().await;
        reg.register(first.clone());
        reg.register(second.clone());
        reg.register(third.clone());
    }
    let engine = ComposabilityEngine::new(registry);
    engine
        .create_workflow_from_operations(
            "private-transfer",
            "Private transfer",
            "encrypt, prove, disclose",
            vec![
                WorkflowStep::reference("encrypt"),
                WorkflowStep::reference("prove"),
                WorkflowStep::reference("disclose"),
            ],
        )
        .await;

    let result = engine
        .execute_workflow("private-transfer", payload(&[("amount", json!(10))]))
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.operations_executed, 2);
    assert!(result.outputs.is_empty());
    assert!(result.error.as_deref().unwrap().contains("circuit rejected"));
    assert_eq!(first.call_count(), 1);
    assert_eq!(second.call_count(), 1);
    assert_eq!(third.call_count(), 0);

    let recorded = engine.get_execution_result("private-transfer").await.unwrap();
    assert_eq!(recorded, result);
}

#[tokio::test]
async fn workflow_threads_outputs_into_later_steps() {
    let registry = PrimitiveRegistry::shared();
    let double = Arc::new(FnPrimitive::new(
        PrimitiveDescriptor::new("double", "Double", "math"),
        |input| {
            let n = input["n"].as_i64().unwrap_or_default();
            Ok(payload(&[("doubled", json!(n * 2))]))
        },
    ));
    let add = Arc::new(FnPrimitive::new(
        PrimitiveDescriptor::new("add", "Add", "math"),
        |input| {
            let doubled = input["doubled"].as_i64().unwrap_or_default();
            let n = input["n"].as_i64().unwrap_or_default();
            Ok(payload(&[("sum", json!(doubled + n))]))
        },
    ));
    let engine = ComposabilityEngine::new(registry);
    engine
        .create_workflow_from_operations(
            "math",
            "Math",
            "",
            vec![
                WorkflowStep::from(double as Arc<dyn Primitive>),
                WorkflowStep::from(add as Arc<dyn Primitive>),
            ],
        )
        .await;

    let result = engine
        .execute_workflow("math", payload(&[("n", json!(7))]))
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.operations_executed, 2);
    assert_eq!(result.outputs["doubled"], json!(14));
    assert_eq!(result.outputs["sum"], json!(21));
    assert_eq!(result.outputs[OPERATION_ID_KEY], json!("add"));
    assert!(result.outputs.contains_key(EXECUTION_TIME_KEY));
    // Initial input is threaded to steps but not part of the outputs.
    assert!(!result.outputs.contains_key("n"));
}

#[tokio::test]
async fn chain_returns_per_step_results_and_final_output() {
    let engine = ComposabilityEngine::new(PrimitiveRegistry::shared());
    let ops: Vec<Arc<dyn Primitive>> = vec![
        Arc::new(EchoPrimitive::new("a", "test")),
        Arc::new(EchoPrimitive::new("b", "test")),
        Arc::new(EchoPrimitive::new("c", "test")),
    ];

    let chain = engine
        .chain_operations(&ops, payload(&[("seed", json!(1))]))
        .await
        .unwrap();

    assert_eq!(chain.total_operations, 3);
    assert_eq!(chain.results.len(), 3);
    assert_eq!(chain.results[1][OPERATION_ID_KEY], json!("b"));
    for id in ["seed", "a", "b", "c"] {
        assert!(chain.final_output.contains_key(id), "missing {id}");
    }
}

#[tokio::test]
async fn chain_stops_at_first_failure() {
    let engine = ComposabilityEngine::new(PrimitiveRegistry::shared());
    let last = Arc::new(EchoPrimitive::new("last", "test"));
    let ops: Vec<Arc<dyn Primitive>> = vec![
        Arc::new(EchoPrimitive::new("first", "test")),
        Arc::new(FailingPrimitive::new("broken", "boom")),
        last.clone(),
    ];

    let err = engine.chain_operations(&ops, Payload::new()).await.unwrap_err();
    assert!(matches!(err, VeilError::Execution { ref operation_id, .. } if operation_id == "broken"));
    assert_eq!(last.call_count(), 0);
}

#[tokio::test]
async fn validation_rejects_unregistered_steps() {
    let registry = PrimitiveRegistry::shared();
    registry
        .write()
        .await
        .register(Arc::new(EchoPrimitive::new("known", "test")));
    let engine = ComposabilityEngine::new(registry);

    let workflow = engine
        .create_workflow_from_operations(
            "wf",
            "Workflow",
            "",
            vec![WorkflowStep::reference("known"), WorkflowStep::reference("ghost")],
        )
        .await;

    let validation = engine.validate_workflow(&workflow).await;
    assert!(!validation.is_valid);
    assert_eq!(validation.errors.len(), 1);
    assert!(validation.errors[0].contains("ghost"));
}

#[tokio::test(start_paused = true)]
async fn delayed_steps_run_one_after_another() {
    let registry = PrimitiveRegistry::shared();
    let slow = EchoPrimitive::new("commit", "commitment")
        .with_delay(Duration::from_millis(100))
        .shared();
    let slower = EchoPrimitive::new("prove", "zero-knowledge")
        .with_delay(Duration::from_millis(250))
        .shared();
    registry.write().await.register(slow.clone());

    let engine = ComposabilityEngine::new(registry);
    engine
        .create_workflow_from_operations(
            "commit-then-prove",
            "Commit then prove",
            "",
            vec![
                WorkflowStep::reference("commit"),
                WorkflowStep::Embedded(slower.clone()),
            ],
        )
        .await;

    let started = tokio::time::Instant::now();
    let result = engine
        .execute_workflow("commit-then-prove", Payload::new())
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.operations_executed, 2);
    assert_eq!(result.outputs["commit"], json!(true));
    assert_eq!(result.outputs["prove"], json!(true));
    assert!(started.elapsed() >= Duration::from_millis(350));
    assert_eq!(slow.call_count(), 1);
    assert_eq!(slower.call_count(), 1);
}
