// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Result types produced by the composability engine.

use serde::{Deserialize, Serialize};
use veil_core::Payload;

/// Outcome of one workflow run.
///
/// `operations_executed` counts steps that started, including a step that
/// started and then failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub workflow_id: String,
    pub success: bool,
    pub outputs: Payload,
    pub execution_time_ms: u64,
    pub operations_executed: usize,
    pub error: Option<String>,
}

impl ExecutionResult {
    pub(crate) fn succeeded(
        workflow_id: &str,
        outputs: Payload,
        execution_time_ms: u64,
        operations_executed: usize,
    ) -> Self {
        Self {
            workflow_id: workflow_id.to_string(),
            success: true,
            outputs,
            execution_time_ms,
            operations_executed,
            error: None,
        }
    }

    pub(crate) fn failed(
        workflow_id: &str,
        error: String,
        execution_time_ms: u64,
        operations_executed: usize,
    ) -> Self {
        Self {
            workflow_id: workflow_id.to_string(),
            success: false,
            outputs: Payload::new(),
            execution_time_ms,
            operations_executed,
            error: Some(error),
        }
    }
}

/// Outcome of an ad hoc operation chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResult {
    /// Each operation's own output, in execution order.
    pub results: Vec<Payload>,
    /// The initial input with every operation's output merged in.
    pub final_output: Payload,
    pub total_operations: usize,
}

/// Static validation report for a workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}
