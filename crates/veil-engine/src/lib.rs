// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Composability engine for the Veil privacy SDK.
//!
//! Executes single primitives, registered workflows, and ad hoc chains with
//! output-to-input threading, and keeps the most recent result per workflow.

pub mod engine;
pub mod result;

pub use engine::{ComposabilityEngine, EXECUTION_TIME_KEY, OPERATION_ID_KEY};
pub use result::{ChainResult, ExecutionResult, WorkflowValidation};
