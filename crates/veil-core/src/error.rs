// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Veil privacy SDK.

use thiserror::Error;

/// The primary error type used across the registry, engine, plugin manager,
/// bridge, and cache.
#[derive(Debug, Error)]
pub enum VeilError {
    /// Configuration errors (invalid values, duplicate registrations).
    #[error("configuration error: {0}")]
    Config(String),

    /// A primitive id was not found in the registry.
    #[error("primitive not found: {0}")]
    PrimitiveNotFound(String),

    /// A workflow id was not found in the registry.
    #[error("workflow not found: {0}")]
    WorkflowNotFound(String),

    /// A workflow step referenced an operation that neither the registry nor
    /// the workflow itself could resolve.
    #[error("operation not found: {0}")]
    OperationNotFound(String),

    /// A primitive's `execute` failed.
    #[error("operation {operation_id} failed: {message}")]
    Execution {
        operation_id: String,
        message: String,
    },

    /// A plugin with the same id is already loaded.
    #[error("plugin already loaded: {0}")]
    PluginAlreadyLoaded(String),

    /// A plugin's `init` hook failed.
    #[error("plugin {plugin_id} failed to initialize: {message}")]
    PluginInit { plugin_id: String, message: String },

    /// A plugin's `destroy` hook failed.
    #[error("plugin {plugin_id} failed to shut down: {message}")]
    PluginDestroy { plugin_id: String, message: String },

    /// A bridge id was not found.
    #[error("bridge not found: {0}")]
    BridgeNotFound(String),

    /// A bridge exists but its configuration is missing or disabled.
    #[error("bridge disabled: {0}")]
    BridgeDisabled(String),

    /// The bridge system as a whole is disabled.
    #[error("cross-protocol bridge system is disabled")]
    BridgeSystemDisabled,

    /// The remote privacy service reported a failure.
    #[error("remote call to {endpoint} failed: {message}")]
    Remote { endpoint: String, message: String },

    /// Payload encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VeilError {
    /// Shorthand for an [`VeilError::Execution`] failure raised by a primitive.
    pub fn execution(operation_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            operation_id: operation_id.into(),
            message: message.into(),
        }
    }
}
