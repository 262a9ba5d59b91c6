// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boundary to the remote privacy service.
//!
//! Every real cryptographic, ZK, MPC, and FHE operation happens behind
//! [`RemoteInvoker::invoke`]. [`RemotePrimitive`] adapts a single endpoint into
//! a registrable [`Primitive`] by JSON-encoding its input and decoding the
//! response data.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::VeilError;
use crate::traits::primitive::{Primitive, PrimitiveDescriptor};
use crate::types::Payload;

/// Raw response from the remote service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResponse {
    pub success: bool,
    pub data: Option<Vec<u8>>,
    pub error: Option<String>,
}

impl RemoteResponse {
    /// A successful response carrying `data`.
    pub fn ok(data: impl Into<Vec<u8>>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
        }
    }

    /// A failed response carrying `error`.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Converts the response into its data bytes, or a [`VeilError::Remote`].
    pub fn into_data(self, endpoint: &str) -> Result<Vec<u8>, VeilError> {
        if !self.success {
            return Err(VeilError::Remote {
                endpoint: endpoint.to_string(),
                message: self.error.unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        Ok(self.data.unwrap_or_default())
    }
}

/// The single call through which privacy operations reach the remote service.
///
/// Transport-level failures are returned as `Err`; service-level failures come
/// back as a [`RemoteResponse`] with `success == false`.
#[async_trait]
pub trait RemoteInvoker: Send + Sync {
    async fn invoke(&self, endpoint: &str, payload: Vec<u8>) -> Result<RemoteResponse, VeilError>;
}

/// A primitive that forwards its input to one remote endpoint.
pub struct RemotePrimitive {
    descriptor: PrimitiveDescriptor,
    endpoint: String,
    invoker: Arc<dyn RemoteInvoker>,
}

impl RemotePrimitive {
    pub fn new(
        descriptor: PrimitiveDescriptor,
        endpoint: impl Into<String>,
        invoker: Arc<dyn RemoteInvoker>,
    ) -> Self {
        Self {
            descriptor,
            endpoint: endpoint.into(),
            invoker,
        }
    }

    /// The endpoint this primitive calls.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Primitive for RemotePrimitive {
    fn descriptor(&self) -> &PrimitiveDescriptor {
        &self.descriptor
    }

    async fn execute(&self, input: Payload) -> Result<Payload, VeilError> {
        let body = serde_json::to_vec(&input)?;
        debug!(endpoint = %self.endpoint, bytes = body.len(), "forwarding primitive call");

        let data = self
            .invoker
            .invoke(&self.endpoint, body)
            .await?
            .into_data(&self.endpoint)?;

        if data.is_empty() {
            return Ok(Payload::new());
        }
        match serde_json::from_slice::<serde_json::Value>(&data)? {
            serde_json::Value::Object(map) => Ok(map),
            other => {
                // Scalar responses are wrapped so they still thread into later steps.
                let mut map = Payload::new();
                map.insert("result".to_string(), other);
                Ok(map)
            }
        }
    }
}
