// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Veil privacy SDK.
//!
//! This crate provides the error type, payload type, and capability traits
//! that the registry, engine, plugin manager, bridge, and cache build on.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VeilError;
pub use traits::{Primitive, PrimitiveDescriptor, RemoteInvoker, RemotePrimitive, RemoteResponse};
pub use types::{merge_payload, Payload, RemoteEndpoint};
