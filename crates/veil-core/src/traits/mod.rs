// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits shared across the Veil workspace.

pub mod primitive;
pub mod remote;

pub use primitive::{Primitive, PrimitiveDescriptor};
pub use remote::{RemoteInvoker, RemotePrimitive, RemoteResponse};
