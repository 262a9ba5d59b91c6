// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Veil integration tests.
//!
//! Provides mock primitives, plugins, bridge operations, and a mock remote
//! service for fast, deterministic tests without external services.
//!
//! # Components
//!
//! - [`EchoPrimitive`], [`FailingPrimitive`], [`FnPrimitive`] - Mock primitives with call counts
//! - [`MockPlugin`] - Plugin with switchable init/destroy failures
//! - [`MockBridge`] - Bridge operation stamping its protocol pair
//! - [`MockRemote`] - Remote invoker with a fake cipher, latency, and in-flight accounting

pub mod mock_bridge;
pub mod mock_plugin;
pub mod mock_primitive;
pub mod mock_remote;

pub use mock_bridge::MockBridge;
pub use mock_plugin::MockPlugin;
pub use mock_primitive::{EchoPrimitive, FailingPrimitive, FnPrimitive};
pub use mock_remote::{fake_ciphertext, MockRemote};
