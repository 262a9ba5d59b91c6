// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cross-protocol bridge registry and router.

pub mod bridge;

pub use bridge::{BridgeConfig, BridgeConfigPatch, BridgeOperation, CrossProtocolBridge};
