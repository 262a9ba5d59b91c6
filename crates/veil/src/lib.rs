// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Composability core of the Veil privacy SDK.
//!
//! Re-exports the component crates and provides [`VeilContext`], which wires
//! a registry, engine, plugin manager, bridge, and caches from a
//! [`VeilConfig`].
//!
//! ```no_run
//! # async fn run(invoker: std::sync::Arc<dyn veil::RemoteInvoker>) {
//! let config = veil::veil_config::load_and_validate().expect("config errors");
//! veil::init_tracing(&config.log.level);
//! let ctx = veil::VeilContext::new(&config, invoker).await;
//! # }
//! ```

pub mod context;
pub mod telemetry;

pub use context::VeilContext;
pub use telemetry::init_tracing;

pub use veil_bridge;
pub use veil_cache;
pub use veil_config;
pub use veil_core;
pub use veil_engine;
pub use veil_plugin;
pub use veil_registry;

pub use veil_config::VeilConfig;
pub use veil_core::{Payload, Primitive, PrimitiveDescriptor, RemoteInvoker, VeilError};
