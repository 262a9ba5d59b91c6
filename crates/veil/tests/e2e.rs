// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving every component through a `VeilContext`.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use veil::veil_bridge::BridgeConfigPatch;
use veil::veil_cache::{EncryptedItem, Memoized};
use veil::veil_config::{load_and_validate_str, VeilConfig};
use veil::veil_core::{Payload, Primitive, PrimitiveDescriptor, RemoteEndpoint, VeilError};
use veil::veil_plugin::LoadOutcome;
use veil::veil_registry::WorkflowStep;
use veil::VeilContext;
use tracing_test::traced_test;
use veil_test_utils::{fake_ciphertext, EchoPrimitive, FailingPrimitive, MockBridge, MockPlugin, MockRemote};

async fn context() -> (VeilContext, Arc<MockRemote>) {
    let remote = Arc::new(MockRemote::new());
    let ctx = VeilContext::new(&VeilConfig::default(), remote.clone()).await;
    (ctx, remote)
}

#[tokio::test]
async fn registering_same_id_twice_keeps_one_entry() {
    let (ctx, _) = context().await;
    let mut registry = ctx.registry().write().await;

    registry.register(Arc::new(EchoPrimitive::new("aes", "encryption")));
    registry.register(Arc::new(EchoPrimitive::new("aes", "encryption")));

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get_category_ids("encryption"), vec!["aes"]);
}

#[tokio::test]
async fn loading_plugin_twice_fails_without_duplicating_primitives() {
    let (ctx, _) = context().await;
    let plugin = Arc::new(MockPlugin::with_echo_primitives("zk", "zero-knowledge", &["prove", "verify"]));

    assert_eq!(ctx.plugins().load_plugin(plugin.clone()).await.unwrap(), LoadOutcome::Loaded);
    let count = ctx.registry().read().await.len();

    let err = ctx.plugins().load_plugin(plugin.clone()).await.unwrap_err();
    assert!(matches!(err, VeilError::PluginAlreadyLoaded(ref id) if id == "zk"));
    assert_eq!(ctx.registry().read().await.len(), count);
    assert_eq!(plugin.init_calls(), 1);
}

#[tokio::test]
async fn plugin_workflow_with_failing_middle_step() {
    let (ctx, _) = context().await;
    let plugin = Arc::new(MockPlugin::new(
        "suite",
        vec![
            Arc::new(EchoPrimitive::new("encrypt", "encryption")) as Arc<dyn Primitive>,
            Arc::new(FailingPrimitive::new("prove", "witness missing")),
            Arc::new(EchoPrimitive::new("disclose", "disclosure")),
        ],
    ));
    ctx.plugins().load_plugin(plugin).await.unwrap();

    ctx.engine()
        .create_workflow_from_operations(
            "flow",
            "Flow",
            "",
            ["encrypt", "prove", "disclose"]
                .into_iter()
                .map(WorkflowStep::reference)
                .collect(),
        )
        .await;

    let result = ctx.engine().execute_workflow("flow", Payload::new()).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.operations_executed, 2);
    assert!(result.outputs.is_empty());
}

#[tokio::test(start_paused = true)]
async fn cached_value_expires_on_read_without_sweep() {
    let config = load_and_validate_str("[cache]\nsweep_enabled = false\n").unwrap();
    let ctx = VeilContext::new(&config, Arc::new(MockRemote::new())).await;
    let cache = ctx.cache();

    cache.set_with_ttl("k", json!("v"), Duration::from_millis(100)).await;
    assert_eq!(cache.get("k").await, Some(json!("v")));

    tokio::time::advance(Duration::from_millis(150)).await;
    assert_eq!(cache.get("k").await, None);
    assert!(!cache.has("k").await);
}

#[tokio::test(start_paused = true)]
async fn batch_decrypt_uses_configured_window() {
    let remote = Arc::new(
        MockRemote::new().with_latency(|n| Duration::from_millis(10 + (n as u64 * 37) % 50)),
    );
    let config = load_and_validate_str("[decrypt]\nwindow_size = 5\n").unwrap();
    let ctx = VeilContext::new(&config, remote.clone()).await;

    let items: Vec<EncryptedItem> = (0..12)
        .map(|i| EncryptedItem {
            id: i.to_string(),
            data: fake_ciphertext(&format!("secret-{i}"), "pw"),
        })
        .collect();

    let out = ctx.decrypt_batch(&items, "pw").await.unwrap();
    let ids: Vec<String> = out.iter().map(|d| d.id.clone()).collect();
    let expected: Vec<String> = (0..12).map(|i| i.to_string()).collect();
    assert_eq!(ids, expected);
    assert_eq!(out[11].data, "secret-11");
    assert!(remote.peak_in_flight() <= 5);
}

#[tokio::test]
async fn unregister_unknown_id_leaves_categories_unchanged() {
    let (ctx, _) = context().await;
    let mut registry = ctx.registry().write().await;
    registry.register(Arc::new(EchoPrimitive::new("aes", "encryption")));
    let before = registry.get_categories();

    assert!(!registry.unregister("missing"));
    assert_eq!(registry.get_categories(), before);
    assert_eq!(registry.get_category_ids("encryption"), vec!["aes"]);
}

#[tokio::test]
async fn reload_with_failing_init_leaves_plugin_unloaded() {
    let (ctx, _) = context().await;
    let plugin = Arc::new(MockPlugin::with_echo_primitives("mpc", "mpc", &["mpc-sum"]));
    ctx.plugins().load_plugin(plugin.clone()).await.unwrap();

    plugin.set_fail_init(true);
    assert!(!ctx.plugins().reload_plugin("mpc").await);
    assert!(!ctx.plugins().is_plugin_loaded("mpc").await);
    assert!(!ctx.registry().read().await.contains("mpc-sum"));
    assert_eq!(plugin.destroy_calls(), 1);
}

#[tokio::test]
async fn plugins_disabled_in_config_are_skipped() {
    let config = load_and_validate_str("[plugins.fhe]\nenabled = false\n").unwrap();
    let ctx = VeilContext::new(&config, Arc::new(MockRemote::new())).await;
    let plugin = Arc::new(MockPlugin::with_echo_primitives("fhe", "fhe", &["fhe-add"]));

    let outcome = ctx.plugins().load_plugin(plugin.clone()).await.unwrap();
    assert_eq!(outcome, LoadOutcome::SkippedDisabled);
    assert!(ctx.registry().read().await.is_empty());
    assert_eq!(plugin.init_calls(), 0);
}

#[tokio::test]
async fn bridge_follows_config_and_runtime_toggles() {
    let config = load_and_validate_str("[bridge]\nenabled = false\n").unwrap();
    let ctx = VeilContext::new(&config, Arc::new(MockRemote::new())).await;
    let op = Arc::new(MockBridge::new("evm-sol", "evm", "solana"));
    ctx.bridge().register_bridge(op.clone(), op.config()).await;

    let err = ctx.bridge().execute_bridge("evm-sol", Payload::new()).await.unwrap_err();
    assert!(matches!(err, VeilError::BridgeSystemDisabled));

    ctx.bridge().set_enabled(true);
    let out = ctx.bridge().execute_bridge("evm-sol", Payload::new()).await.unwrap();
    assert_eq!(out["bridged_to"], json!("solana"));

    ctx.bridge()
        .update_bridge_config(
            "evm-sol",
            BridgeConfigPatch {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .await;
    assert!(ctx.bridge().get_bridges_between_protocols("evm", "solana").await.is_empty());
    assert_eq!(op.call_count(), 1);
}

#[tokio::test]
async fn remote_primitive_honours_endpoint_prefix() {
    let config = load_and_validate_str("[remote]\nendpoint_prefix = \"v2/\"\n").unwrap();
    let remote = Arc::new(MockRemote::new());
    let ctx = VeilContext::new(&config, remote.clone()).await;

    let prove = ctx.remote_primitive(
        PrimitiveDescriptor::new("zk-prove", "ZK Prove", "zero-knowledge"),
        RemoteEndpoint::ZkProve,
    );
    let mut input = Payload::new();
    input.insert("circuit".into(), json!("transfer"));

    let out = prove.execute(input).await.unwrap();
    assert_eq!(out["circuit"], json!("transfer"));
    assert_eq!(remote.calls().await, vec!["v2/zk/prove"]);

    ctx.crypto().encrypt("x", "pw").await.unwrap();
    assert_eq!(remote.calls().await[1], "v2/encrypt");
}

#[tokio::test]
async fn memoized_remote_call_hits_service_once() {
    let (ctx, remote) = context().await;
    let crypto = ctx.crypto().clone();
    let memo = Memoized::new(Arc::clone(ctx.cache()), move |data: String| {
        let crypto = crypto.clone();
        async move {
            let cipher = crypto.encrypt(&data, "pw").await?;
            Ok::<_, VeilError>(json!(cipher))
        }
    })
    .with_key(|data: &String| format!("encrypt:{data}"));

    assert_eq!(memo.call("a".into()).await.unwrap(), json!("enc(pw):a"));
    assert_eq!(memo.call("a".into()).await.unwrap(), json!("enc(pw):a"));
    assert_eq!(remote.call_count(), 1);
}

#[tokio::test]
async fn contexts_are_isolated() {
    let (first, _) = context().await;
    let (second, _) = context().await;

    first
        .registry()
        .write()
        .await
        .register(Arc::new(EchoPrimitive::new("aes", "encryption")));
    first.bridge().set_enabled(false);

    assert!(second.registry().read().await.is_empty());
    assert!(second.bridge().is_enabled());
}

#[tokio::test]
async fn shutdown_stops_sweeps_but_keeps_values() {
    let (ctx, _) = context().await;
    ctx.cache().set("k", json!(1)).await;
    assert!(ctx.cache().has_sweeper());

    ctx.shutdown();
    assert!(!ctx.cache().has_sweeper());
    assert_eq!(ctx.cache().get("k").await, Some(json!(1)));
}

#[tokio::test]
#[traced_test]
async fn context_logs_initialization() {
    let config = load_and_validate_str("[plugins.zk]\nenabled = true\n").unwrap();
    let _ctx = VeilContext::new(&config, Arc::new(MockRemote::new())).await;
    assert!(logs_contain("veil context initialized"));
    assert!(logs_contain("plugin preconfigured"));
}
