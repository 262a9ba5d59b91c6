// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock remote privacy service.
//!
//! `MockRemote` implements [`RemoteInvoker`] with a reversible fake cipher so
//! crypto and batch tests can run without a network:
//!
//! - `encrypt` answers `enc(<password>):<data>`.
//! - `decrypt` strips that prefix, or fails if the password does not match.
//! - Every other endpoint echoes the request body back.
//!
//! It tracks how many calls are in flight at once and the peak, so tests can
//! assert concurrency bounds.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use veil_core::{RemoteInvoker, RemoteResponse, VeilError};

type LatencyFn = Box<dyn Fn(usize) -> Duration + Send + Sync>;

/// Fake ciphertext for `data` under `password`.
pub fn fake_ciphertext(data: &str, password: &str) -> String {
    format!("enc({password}):{data}")
}

pub struct MockRemote {
    latency: Option<LatencyFn>,
    failing_data: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    sequence: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            latency: None,
            failing_data: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            sequence: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Delay each call by `latency(n)`, where `n` is the zero-based call number.
    pub fn with_latency(mut self, latency: impl Fn(usize) -> Duration + Send + Sync + 'static) -> Self {
        self.latency = Some(Box::new(latency));
        self
    }

    /// Make any call whose `data` field equals `data` fail.
    pub async fn fail_on(&self, data: &str) {
        self.failing_data.lock().await.insert(data.to_string());
    }

    /// Endpoints called so far, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub fn call_count(&self) -> usize {
        self.sequence.load(Ordering::SeqCst)
    }

    /// The largest number of calls that were in flight at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn respond(&self, endpoint: &str, payload: Vec<u8>) -> Result<RemoteResponse, VeilError> {
        let body: serde_json::Value = serde_json::from_slice(&payload)?;
        let data = body["data"].as_str().unwrap_or_default();
        let password = body["password"].as_str().unwrap_or_default();

        if self.failing_data.lock().await.contains(data) {
            return Ok(RemoteResponse::failure(format!("rejected {data}")));
        }

        let response = match endpoint.rsplit('/').next().unwrap_or(endpoint) {
            "encrypt" => RemoteResponse::ok(fake_ciphertext(data, password)),
            "decrypt" => match data.strip_prefix(&format!("enc({password}):")) {
                Some(plain) => RemoteResponse::ok(plain),
                None => RemoteResponse::failure("wrong password"),
            },
            _ => RemoteResponse::ok(payload),
        };
        Ok(response)
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteInvoker for MockRemote {
    async fn invoke(&self, endpoint: &str, payload: Vec<u8>) -> Result<RemoteResponse, VeilError> {
        let n = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().await.push(endpoint.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = &self.latency {
            let delay = latency(n);
            debug!(endpoint, call = n, delay_ms = delay.as_millis() as u64, "mock remote call");
            tokio::time::sleep(delay).await;
        }

        let response = self.respond(endpoint, payload).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        response
    }
}
