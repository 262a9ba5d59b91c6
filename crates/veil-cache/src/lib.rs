// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caching for the Veil privacy SDK: a lazy-expiry TTL store, memoization of
//! async operations, a crypto result cache, and windowed batch decryption.

pub mod batch;
pub mod crypto;
pub mod memoize;
pub mod ttl;

pub use batch::{decrypt_batch, DecryptedItem, EncryptedItem, DEFAULT_DECRYPT_WINDOW};
pub use crypto::{cache_key, CryptoCache, CryptoClient};
pub use memoize::Memoized;
pub use ttl::{TtlCache, DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};
