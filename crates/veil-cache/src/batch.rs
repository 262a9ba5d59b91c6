// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Windowed batch decryption.

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;
use veil_core::VeilError;

use crate::crypto::CryptoClient;

/// Items decrypted concurrently per window.
pub const DEFAULT_DECRYPT_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedItem {
    pub id: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptedItem {
    pub id: String,
    pub data: String,
}

/// Decrypt `items` in windows of `window` concurrent calls.
///
/// Each window is awaited whole before the next starts. Results are returned
/// in input order. The first failure fails the whole batch. A `window` of zero
/// is treated as one.
pub async fn decrypt_batch(
    client: &CryptoClient,
    items: &[EncryptedItem],
    password: &str,
    window: usize,
) -> Result<Vec<DecryptedItem>, VeilError> {
    let window = window.max(1);
    let mut decrypted = Vec::with_capacity(items.len());

    for (index, chunk) in items.chunks(window).enumerate() {
        debug!(window = index, size = chunk.len(), "decrypting batch window");
        let results = try_join_all(chunk.iter().map(|item| async move {
            let data = client.decrypt(&item.data, password).await?;
            Ok::<_, VeilError>(DecryptedItem {
                id: item.id.clone(),
                data,
            })
        }))
        .await?;
        decrypted.extend(results);
    }

    Ok(decrypted)
}
