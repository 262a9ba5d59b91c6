// SPDX-FileCopyrightText: 2026 Veil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by primitives, workflows, plugins, and bridges.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The data threaded through primitives and bridges: a JSON object.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Merge every field of `source` into `target`, overwriting same-named fields.
pub fn merge_payload(target: &mut Payload, source: &Payload) {
    for (key, value) in source {
        target.insert(key.clone(), value.clone());
    }
}

/// Well-known endpoints exposed by the remote privacy service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum RemoteEndpoint {
    #[strum(serialize = "encrypt")]
    Encrypt,
    #[strum(serialize = "decrypt")]
    Decrypt,
    #[strum(serialize = "zk/prove")]
    ZkProve,
    #[strum(serialize = "zk/verify")]
    ZkVerify,
    #[strum(serialize = "disclosure/create")]
    DisclosureCreate,
    #[strum(serialize = "disclosure/verify")]
    DisclosureVerify,
    #[strum(serialize = "mpc/compute")]
    MpcCompute,
    #[strum(serialize = "fhe/compute")]
    FheCompute,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn merge_overwrites_same_named_fields() {
        let mut target = Payload::new();
        target.insert("a".into(), 1.into());
        target.insert("b".into(), 2.into());

        let mut source = Payload::new();
        source.insert("b".into(), 20.into());
        source.insert("c".into(), 30.into());

        merge_payload(&mut target, &source);
        assert_eq!(target["a"], 1);
        assert_eq!(target["b"], 20);
        assert_eq!(target["c"], 30);
    }

    #[test]
    fn remote_endpoint_paths() {
        assert_eq!(RemoteEndpoint::ZkProve.to_string(), "zk/prove");
        assert_eq!(
            RemoteEndpoint::from_str("mpc/compute").unwrap(),
            RemoteEndpoint::MpcCompute
        );
        assert!(RemoteEndpoint::from_str("teleport").is_err());
    }
}
