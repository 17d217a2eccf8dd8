// SPDX-License-Identifier: MIT
//! Self-contained proof bundles for offline verification.

use std::path::Path;

use alloy_primitives::{Address, Bytes, B256, U256};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Current bundle format version.
pub const BUNDLE_VERSION: u32 = 1;

/// Everything needed to re-verify one storage slot without touching the
/// network. `claimed_value` is what the proof source reported; the
/// verifier recomputes the value and treats a mismatch as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    pub version: u32,
    pub chain_id: u64,
    pub block_number: u64,
    pub block_hash: B256,
    pub header_rlp: Bytes,
    pub address: Address,
    pub slot: B256,
    pub account_proof: Vec<Bytes>,
    pub storage_proof: Vec<Bytes>,
    pub claimed_value: U256,
}

impl ProofBundle {
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize proof bundle")?;
        std::fs::write(path, json)
            .with_context(|| format!("write proof bundle to {}", path.display()))
    }

    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read proof bundle from {}", path.display()))?;
        let bundle: Self =
            serde_json::from_str(&contents).context("deserialize proof bundle")?;
        if bundle.version != BUNDLE_VERSION {
            anyhow::bail!(
                "unsupported bundle version {} (expected {})",
                bundle.version,
                BUNDLE_VERSION
            );
        }
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProofBundle {
        ProofBundle {
            version: BUNDLE_VERSION,
            chain_id: 1,
            block_number: 19_000_000,
            block_hash: B256::repeat_byte(0x11),
            header_rlp: Bytes::from(vec![0xc4, 0x83, 0x01, 0x02, 0x03]),
            address: Address::repeat_byte(0xaa),
            slot: B256::ZERO,
            account_proof: vec![Bytes::from(vec![0xf8, 0x51])],
            storage_proof: vec![Bytes::from(vec![0xe2, 0xa0, 0x20])],
            claimed_value: U256::from(42u64),
        }
    }

    #[test]
    fn round_trips_through_disk() {
        let path = std::env::temp_dir().join("slotproof-bundle-test.json");
        let bundle = sample();

        bundle.write(&path).unwrap();
        let restored = ProofBundle::read(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(bundle, restored);
    }

    #[test]
    fn byte_fields_serialize_as_hex() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["slot"], serde_json::json!(format!("{}", B256::ZERO)));
        assert!(json["header_rlp"]
            .as_str()
            .unwrap()
            .starts_with("0x"));
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let path = std::env::temp_dir().join("slotproof-bundle-version-test.json");
        let mut bundle = sample();
        bundle.version = 99;
        bundle.write(&path).unwrap();

        let err = ProofBundle::read(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("unsupported bundle version"));
    }
}
