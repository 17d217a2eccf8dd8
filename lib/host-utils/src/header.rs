// SPDX-License-Identifier: MIT
//! Canonical block-header serialization.
//!
//! `eth_getProof` commits to a state root that lives inside the block
//! header, but JSON-RPC hands the header out as a JSON object. This module
//! rebuilds the canonical RLP from that object, covering every hardfork
//! field through Prague, so the verifier can bind the state root to the
//! block hash.

use alloy_primitives::{keccak256, Address, Bloom, Bytes, B256, B64, U256, U64};
use alloy_rlp::Encodable;
use serde::{Deserialize, Serialize};

/// A consensus block header as returned by `eth_getBlockByNumber`.
///
/// The optional tail fields were introduced by London (base fee),
/// Shanghai (withdrawals root), Cancun (blob gas, parent beacon root) and
/// Prague (requests hash); a node omits the ones its fork does not have,
/// and the RLP encoding omits them in the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub parent_hash: B256,
    #[serde(rename = "sha3Uncles")]
    pub ommers_hash: B256,
    #[serde(rename = "miner")]
    pub beneficiary: Address,
    pub state_root: B256,
    pub transactions_root: B256,
    pub receipts_root: B256,
    pub logs_bloom: Bloom,
    pub difficulty: U256,
    pub number: U64,
    pub gas_limit: U64,
    pub gas_used: U64,
    pub timestamp: U64,
    pub extra_data: Bytes,
    pub mix_hash: B256,
    pub nonce: B64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<U64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withdrawals_root: Option<B256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_gas_used: Option<U64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excess_blob_gas: Option<U64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_beacon_block_root: Option<B256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_hash: Option<B256>,
}

impl BlockHeader {
    /// Canonical RLP encoding of the header.
    pub fn rlp(&self) -> Vec<u8> {
        let payload_length = self.payload_length();
        let mut out = Vec::with_capacity(payload_length + 3);
        alloy_rlp::Header {
            list: true,
            payload_length,
        }
        .encode(&mut out);

        self.parent_hash.encode(&mut out);
        self.ommers_hash.encode(&mut out);
        self.beneficiary.encode(&mut out);
        self.state_root.encode(&mut out);
        self.transactions_root.encode(&mut out);
        self.receipts_root.encode(&mut out);
        self.logs_bloom.encode(&mut out);
        self.difficulty.encode(&mut out);
        self.number.encode(&mut out);
        self.gas_limit.encode(&mut out);
        self.gas_used.encode(&mut out);
        self.timestamp.encode(&mut out);
        self.extra_data.encode(&mut out);
        self.mix_hash.encode(&mut out);
        self.nonce.encode(&mut out);
        if let Some(v) = self.base_fee_per_gas {
            v.encode(&mut out);
        }
        if let Some(v) = self.withdrawals_root {
            v.encode(&mut out);
        }
        if let Some(v) = self.blob_gas_used {
            v.encode(&mut out);
        }
        if let Some(v) = self.excess_blob_gas {
            v.encode(&mut out);
        }
        if let Some(v) = self.parent_beacon_block_root {
            v.encode(&mut out);
        }
        if let Some(v) = self.requests_hash {
            v.encode(&mut out);
        }
        out
    }

    /// keccak256 of the canonical encoding; equal to the block hash when
    /// the node and this serializer agree on the fork schema.
    pub fn hash(&self) -> B256 {
        keccak256(self.rlp())
    }

    fn payload_length(&self) -> usize {
        let mut len = self.parent_hash.length()
            + self.ommers_hash.length()
            + self.beneficiary.length()
            + self.state_root.length()
            + self.transactions_root.length()
            + self.receipts_root.length()
            + self.logs_bloom.length()
            + self.difficulty.length()
            + self.number.length()
            + self.gas_limit.length()
            + self.gas_used.length()
            + self.timestamp.length()
            + self.extra_data.length()
            + self.mix_hash.length()
            + self.nonce.length();
        if let Some(v) = self.base_fee_per_gas {
            len += v.length();
        }
        if let Some(v) = self.withdrawals_root {
            len += v.length();
        }
        if let Some(v) = self.blob_gas_used {
            len += v.length();
        }
        if let Some(v) = self.excess_blob_gas {
            len += v.length();
        }
        if let Some(v) = self.parent_beacon_block_root {
            len += v.length();
        }
        if let Some(v) = self.requests_hash {
            len += v.length();
        }
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proof_core::rlp::Item;

    fn cancun_block_json() -> serde_json::Value {
        serde_json::json!({
            "parentHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "sha3Uncles": "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
            "miner": "0x4838b106fce9647bdf1e7877bf73ce8b0bad5f97",
            "stateRoot": "0x2222222222222222222222222222222222222222222222222222222222222222",
            "transactionsRoot": "0x3333333333333333333333333333333333333333333333333333333333333333",
            "receiptsRoot": "0x4444444444444444444444444444444444444444444444444444444444444444",
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "difficulty": "0x0",
            "number": "0x12d687",
            "gasLimit": "0x1c9c380",
            "gasUsed": "0xf4240",
            "timestamp": "0x65f0e4a0",
            "extraData": "0xd883010d0b846765746888676f312e32312e36856c696e7578",
            "mixHash": "0x5555555555555555555555555555555555555555555555555555555555555555",
            "nonce": "0x0000000000000000",
            "baseFeePerGas": "0x3b9aca00",
            "withdrawalsRoot": "0x6666666666666666666666666666666666666666666666666666666666666666",
            "blobGasUsed": "0x20000",
            "excessBlobGas": "0x0",
            "parentBeaconBlockRoot": "0x7777777777777777777777777777777777777777777777777777777777777777",
        })
    }

    #[test]
    fn cancun_header_round_trips_through_rlp() {
        let header: BlockHeader = serde_json::from_value(cancun_block_json()).unwrap();
        let rlp = header.rlp();

        let fields_len = Item::decode(&rlp).unwrap().as_list().unwrap().len();
        assert_eq!(fields_len, 20);
        assert_eq!(header.hash(), keccak256(&rlp));
    }

    #[test]
    fn state_root_lands_at_field_3() {
        let header: BlockHeader = serde_json::from_value(cancun_block_json()).unwrap();
        let rlp = header.rlp();

        let decoded = Item::decode(&rlp).unwrap();
        let fields = decoded.as_list().unwrap();
        assert_eq!(fields[3].as_bytes(), header.state_root.as_slice());
    }

    #[test]
    fn pre_london_header_has_15_fields() {
        let mut json = cancun_block_json();
        let obj = json.as_object_mut().unwrap();
        for key in [
            "baseFeePerGas",
            "withdrawalsRoot",
            "blobGasUsed",
            "excessBlobGas",
            "parentBeaconBlockRoot",
        ] {
            obj.remove(key);
        }
        let header: BlockHeader = serde_json::from_value(json).unwrap();

        let rlp = header.rlp();
        let fields_len = Item::decode(&rlp).unwrap().as_list().unwrap().len();
        assert_eq!(fields_len, 15);
    }

    #[test]
    fn prague_header_has_21_fields() {
        let mut json = cancun_block_json();
        json.as_object_mut().unwrap().insert(
            "requestsHash".into(),
            serde_json::json!(
                "0x8888888888888888888888888888888888888888888888888888888888888888"
            ),
        );
        let header: BlockHeader = serde_json::from_value(json).unwrap();

        let rlp = header.rlp();
        let fields_len = Item::decode(&rlp).unwrap().as_list().unwrap().len();
        assert_eq!(fields_len, 21);
    }

    #[test]
    fn any_field_flip_changes_the_hash() {
        let header: BlockHeader = serde_json::from_value(cancun_block_json()).unwrap();
        let baseline = header.hash();

        let mut tampered = header.clone();
        tampered.gas_used = header.gas_used + U64::from(1);
        assert_ne!(tampered.hash(), baseline);

        let mut tampered = header;
        tampered.state_root = B256::repeat_byte(0x99);
        assert_ne!(tampered.hash(), baseline);
    }
}
