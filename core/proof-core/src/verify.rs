// SPDX-License-Identifier: MIT
//! Top-level verification: header binding, account record, slot value.
//!
//! The facade asserts nothing about the chain itself. Conditional on the
//! caller-supplied block hash being canonical, a successful return proves
//! the account's storage held exactly the returned value when that block
//! was produced.

use alloy_primitives::{keccak256, Address, B256, U256};

use crate::error::ProofError;
use crate::nibbles::unpack_nibbles;
use crate::rlp::Item;
use crate::trie::{walk, Lookup};

/// Position of the state root in the canonical block header list. Stable
/// across every hardfork; later forks only append fields.
const HEADER_STATE_ROOT_INDEX: usize = 3;

/// The account record committed in the state trie:
/// `[nonce, balance, storage_root, code_hash]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    pub nonce: u64,
    pub balance: U256,
    pub storage_root: B256,
    pub code_hash: B256,
}

/// A verified slot read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedSlot {
    pub value: U256,
    pub storage_root: B256,
}

/// Verify the account proof against the header and decode the full
/// account record.
pub fn verify_account<N>(
    header_rlp: &[u8],
    block_hash: B256,
    address: Address,
    account_proof: &[N],
) -> Result<Account, ProofError>
where
    N: AsRef<[u8]>,
{
    let root = state_root(header_rlp, block_hash)?;
    let key = keccak256(address);
    let path = unpack_nibbles(key.as_slice());

    let record = match walk(&path, account_proof, root)? {
        Lookup::Found(value) if !value.is_empty() => value,
        _ => return Err(ProofError::AccountNotFound),
    };

    decode_account(record)
}

/// Verify the account proof and return the account's storage root.
pub fn verify_storage_root<N>(
    header_rlp: &[u8],
    block_hash: B256,
    address: Address,
    account_proof: &[N],
) -> Result<B256, ProofError>
where
    N: AsRef<[u8]>,
{
    verify_account(header_rlp, block_hash, address, account_proof).map(|a| a.storage_root)
}

/// Verify the storage proof under `storage_root` and decode the slot
/// value. An absent entry reads as zero; a slot never written and a slot
/// written to zero are indistinguishable by design.
pub fn verify_slot<N>(
    storage_root: B256,
    slot: B256,
    storage_proof: &[N],
) -> Result<U256, ProofError>
where
    N: AsRef<[u8]>,
{
    let key = keccak256(slot);
    let path = unpack_nibbles(key.as_slice());

    let value = match walk(&path, storage_proof, storage_root)? {
        Lookup::Found(value) if !value.is_empty() => value,
        _ => return Ok(U256::ZERO),
    };

    Item::decode(value)?.as_uint()
}

/// Verify both chains and return the slot value together with the
/// account's storage root.
pub fn verify<A, S>(
    header_rlp: &[u8],
    block_hash: B256,
    address: Address,
    account_proof: &[A],
    slot: B256,
    storage_proof: &[S],
) -> Result<VerifiedSlot, ProofError>
where
    A: AsRef<[u8]>,
    S: AsRef<[u8]>,
{
    let storage_root = verify_storage_root(header_rlp, block_hash, address, account_proof)?;
    let value = verify_slot(storage_root, slot, storage_proof)?;
    Ok(VerifiedSlot {
        value,
        storage_root,
    })
}

/// Extract the state root from the header RLP and bind the header to the
/// asserted block hash.
fn state_root(header_rlp: &[u8], block_hash: B256) -> Result<B256, ProofError> {
    let header = Item::decode(header_rlp).map_err(|_| ProofError::InvalidHeaderRlp)?;
    let fields = header.as_list().map_err(|_| ProofError::InvalidHeaderRlp)?;
    if fields.len() <= HEADER_STATE_ROOT_INDEX {
        return Err(ProofError::InvalidHeaderRlp);
    }
    let field = &fields[HEADER_STATE_ROOT_INDEX];
    let root = field.as_bytes();
    if field.is_list() || root.len() != 32 {
        return Err(ProofError::InvalidHeaderRlp);
    }

    if keccak256(header_rlp) != block_hash {
        return Err(ProofError::BlockHeaderHashMismatch);
    }
    Ok(B256::from_slice(root))
}

fn decode_account(record: &[u8]) -> Result<Account, ProofError> {
    let item = Item::decode(record).map_err(|_| ProofError::InvalidAccountRlp)?;
    let fields = item.as_list().map_err(|_| ProofError::InvalidAccountRlp)?;
    if fields.len() != 4 {
        return Err(ProofError::InvalidAccountRlp);
    }

    let nonce = fields[0].as_uint().map_err(|_| ProofError::InvalidAccountRlp)?;
    let nonce = u64::try_from(nonce).map_err(|_| ProofError::InvalidAccountRlp)?;
    let balance = fields[1].as_uint().map_err(|_| ProofError::InvalidAccountRlp)?;

    let storage_root = fields[2].as_bytes();
    let code_hash = fields[3].as_bytes();
    if fields[2].is_list()
        || storage_root.len() != 32
        || fields[3].is_list()
        || code_hash.len() != 32
    {
        return Err(ProofError::InvalidAccountRlp);
    }

    Ok(Account {
        nonce,
        balance,
        storage_root: B256::from_slice(storage_root),
        code_hash: B256::from_slice(code_hash),
    })
}
