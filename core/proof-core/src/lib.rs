// SPDX-License-Identifier: MIT
//! proof-core crate
//!
//! Pure verification of Ethereum storage inclusion proofs: an RLP decoder,
//! the hex-prefix path codec, a Merkle-Patricia proof walker, and a facade
//! that binds a block header to the value of one storage slot.
//!
//! Nothing here performs I/O or holds shared state; every verification
//! call owns its inputs for its duration and independent calls may run
//! concurrently.

pub mod error;
pub mod nibbles;
pub mod rlp;
pub mod trie;
pub mod verify;

pub use error::ProofError;
pub use trie::{walk, Lookup, EMPTY_TRIE_ROOT};
pub use verify::{
    verify, verify_account, verify_slot, verify_storage_root, Account, VerifiedSlot,
};

#[cfg(test)]
pub(crate) mod testutil;
