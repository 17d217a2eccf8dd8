// SPDX-License-Identifier: MIT
//! Failure taxonomy for proof verification.
//!
//! Every kind is fatal to the current call and none is retriable; a failed
//! verification never carries a partial result.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProofError {
    /// The header is not an RLP list of at least 4 items with a 32-byte
    /// state root at field 3.
    #[error("block header is not an RLP list with a 32-byte state root at field 3")]
    InvalidHeaderRlp,

    #[error("keccak256 of the header RLP does not match the asserted block hash")]
    BlockHeaderHashMismatch,

    #[error("malformed RLP: {0}")]
    InvalidRlp(&'static str),

    #[error("account value is not a 4-item RLP record")]
    InvalidAccountRlp,

    #[error("account proof attests the account does not exist")]
    AccountNotFound,

    #[error("proof node hash does not match the reference in its parent")]
    InvalidProofNodeHash,

    #[error("trie node has {0} items, expected 2 or 17")]
    InvalidProofNodeLength(usize),

    #[error("path nibble {0:#x} is out of range")]
    InvalidNibbleRange(u8),

    #[error("compact-encoded path is empty")]
    EmptyCompactValue,

    #[error("key diverges inside an extension or leaf segment")]
    KeyMismatchInExtensionOrLeaf,

    #[error("leaf terminates before the key path is exhausted")]
    LeafNodePathLengthMismatch,
}
