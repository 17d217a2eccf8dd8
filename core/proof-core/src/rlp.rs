// SPDX-License-Identifier: MIT
//! Recursive-length-prefix decoding for trie nodes and records.
//!
//! The walker needs more than payload extraction: every decoded item keeps
//! its original encoding, because a child whose encoding is shorter than
//! 32 bytes is an inline subnode rather than a hash reference.

use alloy_primitives::U256;

use crate::error::ProofError;

/// Nesting cap for decoded lists. Trie nodes are at most two levels deep;
/// anything deeper is not data this crate consumes.
const MAX_DEPTH: usize = 32;

/// A decoded RLP item, borrowing from the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<'a> {
    raw: &'a [u8],
    kind: Kind<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind<'a> {
    Bytes(&'a [u8]),
    List(Vec<Item<'a>>),
}

impl<'a> Item<'a> {
    /// Decode a single item spanning the whole input.
    pub fn decode(input: &'a [u8]) -> Result<Self, ProofError> {
        let (item, rest) = parse(input, 0)?;
        if !rest.is_empty() {
            return Err(ProofError::InvalidRlp("trailing bytes after item"));
        }
        Ok(item)
    }

    /// Number of bytes this item occupied in the input, header included.
    pub fn encoded_len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, Kind::List(_))
    }

    /// Whether this is a byte string with no content.
    pub fn is_empty_bytes(&self) -> bool {
        matches!(self.kind, Kind::Bytes(b) if b.is_empty())
    }

    /// The item's children. Fails on byte strings.
    pub fn as_list(&self) -> Result<&[Item<'a>], ProofError> {
        match &self.kind {
            Kind::List(items) => Ok(items),
            Kind::Bytes(_) => Err(ProofError::InvalidRlp("expected a list")),
        }
    }

    /// Content bytes for a string item; the original encoding for a list
    /// item. The list half lets the walker re-hash or re-enter an inline
    /// subnode from its position inside the parent.
    pub fn as_bytes(&self) -> &'a [u8] {
        match self.kind {
            Kind::Bytes(content) => content,
            Kind::List(_) => self.raw,
        }
    }

    /// Big-endian unsigned integer from string content. Leading zeros are
    /// accepted; canonicity is the caller's concern.
    pub fn as_uint(&self) -> Result<U256, ProofError> {
        match self.kind {
            Kind::Bytes(content) if content.len() <= 32 => Ok(U256::from_be_slice(content)),
            Kind::Bytes(_) => Err(ProofError::InvalidRlp("integer wider than 32 bytes")),
            Kind::List(_) => Err(ProofError::InvalidRlp("expected a byte string")),
        }
    }
}

fn parse(input: &[u8], depth: usize) -> Result<(Item<'_>, &[u8]), ProofError> {
    if depth > MAX_DEPTH {
        return Err(ProofError::InvalidRlp("list nesting too deep"));
    }
    let Some(&prefix) = input.first() else {
        return Err(ProofError::InvalidRlp("empty input"));
    };

    match prefix {
        // Single byte below 0x80 encodes itself.
        0x00..=0x7f => {
            let (raw, rest) = input.split_at(1);
            Ok((
                Item {
                    raw,
                    kind: Kind::Bytes(raw),
                },
                rest,
            ))
        }

        0x80..=0xb7 => {
            let len = (prefix - 0x80) as usize;
            string_item(input, 1, len)
        }

        0xb8..=0xbf => {
            let len_of_len = (prefix - 0xb7) as usize;
            let len = read_length(input, len_of_len)?;
            string_item(input, 1 + len_of_len, len)
        }

        0xc0..=0xf7 => {
            let len = (prefix - 0xc0) as usize;
            list_item(input, 1, len, depth)
        }

        0xf8..=0xff => {
            let len_of_len = (prefix - 0xf7) as usize;
            let len = read_length(input, len_of_len)?;
            list_item(input, 1 + len_of_len, len, depth)
        }
    }
}

fn string_item(input: &[u8], header: usize, len: usize) -> Result<(Item<'_>, &[u8]), ProofError> {
    let total = header
        .checked_add(len)
        .ok_or(ProofError::InvalidRlp("length overflow"))?;
    if input.len() < total {
        return Err(ProofError::InvalidRlp("string truncated"));
    }
    let (raw, rest) = input.split_at(total);
    Ok((
        Item {
            raw,
            kind: Kind::Bytes(&raw[header..]),
        },
        rest,
    ))
}

fn list_item(
    input: &[u8],
    header: usize,
    len: usize,
    depth: usize,
) -> Result<(Item<'_>, &[u8]), ProofError> {
    let total = header
        .checked_add(len)
        .ok_or(ProofError::InvalidRlp("length overflow"))?;
    if input.len() < total {
        return Err(ProofError::InvalidRlp("list truncated"));
    }
    let (raw, rest) = input.split_at(total);

    let mut items = Vec::new();
    let mut payload = &raw[header..];
    while !payload.is_empty() {
        let (item, remainder) = parse(payload, depth + 1)?;
        items.push(item);
        payload = remainder;
    }

    Ok((
        Item {
            raw,
            kind: Kind::List(items),
        },
        rest,
    ))
}

fn read_length(input: &[u8], len_of_len: usize) -> Result<usize, ProofError> {
    if input.len() < 1 + len_of_len {
        return Err(ProofError::InvalidRlp("length header truncated"));
    }
    let mut len = 0usize;
    for &b in &input[1..1 + len_of_len] {
        len = len
            .checked_mul(256)
            .and_then(|l| l.checked_add(b as usize))
            .ok_or(ProofError::InvalidRlp("length overflow"))?;
    }
    Ok(len)
}
