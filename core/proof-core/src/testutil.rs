// SPDX-License-Identifier: MIT
//! RLP construction helpers for building synthetic tries in tests.

use alloy_primitives::keccak256;

pub fn encode_bytes(content: &[u8]) -> Vec<u8> {
    if content.len() == 1 && content[0] < 0x80 {
        return content.to_vec();
    }
    let mut out;
    if content.len() <= 55 {
        out = vec![0x80 + content.len() as u8];
    } else {
        let len = be_length(content.len());
        out = vec![0xb7 + len.len() as u8];
        out.extend_from_slice(&len);
    }
    out.extend_from_slice(content);
    out
}

/// Wrap already-encoded items into a list.
pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload = items.concat();
    let mut out;
    if payload.len() <= 55 {
        out = vec![0xc0 + payload.len() as u8];
    } else {
        let len = be_length(payload.len());
        out = vec![0xf7 + len.len() as u8];
        out.extend_from_slice(&len);
    }
    out.extend_from_slice(&payload);
    out
}

fn be_length(len: usize) -> Vec<u8> {
    let bytes = len.to_be_bytes();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    bytes[first..].to_vec()
}

/// Hex-prefix encode a nibble path.
pub fn compact(nibbles: &[u8], is_leaf: bool) -> Vec<u8> {
    let flag: u8 = if is_leaf { 2 } else { 0 };
    let mut out = Vec::with_capacity(nibbles.len() / 2 + 1);
    let rest = if nibbles.len() % 2 == 1 {
        out.push((flag | 1) << 4 | nibbles[0]);
        &nibbles[1..]
    } else {
        out.push(flag << 4);
        nibbles
    };
    for pair in rest.chunks(2) {
        out.push(pair[0] << 4 | pair[1]);
    }
    out
}

/// A leaf node for the given remaining path and raw value bytes.
pub fn leaf_node(path: &[u8], value: &[u8]) -> Vec<u8> {
    encode_list(&[encode_bytes(&compact(path, true)), encode_bytes(value)])
}

/// An extension node pointing at `child` (an encoded node).
pub fn extension_node(path: &[u8], child: &[u8]) -> Vec<u8> {
    encode_list(&[encode_bytes(&compact(path, false)), child_ref(child)])
}

/// A branch node with encoded child nodes at the given nibble indices and
/// an optional value in slot 16.
pub fn branch_node(children: &[(usize, &[u8])], value: Option<&[u8]>) -> Vec<u8> {
    let mut items: Vec<Vec<u8>> = vec![vec![0x80]; 17];
    for (index, child) in children {
        items[*index] = child_ref(child);
    }
    if let Some(value) = value {
        items[16] = encode_bytes(value);
    }
    encode_list(&items)
}

/// Encode a child reference the way a parent stores it: the node itself
/// when its encoding is shorter than 32 bytes, its keccak hash otherwise.
pub fn child_ref(node: &[u8]) -> Vec<u8> {
    if node.len() < 32 {
        node.to_vec()
    } else {
        encode_bytes(keccak256(node).as_slice())
    }
}
