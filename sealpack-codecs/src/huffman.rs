//! Huffman coding with a stored frequency table.
//!
//! The compressed form carries the full 256-entry byte histogram of the
//! original input. Both sides build the same code tree from it, so no code
//! lengths or canonical ordering travel on the wire. Tree nodes live in a
//! flat arena addressed by index; parent nodes are appended as leaves are
//! merged, and the last node appended is the root.
//!
//! Heap ordering breaks frequency ties by insertion order, with the 256
//! possible leaves inserted in ascending symbol order first. Rebuilding the
//! tree from the same table therefore always yields the same codes.
//!
//! Code bits are packed MSB-first; the final byte is zero-padded. An input
//! with a single distinct symbol has no code bits at all, and the decoder
//! recognizes the leaf-only tree and fills the output by repetition.
//!
//! Wire format (all fields little-endian):
//!
//! ```text
//! [original_size: u64][packed_size: u64][freq: 256 x u32][packed bits]
//! ```

use crate::wire;
use sealpack_core::{Buffer, Result, SealpackError};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Number of symbols in the byte alphabet.
pub const SYMBOL_COUNT: usize = 256;

/// Serialized header size: two u64 fields plus the frequency table.
const HEADER_SIZE: usize = 16 + SYMBOL_COUNT * 4;

/// A node in the flat code tree arena.
#[derive(Debug, Clone, Copy)]
struct Node {
    /// Symbol value; meaningful only for leaves.
    symbol: u8,
    /// Index of the left child, if any.
    left: Option<usize>,
    /// Index of the right child, if any.
    right: Option<usize>,
}

impl Node {
    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// In-memory form of Huffman compressed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanCompressed {
    /// MSB-first packed code bits.
    pub data: Vec<u8>,
    /// Length of the original input in bytes.
    pub original_size: u64,
    /// Byte histogram of the original input.
    pub freq_table: Vec<u32>,
}

/// Build the code tree for `freq_table` in a flat arena.
///
/// Returns the arena and the root index, or `None` when no symbol has a
/// nonzero frequency.
fn build_tree(freq_table: &[u32]) -> Option<(Vec<Node>, usize)> {
    let mut arena = Vec::new();
    // (frequency, insertion sequence, arena index); Reverse turns the max
    // heap into a min heap.
    let mut heap = BinaryHeap::new();
    let mut seq = 0usize;

    for (symbol, &freq) in freq_table.iter().enumerate() {
        if freq > 0 {
            arena.push(Node {
                symbol: symbol as u8,
                left: None,
                right: None,
            });
            heap.push(Reverse((u64::from(freq), seq, arena.len() - 1)));
            seq += 1;
        }
    }

    if heap.is_empty() {
        return None;
    }

    while heap.len() > 1 {
        let Reverse((left_freq, _, left)) = heap.pop()?;
        let Reverse((right_freq, _, right)) = heap.pop()?;
        arena.push(Node {
            symbol: 0,
            left: Some(left),
            right: Some(right),
        });
        heap.push(Reverse((left_freq + right_freq, seq, arena.len() - 1)));
        seq += 1;
    }

    let Reverse((_, _, root)) = heap.pop()?;
    Some((arena, root))
}

/// Walk the tree assigning a left=0/right=1 path to every leaf.
fn assign_codes(arena: &[Node], index: usize, path: &mut Vec<u8>, codes: &mut [Vec<u8>]) {
    let node = &arena[index];
    if node.is_leaf() {
        codes[node.symbol as usize] = path.clone();
        return;
    }
    if let Some(left) = node.left {
        path.push(0);
        assign_codes(arena, left, path, codes);
        path.pop();
    }
    if let Some(right) = node.right {
        path.push(1);
        assign_codes(arena, right, path, codes);
        path.pop();
    }
}

/// Compress `input` with a Huffman code derived from its byte histogram.
///
/// Fails with `InvalidArgument` on empty input.
pub fn compress(input: &[u8]) -> Result<HuffmanCompressed> {
    if input.is_empty() {
        return Err(SealpackError::invalid_argument("empty input"));
    }

    let mut freq_table = vec![0u32; SYMBOL_COUNT];
    for &byte in input {
        freq_table[byte as usize] += 1;
    }

    // Non-empty input always yields a tree.
    let (arena, root) = build_tree(&freq_table)
        .ok_or_else(|| SealpackError::invalid_argument("no symbols to encode"))?;

    if arena[root].is_leaf() {
        // Single distinct symbol: no code bits are needed, but the stream
        // must not be empty, so store the symbol as a placeholder byte.
        // The decoder rebuilds the tree from the table and never reads it.
        return Ok(HuffmanCompressed {
            data: vec![arena[root].symbol],
            original_size: input.len() as u64,
            freq_table,
        });
    }

    let mut codes = vec![Vec::new(); SYMBOL_COUNT];
    let mut path = Vec::new();
    assign_codes(&arena, root, &mut path, &mut codes);

    let total_bits: usize = input.iter().map(|&b| codes[b as usize].len()).sum();
    let mut data = vec![0u8; total_bits.div_ceil(8)];
    let mut bit_pos = 0usize;
    for &byte in input {
        for &bit in &codes[byte as usize] {
            if bit == 1 {
                data[bit_pos / 8] |= 0x80 >> (bit_pos % 8);
            }
            bit_pos += 1;
        }
    }

    Ok(HuffmanCompressed {
        data,
        original_size: input.len() as u64,
        freq_table,
    })
}

/// Rebuild the code tree from the stored histogram and decode the bits.
///
/// Fails with `Corrupted` if the bit stream walks off the tree or runs out
/// before `original_size` bytes are produced.
pub fn decompress(compressed: &HuffmanCompressed) -> Result<Buffer> {
    if compressed.freq_table.len() != SYMBOL_COUNT {
        return Err(SealpackError::corrupted(16, "frequency table size"));
    }
    let original_size = compressed.original_size as usize;
    let mut output = Buffer::with_capacity(original_size)?;

    let Some((arena, root)) = build_tree(&compressed.freq_table) else {
        if original_size == 0 {
            return Ok(output);
        }
        return Err(SealpackError::corrupted(16, "empty frequency table"));
    };

    if arena[root].is_leaf() {
        output.extend_repeat(arena[root].symbol, original_size)?;
        return Ok(output);
    }

    let mut index = root;
    'walk: for (byte_pos, &byte) in compressed.data.iter().enumerate() {
        for bit in (0..8).rev() {
            if output.len() >= original_size {
                break 'walk;
            }
            let child = if byte & (1 << bit) == 0 {
                arena[index].left
            } else {
                arena[index].right
            };
            index = child.ok_or_else(|| {
                SealpackError::corrupted(byte_pos as u64, "bit path leads off the code tree")
            })?;
            if arena[index].is_leaf() {
                output.push(arena[index].symbol)?;
                index = root;
            }
        }
    }

    if output.len() as u64 != compressed.original_size {
        return Err(SealpackError::size_mismatch(
            compressed.original_size,
            output.len() as u64,
        ));
    }
    Ok(output)
}

impl HuffmanCompressed {
    /// Serialize to the wire format.
    pub fn to_bytes(&self) -> Result<Buffer> {
        let mut out = Buffer::with_capacity(HEADER_SIZE + self.data.len())?;
        out.extend_from_slice(&self.original_size.to_le_bytes())?;
        out.extend_from_slice(&(self.data.len() as u64).to_le_bytes())?;
        for &freq in &self.freq_table {
            out.extend_from_slice(&freq.to_le_bytes())?;
        }
        out.extend_from_slice(&self.data)?;
        Ok(out)
    }

    /// Parse the wire format.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let original_size = wire::read_u64_le(data, 0)?;
        let packed_size = wire::read_u64_le(data, 8)?;

        if data.len() < HEADER_SIZE {
            return Err(SealpackError::unexpected_eof(HEADER_SIZE - data.len()));
        }
        if (data.len() - HEADER_SIZE) as u64 != packed_size {
            return Err(SealpackError::corrupted(
                HEADER_SIZE as u64,
                "packed data length disagrees with header",
            ));
        }

        let mut freq_table = Vec::with_capacity(SYMBOL_COUNT);
        for i in 0..SYMBOL_COUNT {
            freq_table.push(wire::read_u32_le(data, 16 + i * 4)?);
        }

        Ok(Self {
            data: data[HEADER_SIZE..].to_vec(),
            original_size,
            freq_table,
        })
    }
}
