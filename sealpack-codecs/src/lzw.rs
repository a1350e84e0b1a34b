//! LZW with a fixed 4096-entry dictionary.
//!
//! Codes 0..=255 are the single-byte entries, code 256 is reserved and
//! never appears in a valid stream, and multi-byte entries start at 257.
//! Once the dictionary is full no more entries are added; neither side
//! resets it, so both sides freeze in lock step.
//!
//! The encoder keeps its dictionary as a hash map from `(prefix, byte)` to
//! code. The decoder stores each multi-byte entry as a `(prefix, byte)`
//! pair and expands the chain on demand, so the dictionary stays a few
//! kilobytes regardless of how long the entries get.
//!
//! Wire format (all fields little-endian):
//!
//! ```text
//! [original_size: u64][code_count: u64][codes: u16]...
//! ```

use crate::wire;
use sealpack_core::{Buffer, Result, SealpackError};
use std::collections::HashMap;

/// Total dictionary capacity, including the reserved code.
pub const DICT_CAPACITY: u16 = 4096;

/// First code assigned to a multi-byte entry.
const FIRST_MULTI_CODE: u16 = 257;

/// Size in bytes of the serialized header.
const HEADER_SIZE: usize = 16;

/// A multi-byte dictionary entry: the entry for `prefix` followed by one byte.
#[derive(Debug, Clone, Copy)]
struct Entry {
    prefix: u16,
    byte: u8,
}

/// In-memory form of LZW compressed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LzwCompressed {
    /// The emitted dictionary codes, in order.
    pub codes: Vec<u16>,
    /// Length of the original input in bytes.
    pub original_size: u64,
}

/// Compress `input` into a sequence of dictionary codes.
///
/// Fails with `InvalidArgument` on empty input. The first emitted code is
/// always a single-byte code.
pub fn compress(input: &[u8]) -> Result<LzwCompressed> {
    if input.is_empty() {
        return Err(SealpackError::invalid_argument("empty input"));
    }

    let mut dict: HashMap<(u16, u8), u16> = HashMap::new();
    let mut next_code = FIRST_MULTI_CODE;
    let mut codes = Vec::new();
    let mut current = u16::from(input[0]);

    for &byte in &input[1..] {
        if let Some(&code) = dict.get(&(current, byte)) {
            current = code;
        } else {
            codes.push(current);
            if next_code < DICT_CAPACITY {
                dict.insert((current, byte), next_code);
                next_code += 1;
            }
            current = u16::from(byte);
        }
    }
    codes.push(current);

    Ok(LzwCompressed {
        codes,
        original_size: input.len() as u64,
    })
}

/// Expand the byte sequence for `code` into `out`.
fn expand(entries: &[Entry], code: u16, out: &mut Vec<u8>) {
    out.clear();
    let mut code = code;
    while code >= FIRST_MULTI_CODE {
        let entry = entries[(code - FIRST_MULTI_CODE) as usize];
        out.push(entry.byte);
        code = entry.prefix;
    }
    out.push(code as u8);
    out.reverse();
}

/// Rebuild the dictionary in lock step with the encoder and decode.
///
/// Fails with `InvalidCode` on the reserved code or any code the decoder
/// has not yet defined (beyond the one-ahead case), and with `Corrupted`
/// or `SizeMismatch` when the output disagrees with the declared size.
pub fn decompress(compressed: &LzwCompressed) -> Result<Buffer> {
    let original_size = compressed.original_size as usize;
    let mut output = Buffer::with_capacity(original_size)?;
    if compressed.codes.is_empty() {
        if original_size == 0 {
            return Ok(output);
        }
        return Err(SealpackError::size_mismatch(compressed.original_size, 0));
    }

    let first = compressed.codes[0];
    if first > 255 {
        return Err(SealpackError::invalid_code(first));
    }

    let mut entries: Vec<Entry> = Vec::new();
    let mut next_code = FIRST_MULTI_CODE;
    let mut previous = first;
    let mut sequence = vec![first as u8];

    if output.len() + 1 > original_size {
        return Err(SealpackError::corrupted(0, "decoded past declared size"));
    }
    output.push(first as u8)?;

    let mut scratch = Vec::new();
    for (pos, &code) in compressed.codes.iter().enumerate().skip(1) {
        if code == 256 {
            return Err(SealpackError::invalid_code(code));
        }
        if code < 256 {
            scratch.clear();
            scratch.push(code as u8);
        } else if code < next_code {
            expand(&entries, code, &mut scratch);
        } else if code == next_code && next_code < DICT_CAPACITY {
            // The one-ahead case: the entry being defined by this very
            // code is the previous sequence plus its own first byte.
            scratch.clear();
            scratch.extend_from_slice(&sequence);
            scratch.push(sequence[0]);
        } else {
            return Err(SealpackError::invalid_code(code));
        }

        if output.len() + scratch.len() > original_size {
            return Err(SealpackError::corrupted(
                pos as u64,
                "decoded past declared size",
            ));
        }
        output.extend_from_slice(&scratch)?;

        if next_code < DICT_CAPACITY {
            entries.push(Entry {
                prefix: previous,
                byte: scratch[0],
            });
            next_code += 1;
        }
        previous = code;
        std::mem::swap(&mut sequence, &mut scratch);
    }

    if output.len() as u64 != compressed.original_size {
        return Err(SealpackError::size_mismatch(
            compressed.original_size,
            output.len() as u64,
        ));
    }
    Ok(output)
}

impl LzwCompressed {
    /// Serialize to the wire format.
    pub fn to_bytes(&self) -> Result<Buffer> {
        let mut out = Buffer::with_capacity(HEADER_SIZE + self.codes.len() * 2)?;
        out.extend_from_slice(&self.original_size.to_le_bytes())?;
        out.extend_from_slice(&(self.codes.len() as u64).to_le_bytes())?;
        for &code in &self.codes {
            out.extend_from_slice(&code.to_le_bytes())?;
        }
        Ok(out)
    }

    /// Parse the wire format.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let original_size = wire::read_u64_le(data, 0)?;
        let code_count = wire::read_u64_le(data, 8)?;

        // Header parse succeeding guarantees data.len() >= HEADER_SIZE.
        let code_bytes = data.len() - HEADER_SIZE;
        if code_bytes % 2 != 0 || (code_bytes / 2) as u64 != code_count {
            return Err(SealpackError::corrupted(
                HEADER_SIZE as u64,
                "code data length disagrees with header",
            ));
        }

        let codes = data[HEADER_SIZE..]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self {
            codes,
            original_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_text() {
        let input = b"TOBEORNOTTOBEORTOBEORNOT";
        let compressed = compress(input).unwrap();
        assert!(compressed.codes[0] < 256);
        let output = decompress(&compressed).unwrap();
        assert_eq!(output.as_slice(), input);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            compress(b""),
            Err(SealpackError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_single_byte() {
        let compressed = compress(b"Q").unwrap();
        assert_eq!(compressed.codes, vec![u16::from(b'Q')]);
        assert_eq!(decompress(&compressed).unwrap().as_slice(), b"Q");
    }

    #[test]
    fn test_one_ahead_case() {
        // "aaaa" exercises the code-defined-by-itself path: the encoder
        // emits 'a', then 257 before the decoder has seen entry 257.
        let input = b"aaaa";
        let compressed = compress(input).unwrap();
        assert_eq!(compressed.codes, vec![u16::from(b'a'), 257, u16::from(b'a')]);
        assert_eq!(decompress(&compressed).unwrap().as_slice(), input);
    }

    #[test]
    fn test_reserved_code_rejected() {
        let compressed = LzwCompressed {
            codes: vec![u16::from(b'a'), 256],
            original_size: 3,
        };
        assert!(matches!(
            decompress(&compressed),
            Err(SealpackError::InvalidCode { code: 256 })
        ));
    }

    #[test]
    fn test_undefined_code_rejected() {
        let compressed = LzwCompressed {
            codes: vec![u16::from(b'a'), 300],
            original_size: 5,
        };
        assert!(matches!(
            decompress(&compressed),
            Err(SealpackError::InvalidCode { code: 300 })
        ));
    }

    #[test]
    fn test_first_code_must_be_literal() {
        let compressed = LzwCompressed {
            codes: vec![257],
            original_size: 2,
        };
        assert!(matches!(
            decompress(&compressed),
            Err(SealpackError::InvalidCode { code: 257 })
        ));
    }

    #[test]
    fn test_dictionary_cap() {
        // A pseudo-random stream long enough to fill all 4096 entries.
        let mut state = 0x2545F491_u32;
        let input: Vec<u8> = (0..64 * 1024)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (state >> 16) as u8
            })
            .collect();
        let compressed = compress(&input).unwrap();
        assert!(compressed.codes.iter().all(|&c| c < DICT_CAPACITY));
        assert!(compressed.codes.iter().all(|&c| c != 256));
        assert_eq!(decompress(&compressed).unwrap().as_slice(), &input[..]);
    }

    #[test]
    fn test_wire_roundtrip() {
        let input = b"banana bandana banana";
        let compressed = compress(input).unwrap();
        let bytes = compressed.to_bytes().unwrap();
        assert_eq!(bytes.len(), 16 + compressed.codes.len() * 2);
        let parsed = LzwCompressed::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, compressed);
        assert_eq!(decompress(&parsed).unwrap().as_slice(), input);
    }

    #[test]
    fn test_truncated_wire_rejected() {
        let bytes = compress(b"hello hello").unwrap().to_bytes().unwrap();
        assert!(LzwCompressed::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut compressed = compress(b"abcabc").unwrap();
        compressed.original_size = 3;
        assert!(decompress(&compressed).is_err());
        let mut compressed = compress(b"abcabc").unwrap();
        compressed.original_size = 100;
        assert!(matches!(
            decompress(&compressed),
            Err(SealpackError::SizeMismatch { .. })
        ));
    }
}
