//! LZ77 with a sliding window and hashed match search.
//!
//! The encoder emits fixed-width tokens. A match token carries the
//! backward offset, the match length, and the literal byte that follows
//! the match; a literal token has offset and length zero. When a match
//! runs to the end of the input there is no following byte, and the token
//! stores 0 in its place; the decoder never reads it because the output
//! is already complete.
//!
//! Match search hashes the 3-byte prefix at each token start into a
//! 65536-slot table holding one candidate position per slot. The table is
//! created per call, so concurrent compressions never share state.
//!
//! Wire format, unlike the other codecs, is big-endian:
//!
//! ```text
//! [original_size: u64 BE][offset: u16 BE, length: u8, next: u8]...
//! ```

use crate::wire;
use sealpack_core::{Buffer, Result, SealpackError};

/// Sliding window size: how far back a match may reach.
pub const WINDOW_SIZE: usize = 4096;

/// Longest match a single token can describe.
pub const MAX_MATCH: usize = 18;

/// Shortest match worth a token; anything shorter is a literal.
pub const MIN_MATCH: usize = 3;

/// Number of slots in the match-search hash table.
const HASH_SLOTS: usize = 65536;

/// Sentinel for an unused hash slot.
const EMPTY_SLOT: usize = usize::MAX;

/// Size in bytes of the serialized header.
const HEADER_SIZE: usize = 8;

/// A single LZ77 token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Backward distance to the match start; 0 for a literal token.
    pub offset: u16,
    /// Match length; 0 for a literal token.
    pub length: u8,
    /// The literal byte following the match, or the literal itself.
    pub next_char: u8,
}

/// In-memory form of LZ77 compressed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lz77Compressed {
    /// The emitted tokens, in input order.
    pub tokens: Vec<Token>,
    /// Length of the original input in bytes.
    pub original_size: u64,
}

/// Hash the 3-byte prefix at `pos` into a table slot.
fn hash3(input: &[u8], pos: usize) -> usize {
    let key = (usize::from(input[pos]) << 16)
        | (usize::from(input[pos + 1]) << 8)
        | usize::from(input[pos + 2]);
    key % HASH_SLOTS
}

/// Find the longest match for the lookahead at `pos`, then record `pos` as
/// the new candidate for its prefix. Positions with fewer than three bytes
/// of lookahead are never hashed.
fn find_longest_match(input: &[u8], pos: usize, table: &mut [usize]) -> (usize, usize) {
    if pos + MIN_MATCH > input.len() {
        return (0, 0);
    }

    let slot = hash3(input, pos);
    let candidate = table[slot];
    table[slot] = pos;

    if candidate == EMPTY_SLOT || candidate >= pos {
        return (0, 0);
    }
    let window_start = pos.saturating_sub(WINDOW_SIZE);
    if candidate < window_start {
        return (0, 0);
    }

    let limit = MAX_MATCH.min(input.len() - pos);
    let mut length = 0;
    while length < limit && input[candidate + length] == input[pos + length] {
        length += 1;
    }
    if length < MIN_MATCH {
        return (0, 0);
    }
    (pos - candidate, length)
}

/// Compress `input` into a sequence of tokens.
///
/// Fails with `InvalidArgument` on empty input.
pub fn compress(input: &[u8]) -> Result<Lz77Compressed> {
    if input.is_empty() {
        return Err(SealpackError::invalid_argument("empty input"));
    }

    let mut table = vec![EMPTY_SLOT; HASH_SLOTS];
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let (offset, length) = find_longest_match(input, pos, &mut table);
        if length >= MIN_MATCH {
            let next_char = if pos + length < input.len() {
                input[pos + length]
            } else {
                0
            };
            tokens.push(Token {
                offset: offset as u16,
                length: length as u8,
                next_char,
            });
            pos += length + 1;
        } else {
            tokens.push(Token {
                offset: 0,
                length: 0,
                next_char: input[pos],
            });
            pos += 1;
        }
    }

    Ok(Lz77Compressed {
        tokens,
        original_size: input.len() as u64,
    })
}

/// Replay tokens into the original bytes.
///
/// Copies are byte by byte, so a match may overlap its own output.
/// Fails with `InvalidDistance` if a token reaches back past the start of
/// the produced output, and `SizeMismatch` if the replay does not land
/// exactly on the declared size. Tokens past the declared size are
/// ignored.
pub fn decompress(compressed: &Lz77Compressed) -> Result<Buffer> {
    let original_size = compressed.original_size as usize;
    let mut output = Buffer::with_capacity(original_size)?;

    for token in &compressed.tokens {
        if output.len() >= original_size {
            break;
        }
        if token.offset > 0 && token.length > 0 {
            let distance = usize::from(token.offset);
            if distance > output.len() {
                return Err(SealpackError::invalid_distance(distance, output.len()));
            }
            for _ in 0..token.length {
                let byte = output[output.len() - distance];
                output.push(byte)?;
            }
        }
        if output.len() < original_size {
            output.push(token.next_char)?;
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

impl Lz77Compressed {
    /// Serialize to the wire format.
    pub fn to_bytes(&self) -> Result<Buffer> {
        let mut out = Buffer::with_capacity(HEADER_SIZE + self.tokens.len() * 4)?;
        out.extend_from_slice(&self.original_size.to_be_bytes())?;
        for token in &self.tokens {
            out.extend_from_slice(&token.offset.to_be_bytes())?;
            out.push(token.length)?;
            out.push(token.next_char)?;
        }
        Ok(out)
    }

    /// Parse the wire format.
    ///
    /// The token region must be a whole number of 4-byte tokens.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let original_size = wire::read_u64_be(data, 0)?;
        let token_bytes = data.len() - HEADER_SIZE;
        if token_bytes % 4 != 0 {
            return Err(SealpackError::corrupted(
                HEADER_SIZE as u64,
                "token data is not a whole number of tokens",
            ));
        }

        let mut tokens = Vec::with_capacity(token_bytes / 4);
        for i in 0..token_bytes / 4 {
            let base = HEADER_SIZE + i * 4;
            tokens.push(Token {
                offset: wire::read_u16_be(data, base)?,
                length: data[base + 2],
                next_char: data[base + 3],
            });
        }
        Ok(Self {
            tokens,
            original_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_text() {
        let input = b"abracadabra abracadabra abracadabra";
        let compressed = compress(input).unwrap();
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
    fn test_short_input_all_literals() {
        let compressed = compress(b"ab").unwrap();
        assert_eq!(
            compressed.tokens,
            vec![
                Token { offset: 0, length: 0, next_char: b'a' },
                Token { offset: 0, length: 0, next_char: b'b' },
            ]
        );
        assert_eq!(decompress(&compressed).unwrap().as_slice(), b"ab");
    }

    #[test]
    fn test_overlapping_match() {
        // A long repeat compresses to a match that copies its own output.
        let input = vec![b'x'; 40];
        let compressed = compress(&input).unwrap();
        assert!(compressed.tokens.len() < input.len());
        assert_eq!(decompress(&compressed).unwrap().as_slice(), &input[..]);
    }

    #[test]
    fn test_match_at_end_of_input() {
        // "abcabc" ends on a match with no following literal; the token
        // stores 0 and the decoder must not emit it.
        let input = b"abcabc";
        let compressed = compress(input).unwrap();
        let last = compressed.tokens.last().unwrap();
        assert_eq!((last.offset, last.length, last.next_char), (3, 3, 0));
        assert_eq!(decompress(&compressed).unwrap().as_slice(), input);
    }

    #[test]
    fn test_first_token_backref_rejected() {
        let compressed = Lz77Compressed {
            tokens: vec![Token { offset: 5, length: 3, next_char: 0 }],
            original_size: 4,
        };
        assert!(matches!(
            decompress(&compressed),
            Err(SealpackError::InvalidDistance {
                distance: 5,
                produced: 0
            })
        ));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let compressed = Lz77Compressed {
            tokens: vec![Token { offset: 0, length: 0, next_char: b'a' }],
            original_size: 10,
        };
        assert!(matches!(
            decompress(&compressed),
            Err(SealpackError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_wire_roundtrip() {
        let input = b"the quick brown fox jumps over the lazy dog the quick brown fox";
        let compressed = compress(input).unwrap();
        let bytes = compressed.to_bytes().unwrap();
        assert_eq!(bytes.len(), 8 + compressed.tokens.len() * 4);
        let parsed = Lz77Compressed::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, compressed);
        assert_eq!(decompress(&parsed).unwrap().as_slice(), input);
    }

    #[test]
    fn test_ragged_token_bytes_rejected() {
        let input = b"hello hello hello";
        let mut bytes = compress(input).unwrap().to_bytes().unwrap().into_vec();
        bytes.push(0);
        assert!(matches!(
            Lz77Compressed::from_bytes(&bytes),
            Err(SealpackError::Corrupted { .. })
        ));
    }

    #[test]
    fn test_truncated_header_rejected() {
        assert!(matches!(
            Lz77Compressed::from_bytes(&[0u8; 5]),
            Err(SealpackError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_match_bounded_by_window() {
        let compressed = compress(b"abcabc").unwrap();
        for token in &compressed.tokens {
            assert!(usize::from(token.offset) <= WINDOW_SIZE);
            assert!(usize::from(token.length) <= MAX_MATCH);
        }
    }
}
