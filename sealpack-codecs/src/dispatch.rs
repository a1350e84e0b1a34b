//! Codec selection by name.
//!
//! [`Algorithm`] is the closed set of codecs; unknown names are rejected
//! when parsing, so [`compress_data`] and [`decompress_data`] never see an
//! algorithm they cannot handle.

use crate::{huffman, lz77, lzw, rle};
use sealpack_core::{Buffer, Result, SealpackError};
use std::fmt;
use std::str::FromStr;

/// The available compression algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Sliding-window LZ77. The default.
    #[default]
    Lz77,
    /// Frequency-table Huffman coding.
    Huffman,
    /// Run-length encoding.
    Rle,
    /// Dictionary LZW.
    Lzw,
}

impl Algorithm {
    /// All algorithms, in display order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Lz77,
        Algorithm::Huffman,
        Algorithm::Rle,
        Algorithm::Lzw,
    ];

    /// The canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Lz77 => "lz77",
            Algorithm::Huffman => "huffman",
            Algorithm::Rle => "rle",
            Algorithm::Lzw => "lzw",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SealpackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lz77" => Ok(Algorithm::Lz77),
            "huffman" => Ok(Algorithm::Huffman),
            "rle" => Ok(Algorithm::Rle),
            "lzw" => Ok(Algorithm::Lzw),
            other => Err(SealpackError::invalid_argument(format!(
                "unknown algorithm: {other}"
            ))),
        }
    }
}

/// Compress `input` with `algorithm` into its serialized wire format.
///
/// Fails with `InvalidArgument` on empty input.
pub fn compress_data(input: &[u8], algorithm: Algorithm) -> Result<Buffer> {
    if input.is_empty() {
        return Err(SealpackError::invalid_argument("empty input"));
    }
    match algorithm {
        Algorithm::Lz77 => lz77::compress(input)?.to_bytes(),
        Algorithm::Huffman => huffman::compress(input)?.to_bytes(),
        Algorithm::Rle => rle::compress(input)?.to_bytes(),
        Algorithm::Lzw => lzw::compress(input)?.to_bytes(),
    }
}

/// Decompress wire-format `input` produced by `algorithm`.
///
/// Fails with `InvalidArgument` on empty input.
pub fn decompress_data(input: &[u8], algorithm: Algorithm) -> Result<Buffer> {
    if input.is_empty() {
        return Err(SealpackError::invalid_argument("empty input"));
    }
    match algorithm {
        Algorithm::Lz77 => lz77::decompress(&lz77::Lz77Compressed::from_bytes(input)?),
        Algorithm::Huffman => huffman::decompress(&huffman::HuffmanCompressed::from_bytes(input)?),
        Algorithm::Rle => rle::decompress(&rle::RleCompressed::from_bytes(input)?),
        Algorithm::Lzw => lzw::decompress(&lzw::LzwCompressed::from_bytes(input)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_parse_roundtrip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert_eq!("HUFFMAN".parse::<Algorithm>().unwrap(), Algorithm::Huffman);
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert!(matches!(
            "deflate".parse::<Algorithm>(),
            Err(SealpackError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_dispatch_roundtrip() {
        let input = b"round and round and round it goes";
        for algorithm in Algorithm::ALL {
            let packed = compress_data(input, algorithm).unwrap();
            let unpacked = decompress_data(&packed, algorithm).unwrap();
            assert_eq!(unpacked.as_slice(), input, "{algorithm}");
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        for algorithm in Algorithm::ALL {
            assert!(compress_data(b"", algorithm).is_err());
            assert!(decompress_data(b"", algorithm).is_err());
        }
    }
}
