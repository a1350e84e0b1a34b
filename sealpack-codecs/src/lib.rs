//! # Sealpack Codecs
//!
//! Pure Rust implementations of the four Sealpack lossless codecs:
//!
//! - [`rle`]: run-length encoding with 255-byte run caps
//! - [`huffman`]: canonical frequency-table Huffman coding
//! - [`lzw`]: LZW with a 4096-entry dictionary
//! - [`lz77`]: LZ77 with a 4 KiB window and hash-chained match search
//!
//! Each codec exposes a `compress`/`decompress` pair over an in-memory
//! compressed form, plus `to_bytes`/`from_bytes` for the self-describing
//! wire format. The [`dispatch`] module selects a codec by name.
//!
//! All codecs are deterministic: the same input always produces the same
//! compressed bytes. Every decompressor validates declared sizes against
//! what it actually produced before returning success.
//!
//! ## Example
//!
//! ```rust
//! use sealpack_codecs::{compress_data, decompress_data, Algorithm};
//!
//! let data = b"abracadabra abracadabra";
//! let packed = compress_data(data, Algorithm::Lz77).unwrap();
//! let unpacked = decompress_data(&packed, Algorithm::Lz77).unwrap();
//! assert_eq!(unpacked.as_slice(), data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod dispatch;
pub mod huffman;
pub mod lz77;
pub mod lzw;
pub mod rle;

mod wire;

pub use dispatch::{compress_data, decompress_data, Algorithm};
