//! # Sealpack Core
//!
//! Core components for the Sealpack compression/encryption pipeline.
//!
//! This crate provides the building blocks shared by every other Sealpack
//! crate:
//!
//! - [`buffer`]: the owned, growable byte buffer that flows through the
//!   whole pipeline (codec input/output, cipher input/output, file I/O)
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! Sealpack is a layered pipeline:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: CLI                                                 │
//! │     argument parsing, file I/O, per-file worker pool    │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Transforms                                          │
//! │     codecs (RLE, Huffman, LZW, LZ77), stream ciphers    │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Buffer (this crate)                                 │
//! │     Buffer, SealpackError                               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sealpack_core::Buffer;
//!
//! let mut buf = Buffer::new();
//! buf.extend_from_slice(b"hello").unwrap();
//! assert_eq!(buf.as_slice(), b"hello");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod error;

// Re-exports for convenience
pub use buffer::Buffer;
pub use error::{Result, SealpackError};
