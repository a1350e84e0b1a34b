//! Error types for Sealpack operations.
//!
//! One error type covers the whole pipeline: argument validation, allocation
//! failure, structurally invalid compressed or encrypted data, and the I/O
//! errors of the surrounding file layer. Corruption is always surfaced to the
//! caller; nothing in the codec or cipher layers retries or silently
//! truncates.

use std::io;
use thiserror::Error;

/// The main error type for Sealpack operations.
#[derive(Debug, Error)]
pub enum SealpackError {
    /// I/O error from the surrounding file layer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid argument (empty input, unknown algorithm name, bad key).
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected argument.
        message: String,
    },

    /// Memory reservation failed.
    #[error("Out of memory: failed to reserve {needed} bytes")]
    OutOfMemory {
        /// Number of bytes that could not be reserved.
        needed: usize,
    },

    /// Structurally invalid compressed or encrypted data.
    #[error("Corrupted data at offset {offset}: {message}")]
    Corrupted {
        /// Byte offset where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// Declared and actual sizes disagree.
    #[error("Size mismatch: declared {declared} bytes, produced {produced}")]
    SizeMismatch {
        /// Size declared by the stream header.
        declared: u64,
        /// Size actually produced.
        produced: u64,
    },

    /// Back-reference pointing before the start of the produced output.
    #[error("Invalid back-reference distance: {distance} exceeds {produced} bytes produced")]
    InvalidDistance {
        /// The offending distance.
        distance: usize,
        /// Bytes produced so far.
        produced: usize,
    },

    /// Dictionary code with no defined entry.
    #[error("Invalid code: {code}")]
    InvalidCode {
        /// The unresolvable code.
        code: u16,
    },

    /// Stream ended before a complete header or unit could be read.
    #[error("Unexpected end of data: expected {expected} more bytes")]
    UnexpectedEof {
        /// Number of bytes that were expected but not available.
        expected: usize,
    },
}

/// Result type alias for Sealpack operations.
pub type Result<T> = std::result::Result<T, SealpackError>;

impl SealpackError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an out of memory error.
    pub fn out_of_memory(needed: usize) -> Self {
        Self::OutOfMemory { needed }
    }

    /// Create a corrupted data error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::Corrupted {
            offset,
            message: message.into(),
        }
    }

    /// Create a size mismatch error.
    pub fn size_mismatch(declared: u64, produced: u64) -> Self {
        Self::SizeMismatch { declared, produced }
    }

    /// Create an invalid distance error.
    pub fn invalid_distance(distance: usize, produced: usize) -> Self {
        Self::InvalidDistance { distance, produced }
    }

    /// Create an invalid code error.
    pub fn invalid_code(code: u16) -> Self {
        Self::InvalidCode { code }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(expected: usize) -> Self {
        Self::UnexpectedEof { expected }
    }
}
