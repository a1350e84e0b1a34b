//! Owned, growable byte buffer.
//!
//! [`Buffer`] is the universal input/output type of the Sealpack pipeline:
//! codecs and ciphers take byte slices in and hand a `Buffer` back, and the
//! file layer reads into and writes out of the same type.
//!
//! Growth is amortized doubling, but every reservation is fallible: a failed
//! allocation surfaces as [`SealpackError::OutOfMemory`] instead of aborting
//! the process, so a worker processing many files can fail one file and keep
//! going.

use crate::error::{Result, SealpackError};

/// An owned, growable byte sequence with fallible growth.
///
/// Invariants: `len() <= capacity()`; the storage is owned exclusively by
/// this buffer and never aliases another buffer's storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Create an empty buffer with no storage.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create an empty buffer with at least `capacity` bytes reserved.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve(capacity)
            .map_err(|_| SealpackError::out_of_memory(capacity))?;
        Ok(Self { data })
    }

    /// Number of bytes currently stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current storage capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Ensure room for at least `additional` more bytes.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.data
            .try_reserve(additional)
            .map_err(|_| SealpackError::out_of_memory(additional))
    }

    /// Append a single byte, growing if needed.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        self.reserve(1)?;
        self.data.push(byte);
        Ok(())
    }

    /// Append a byte slice, growing if needed.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Append `count` copies of `byte`.
    pub fn extend_repeat(&mut self, byte: u8, count: usize) -> Result<()> {
        self.reserve(count)?;
        self.data.resize(self.data.len() + count, byte);
        Ok(())
    }

    /// View the contents as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return the underlying vector.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Drop all contents, keeping the storage.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl From<Buffer> for Vec<u8> {
    fn from(buffer: Buffer) -> Self {
        buffer.data
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl std::ops::Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}
