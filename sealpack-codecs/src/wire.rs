//! Small helpers for reading fixed-width header fields from byte slices.

use sealpack_core::{Result, SealpackError};

/// Read a little-endian `u64` starting at `offset`.
pub(crate) fn read_u64_le(data: &[u8], offset: usize) -> Result<u64> {
    let end = offset
        .checked_add(8)
        .ok_or_else(|| SealpackError::unexpected_eof(8))?;
    if end > data.len() {
        return Err(SealpackError::unexpected_eof(end - data.len()));
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..end]);
    Ok(u64::from_le_bytes(bytes))
}

/// Read a big-endian `u64` starting at `offset`.
pub(crate) fn read_u64_be(data: &[u8], offset: usize) -> Result<u64> {
    let end = offset
        .checked_add(8)
        .ok_or_else(|| SealpackError::unexpected_eof(8))?;
    if end > data.len() {
        return Err(SealpackError::unexpected_eof(end - data.len()));
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..end]);
    Ok(u64::from_be_bytes(bytes))
}

/// Read a little-endian `u32` starting at `offset`.
pub(crate) fn read_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    let end = offset
        .checked_add(4)
        .ok_or_else(|| SealpackError::unexpected_eof(4))?;
    if end > data.len() {
        return Err(SealpackError::unexpected_eof(end - data.len()));
    }
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..end]);
    Ok(u32::from_le_bytes(bytes))
}

/// Read a big-endian `u16` starting at `offset`.
pub(crate) fn read_u16_be(data: &[u8], offset: usize) -> Result<u16> {
    let end = offset
        .checked_add(2)
        .ok_or_else(|| SealpackError::unexpected_eof(2))?;
    if end > data.len() {
        return Err(SealpackError::unexpected_eof(end - data.len()));
    }
    Ok(u16::from_be_bytes([data[offset], data[offset + 1]]))
}
