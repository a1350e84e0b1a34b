//! Run-length encoding.
//!
//! The simplest of the four codecs: the input is split into maximal runs of
//! a repeated byte, and every run is emitted as a `(count, value)` pair.
//! Runs are capped at [`MAX_RUN`] bytes, so a run of 300 identical bytes
//! becomes two pairs. Single bytes also get a pair, which means
//! non-repetitive input doubles in size. That is intentional: the format
//! stays trivially seekable and the dispatcher leaves algorithm choice to
//! the caller.
//!
//! Wire format (all fields little-endian):
//!
//! ```text
//! [original_size: u64][pair_bytes: u64][count: u8, value: u8]...
//! ```

use crate::wire;
use sealpack_core::{Buffer, Result, SealpackError};

/// Longest run a single `(count, value)` pair can describe.
pub const MAX_RUN: usize = 255;

/// Size in bytes of the serialized header.
const HEADER_SIZE: usize = 16;

/// A single `(count, value)` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// Number of repetitions, 1..=255.
    pub count: u8,
    /// The repeated byte.
    pub value: u8,
}

/// In-memory form of run-length compressed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RleCompressed {
    /// The encoded runs, in input order.
    pub runs: Vec<Run>,
    /// Length of the original input in bytes.
    pub original_size: u64,
}

/// Compress `input` into a sequence of runs.
///
/// Fails with `InvalidArgument` on empty input.
pub fn compress(input: &[u8]) -> Result<RleCompressed> {
    if input.is_empty() {
        return Err(SealpackError::invalid_argument("empty input"));
    }

    let mut runs = Vec::new();
    let mut pos = 0;
    while pos < input.len() {
        let value = input[pos];
        let mut count = 1;
        while count < MAX_RUN && pos + count < input.len() && input[pos + count] == value {
            count += 1;
        }
        runs.push(Run {
            count: count as u8,
            value,
        });
        pos += count;
    }

    Ok(RleCompressed {
        runs,
        original_size: input.len() as u64,
    })
}

/// Expand runs back into the original bytes.
///
/// Runs past the point where `original_size` bytes have been produced are
/// ignored. Fails with `Corrupted` if a run would overrun the declared
/// size, or `SizeMismatch` if the runs fall short of it.
pub fn decompress(compressed: &RleCompressed) -> Result<Buffer> {
    let original_size = compressed.original_size as usize;
    let mut output = Buffer::with_capacity(original_size)?;

    for run in &compressed.runs {
        if output.len() >= original_size {
            break;
        }
        let count = run.count as usize;
        if output.len() + count > original_size {
            return Err(SealpackError::corrupted(
                output.len() as u64,
                "run overruns declared original size",
            ));
        }
        output.extend_repeat(run.value, count)?;
    }

    if output.len() as u64 != compressed.original_size {
        return Err(SealpackError::size_mismatch(
            compressed.original_size,
            output.len() as u64,
        ));
    }
    Ok(output)
}

impl RleCompressed {
    /// Serialize to the wire format.
    pub fn to_bytes(&self) -> Result<Buffer> {
        let pair_bytes = self.runs.len() * 2;
        let mut out = Buffer::with_capacity(HEADER_SIZE + pair_bytes)?;
        out.extend_from_slice(&self.original_size.to_le_bytes())?;
        out.extend_from_slice(&(pair_bytes as u64).to_le_bytes())?;
        for run in &self.runs {
            out.push(run.count)?;
            out.push(run.value)?;
        }
        Ok(out)
    }

    /// Parse the wire format.
    ///
    /// The input must be exactly `16 + pair_bytes` long and `pair_bytes`
    /// must be even; anything else is `Corrupted`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let original_size = wire::read_u64_le(data, 0)?;
        let pair_bytes = wire::read_u64_le(data, 8)?;

        if pair_bytes % 2 != 0 {
            return Err(SealpackError::corrupted(8, "odd run pair byte count"));
        }
        // Header parse succeeding guarantees data.len() >= HEADER_SIZE.
        if (data.len() - HEADER_SIZE) as u64 != pair_bytes {
            return Err(SealpackError::corrupted(
                HEADER_SIZE as u64,
                "run data length disagrees with header",
            ));
        }

        let runs = data[HEADER_SIZE..]
            .chunks_exact(2)
            .map(|pair| Run {
                count: pair[0],
                value: pair[1],
            })
            .collect();
        Ok(Self {
            runs,
            original_size,
        })
    }
}
