//! Passphrase digest for key and nonce derivation.
//!
//! A fixed 32-byte mixing function, not a real KDF: no salt, no memory
//! hardness, and the archive format depends on its exact output, so it
//! must never change. Cipher keys take the whole digest (or a prefix) and
//! nonces take a prefix of the digest of the same passphrase.

/// Number of bytes produced by [`digest`].
pub const DIGEST_SIZE: usize = 32;

/// Digest `input` into 32 bytes.
///
/// The state starts from the SHA-256 initialization constants, absorbs
/// one input byte per step, then runs 1000 stirring rounds. Output words
/// are serialized little-endian.
pub fn digest(input: &[u8]) -> [u8; DIGEST_SIZE] {
    let mut state: [u32; 8] = [
        0x6a09_e667,
        0xbb67_ae85,
        0x3c6e_f372,
        0xa54f_f53a,
        0x510e_527f,
        0x9b05_688c,
        0x1f83_d9ab,
        0x5be0_cd19,
    ];

    for (i, &byte) in input.iter().enumerate() {
        let idx = i % 8;
        state[idx] ^= u32::from(byte);
        state[idx] = state[idx].rotate_left(7);
        state[(idx + 1) % 8] = state[(idx + 1) % 8].wrapping_add(state[idx]);
    }

    for _ in 0..1000 {
        for i in 0..8 {
            state[i] = state[i].wrapping_add(state[(i + 1) % 8]);
            state[i] = state[i].rotate_left(11);
        }
    }

    let mut output = [0u8; DIGEST_SIZE];
    for (i, word) in state.iter().enumerate() {
        output[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    output
}
