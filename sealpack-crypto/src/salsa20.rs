//! Salsa20 stream cipher.
//!
//! Same family as [`crate::chacha20`] but with the original Salsa20 state
//! layout: constants on the diagonal, 64-bit nonce, 64-bit block counter
//! starting at 0. The envelope mirrors the ChaCha20 one with the shorter
//! nonce:
//!
//! ```text
//! [nonce: 8][original_size: u64 LE][ciphertext]
//! ```
//!
//! The cipher key is the full 32-byte passphrase digest; the nonce is the
//! first 8 bytes of the same digest.

use crate::kdf;
use sealpack_core::{Buffer, Result, SealpackError};

/// Key length in bytes.
pub const KEY_SIZE: usize = 32;

/// Nonce length in bytes.
pub const NONCE_SIZE: usize = 8;

const BLOCK_SIZE: usize = 64;
const HEADER_SIZE: usize = NONCE_SIZE + 8;

const CONSTANTS: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

fn quarter_round(state: &mut [u32; 16], y0: usize, y1: usize, y2: usize, y3: usize) {
    state[y1] ^= state[y0].wrapping_add(state[y3]).rotate_left(7);
    state[y2] ^= state[y1].wrapping_add(state[y0]).rotate_left(9);
    state[y3] ^= state[y2].wrapping_add(state[y1]).rotate_left(13);
    state[y0] ^= state[y3].wrapping_add(state[y2]).rotate_left(18);
}

fn block(input: &[u32; 16]) -> [u8; BLOCK_SIZE] {
    let mut state = *input;
    for _ in 0..10 {
        // Column round.
        quarter_round(&mut state, 0, 4, 8, 12);
        quarter_round(&mut state, 5, 9, 13, 1);
        quarter_round(&mut state, 10, 14, 2, 6);
        quarter_round(&mut state, 15, 3, 7, 11);
        // Row round.
        quarter_round(&mut state, 0, 1, 2, 3);
        quarter_round(&mut state, 5, 6, 7, 4);
        quarter_round(&mut state, 10, 11, 8, 9);
        quarter_round(&mut state, 15, 12, 13, 14);
    }
    let mut output = [0u8; BLOCK_SIZE];
    for (i, (word, start)) in state.iter().zip(input).enumerate() {
        let sum = word.wrapping_add(*start);
        output[i * 4..i * 4 + 4].copy_from_slice(&sum.to_le_bytes());
    }
    output
}

/// Salsa20 keystream state.
#[derive(Clone)]
pub struct Salsa20 {
    state: [u32; 16],
    counter: u64,
    keystream: [u8; BLOCK_SIZE],
    pos: usize,
}

impl Salsa20 {
    /// Set up the state for `key`, `nonce`, and an initial block counter.
    pub fn new(key: &[u8; KEY_SIZE], nonce: &[u8; NONCE_SIZE], counter: u64) -> Self {
        let mut state = [0u32; 16];
        state[0] = CONSTANTS[0];
        state[5] = CONSTANTS[1];
        state[10] = CONSTANTS[2];
        state[15] = CONSTANTS[3];
        for i in 0..4 {
            state[1 + i] = u32::from_le_bytes([
                key[i * 4],
                key[i * 4 + 1],
                key[i * 4 + 2],
                key[i * 4 + 3],
            ]);
            state[11 + i] = u32::from_le_bytes([
                key[16 + i * 4],
                key[16 + i * 4 + 1],
                key[16 + i * 4 + 2],
                key[16 + i * 4 + 3],
            ]);
        }
        state[6] = u32::from_le_bytes([nonce[0], nonce[1], nonce[2], nonce[3]]);
        state[7] = u32::from_le_bytes([nonce[4], nonce[5], nonce[6], nonce[7]]);
        state[8] = counter as u32;
        state[9] = (counter >> 32) as u32;
        Self {
            state,
            counter,
            keystream: [0u8; BLOCK_SIZE],
            pos: BLOCK_SIZE,
        }
    }

    /// XOR the keystream into `data` in place.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data {
            if self.pos >= BLOCK_SIZE {
                self.keystream = block(&self.state);
                self.pos = 0;
                self.counter = self.counter.wrapping_add(1);
                self.state[8] = self.counter as u32;
                self.state[9] = (self.counter >> 32) as u32;
            }
            *byte ^= self.keystream[self.pos];
            self.pos += 1;
        }
    }
}

fn derive(passphrase: &[u8]) -> ([u8; KEY_SIZE], [u8; NONCE_SIZE]) {
    let digest = kdf::digest(passphrase);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&digest[..NONCE_SIZE]);
    (digest, nonce)
}

/// Encrypt `input` into a Salsa20 envelope.
pub fn encrypt(input: &[u8], passphrase: &[u8]) -> Result<Buffer> {
    let (key, nonce) = derive(passphrase);
    let mut cipher = Salsa20::new(&key, &nonce, 0);

    let mut output = Buffer::with_capacity(HEADER_SIZE + input.len())?;
    output.extend_from_slice(&nonce)?;
    output.extend_from_slice(&(input.len() as u64).to_le_bytes())?;

    let mut body = input.to_vec();
    cipher.apply_keystream(&mut body);
    output.extend_from_slice(&body)?;
    Ok(output)
}

/// Decrypt a Salsa20 envelope.
pub fn decrypt(input: &[u8], passphrase: &[u8]) -> Result<Buffer> {
    if input.len() < HEADER_SIZE {
        return Err(SealpackError::unexpected_eof(HEADER_SIZE - input.len()));
    }
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&input[..NONCE_SIZE]);

    let mut size_bytes = [0u8; 8];
    size_bytes.copy_from_slice(&input[NONCE_SIZE..HEADER_SIZE]);
    let original_size = u64::from_le_bytes(size_bytes);

    // The length guard above makes this subtraction safe.
    if original_size != (input.len() - HEADER_SIZE) as u64 {
        return Err(SealpackError::corrupted(
            HEADER_SIZE as u64,
            "ciphertext length disagrees with header",
        ));
    }

    let (key, _) = derive(passphrase);
    let mut cipher = Salsa20::new(&key, &nonce, 0);

    let mut body = input[HEADER_SIZE..].to_vec();
    cipher.apply_keystream(&mut body);

    let mut output = Buffer::with_capacity(body.len())?;
    output.extend_from_slice(&body)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> [u8; KEY_SIZE] {
        let mut key = [0u8; KEY_SIZE];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = i as u8;
        }
        key
    }

    #[test]
    fn test_keystream_is_symmetric() {
        let key = test_key();
        let nonce = [3u8; NONCE_SIZE];
        let mut data = b"three hundred bytes of plaintext".repeat(10);
        let original = data.clone();
        let mut cipher = Salsa20::new(&key, &nonce, 0);
        cipher.apply_keystream(&mut data);
        assert_ne!(data, original);
        let mut cipher = Salsa20::new(&key, &nonce, 0);
        cipher.apply_keystream(&mut data);
        assert_eq!(data, original);
    }

    #[test]
    fn test_nonce_separates_streams() {
        let key = test_key();
        let mut first = vec![0u8; 64];
        let mut second = vec![0u8; 64];
        Salsa20::new(&key, &[0u8; NONCE_SIZE], 0).apply_keystream(&mut first);
        Salsa20::new(&key, &[1u8; NONCE_SIZE], 0).apply_keystream(&mut second);
        assert_ne!(first, second);
    }

    #[test]
    fn test_counter_separates_blocks() {
        let key = test_key();
        let nonce = [9u8; NONCE_SIZE];
        let mut first = vec![0u8; 64];
        let mut second = vec![0u8; 64];
        Salsa20::new(&key, &nonce, 0).apply_keystream(&mut first);
        Salsa20::new(&key, &nonce, 1).apply_keystream(&mut second);
        assert_ne!(first, second);
    }

    #[test]
    fn test_sequential_blocks_match_seeked_counter() {
        // Bytes 64..128 of a stream started at counter 0 equal bytes
        // 0..64 of a stream started at counter 1.
        let key = test_key();
        let nonce = [5u8; NONCE_SIZE];
        let mut long = vec![0u8; 128];
        Salsa20::new(&key, &nonce, 0).apply_keystream(&mut long);
        let mut seeked = vec![0u8; 64];
        Salsa20::new(&key, &nonce, 1).apply_keystream(&mut seeked);
        assert_eq!(&long[64..], &seeked[..]);
    }

    #[test]
    fn test_envelope_roundtrip() {
        let sealed = encrypt(b"hello salsa", b"passphrase").unwrap();
        assert_eq!(sealed.len(), 8 + 8 + 11);
        assert_eq!(&sealed[..NONCE_SIZE], &kdf::digest(b"passphrase")[..NONCE_SIZE]);
        assert_eq!(&sealed[8..16], &11u64.to_le_bytes());
        let opened = decrypt(&sealed, b"passphrase").unwrap();
        assert_eq!(opened.as_slice(), b"hello salsa");
    }

    #[test]
    fn test_bad_envelope_length_rejected() {
        let mut sealed = encrypt(b"hello", b"pass").unwrap().into_vec();
        sealed.push(0);
        assert!(matches!(
            decrypt(&sealed, b"pass"),
            Err(SealpackError::Corrupted { .. })
        ));
        assert!(matches!(
            decrypt(&[0u8; 12], b"pass"),
            Err(SealpackError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_huge_declared_size_rejected() {
        let mut sealed = vec![0u8; HEADER_SIZE];
        sealed[NONCE_SIZE..HEADER_SIZE].copy_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(
            decrypt(&sealed, b"pass"),
            Err(SealpackError::Corrupted { .. })
        ));
    }
}
