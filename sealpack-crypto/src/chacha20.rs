//! ChaCha20 stream cipher.
//!
//! The block function follows RFC 7539: 96-bit nonce, 32-bit block
//! counter starting at 1. The envelope stores the nonce in front of the
//! length header so decryption does not have to re-derive it:
//!
//! ```text
//! [nonce: 12][original_size: u64 LE][ciphertext]
//! ```
//!
//! The cipher key is the full 32-byte passphrase digest; the nonce is the
//! first 12 bytes of the same digest.

use crate::kdf;
use sealpack_core::{Buffer, Result, SealpackError};

/// Key length in bytes.
pub const KEY_SIZE: usize = 32;

/// Nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

const BLOCK_SIZE: usize = 64;
const HEADER_SIZE: usize = NONCE_SIZE + 8;

const CONSTANTS: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] = (state[d] ^ state[a]).rotate_left(16);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_left(12);
    state[a] = state[a].wrapping_add(state[b]);
    state[d] = (state[d] ^ state[a]).rotate_left(8);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_left(7);
}

fn block(input: &[u32; 16]) -> [u8; BLOCK_SIZE] {
    let mut state = *input;
    for _ in 0..10 {
        quarter_round(&mut state, 0, 4, 8, 12);
        quarter_round(&mut state, 1, 5, 9, 13);
        quarter_round(&mut state, 2, 6, 10, 14);
        quarter_round(&mut state, 3, 7, 11, 15);
        quarter_round(&mut state, 0, 5, 10, 15);
        quarter_round(&mut state, 1, 6, 11, 12);
        quarter_round(&mut state, 2, 7, 8, 13);
        quarter_round(&mut state, 3, 4, 9, 14);
    }
    let mut output = [0u8; BLOCK_SIZE];
    for (i, (word, start)) in state.iter().zip(input).enumerate() {
        let sum = word.wrapping_add(*start);
        output[i * 4..i * 4 + 4].copy_from_slice(&sum.to_le_bytes());
    }
    output
}

/// ChaCha20 keystream state.
#[derive(Clone)]
pub struct ChaCha20 {
    state: [u32; 16],
    keystream: [u8; BLOCK_SIZE],
    pos: usize,
}

impl ChaCha20 {
    /// Set up the state for `key`, `nonce`, and an initial block counter.
    pub fn new(key: &[u8; KEY_SIZE], nonce: &[u8; NONCE_SIZE], counter: u32) -> Self {
        let mut state = [0u32; 16];
        state[..4].copy_from_slice(&CONSTANTS);
        for i in 0..8 {
            state[4 + i] = u32::from_le_bytes([
                key[i * 4],
                key[i * 4 + 1],
                key[i * 4 + 2],
                key[i * 4 + 3],
            ]);
        }
        state[12] = counter;
        for i in 0..3 {
            state[13 + i] = u32::from_le_bytes([
                nonce[i * 4],
                nonce[i * 4 + 1],
                nonce[i * 4 + 2],
                nonce[i * 4 + 3],
            ]);
        }
        Self {
            state,
            keystream: [0u8; BLOCK_SIZE],
            pos: BLOCK_SIZE,
        }
    }

    /// XOR the keystream into `data` in place.
    ///
    /// Fails with `InvalidArgument` if the 32-bit block counter would
    /// wrap, which would repeat keystream under the same nonce.
    pub fn apply_keystream(&mut self, data: &mut [u8]) -> Result<()> {
        for byte in data {
            if self.pos >= BLOCK_SIZE {
                self.keystream = block(&self.state);
                self.pos = 0;
                self.state[12] = self.state[12].checked_add(1).ok_or_else(|| {
                    SealpackError::invalid_argument("keystream exhausted for this nonce")
                })?;
            }
            *byte ^= self.keystream[self.pos];
            self.pos += 1;
        }
        Ok(())
    }
}

fn derive(passphrase: &[u8]) -> ([u8; KEY_SIZE], [u8; NONCE_SIZE]) {
    let digest = kdf::digest(passphrase);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&digest[..NONCE_SIZE]);
    (digest, nonce)
}

/// Encrypt `input` into a ChaCha20 envelope.
pub fn encrypt(input: &[u8], passphrase: &[u8]) -> Result<Buffer> {
    let (key, nonce) = derive(passphrase);
    let mut cipher = ChaCha20::new(&key, &nonce, 1);

    let mut output = Buffer::with_capacity(HEADER_SIZE + input.len())?;
    output.extend_from_slice(&nonce)?;
    output.extend_from_slice(&(input.len() as u64).to_le_bytes())?;

    let mut body = input.to_vec();
    cipher.apply_keystream(&mut body)?;
    output.extend_from_slice(&body)?;
    Ok(output)
}

/// Decrypt a ChaCha20 envelope.
///
/// The nonce stored in the envelope is the one used, so an archive moved
/// between tool versions still opens as long as the digest matches.
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
    let mut cipher = ChaCha20::new(&key, &nonce, 1);

    let mut body = input[HEADER_SIZE..].to_vec();
    cipher.apply_keystream(&mut body)?;

    let mut output = Buffer::with_capacity(body.len())?;
    output.extend_from_slice(&body)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rfc_key() -> [u8; KEY_SIZE] {
        let mut key = [0u8; KEY_SIZE];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = i as u8;
        }
        key
    }

    // RFC 7539 section 2.3.2 block function test vector.
    #[test]
    fn test_rfc7539_block() {
        let nonce: [u8; NONCE_SIZE] = [
            0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, 0x4a, 0x00, 0x00, 0x00, 0x00,
        ];
        let cipher = ChaCha20::new(&rfc_key(), &nonce, 1);
        let keystream = block(&cipher.state);
        assert_eq!(
            &keystream[..16],
            &[
                0x10, 0xf1, 0xe7, 0xe4, 0xd1, 0x3b, 0x59, 0x15, 0x50, 0x0f, 0xdd, 0x1f, 0xa3,
                0x20, 0x71, 0xc4
            ]
        );
    }

    // RFC 7539 section 2.4.2 encryption test vector.
    #[test]
    fn test_rfc7539_encryption() {
        let nonce: [u8; NONCE_SIZE] = [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x4a, 0x00, 0x00, 0x00, 0x00,
        ];
        let mut data = b"Ladies and Gentlemen of the class of '99: If I could offer you \
                         only one tip for the future, sunscreen would be it."
            .to_vec();
        let mut cipher = ChaCha20::new(&rfc_key(), &nonce, 1);
        cipher.apply_keystream(&mut data).unwrap();
        assert_eq!(
            &data[..16],
            &[
                0x6e, 0x2e, 0x35, 0x9a, 0x25, 0x68, 0xf9, 0x80, 0x41, 0xba, 0x07, 0x28, 0xdd,
                0x0d, 0x69, 0x81
            ]
        );
    }

    #[test]
    fn test_keystream_is_symmetric() {
        let key = rfc_key();
        let nonce = [7u8; NONCE_SIZE];
        let mut data = vec![0xAB; 200];
        let mut cipher = ChaCha20::new(&key, &nonce, 1);
        cipher.apply_keystream(&mut data).unwrap();
        assert_ne!(data, vec![0xAB; 200]);
        let mut cipher = ChaCha20::new(&key, &nonce, 1);
        cipher.apply_keystream(&mut data).unwrap();
        assert_eq!(data, vec![0xAB; 200]);
    }

    #[test]
    fn test_counter_separates_blocks() {
        let key = rfc_key();
        let nonce = [1u8; NONCE_SIZE];
        let mut first = vec![0u8; 64];
        let mut second = vec![0u8; 64];
        ChaCha20::new(&key, &nonce, 1)
            .apply_keystream(&mut first)
            .unwrap();
        ChaCha20::new(&key, &nonce, 2)
            .apply_keystream(&mut second)
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_envelope_roundtrip() {
        let sealed = encrypt(b"hello chacha", b"passphrase").unwrap();
        assert_eq!(sealed.len(), 12 + 8 + 12);
        assert_eq!(&sealed[12..20], &12u64.to_le_bytes());
        let opened = decrypt(&sealed, b"passphrase").unwrap();
        assert_eq!(opened.as_slice(), b"hello chacha");
    }

    #[test]
    fn test_nonce_comes_from_digest() {
        let sealed = encrypt(b"x", b"secret").unwrap();
        assert_eq!(&sealed[..NONCE_SIZE], &kdf::digest(b"secret")[..NONCE_SIZE]);
    }

    #[test]
    fn test_bad_envelope_length_rejected() {
        let mut sealed = encrypt(b"hello", b"pass").unwrap().into_vec();
        sealed.pop();
        assert!(matches!(
            decrypt(&sealed, b"pass"),
            Err(SealpackError::Corrupted { .. })
        ));
        assert!(matches!(
            decrypt(&[0u8; 10], b"pass"),
            Err(SealpackError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_huge_declared_size_rejected() {
        // A header claiming u64::MAX bytes must come back as Corrupted,
        // not trip an arithmetic overflow.
        let mut sealed = vec![0u8; HEADER_SIZE];
        sealed[NONCE_SIZE..HEADER_SIZE].copy_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(
            decrypt(&sealed, b"pass"),
            Err(SealpackError::Corrupted { .. })
        ));
    }
}
