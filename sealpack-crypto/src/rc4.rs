//! RC4 stream cipher.
//!
//! Kept for compatibility; RC4 keystream biases are well known and new
//! archives should prefer [`crate::chacha20`]. The envelope is the
//! smallest of the three ciphers, a length header and the ciphertext:
//!
//! ```text
//! [original_size: u64 LE][ciphertext]
//! ```
//!
//! The cipher key is the first 16 bytes of the passphrase digest.

use crate::kdf;
use sealpack_core::{Buffer, Result, SealpackError};

/// Derived key length in bytes.
pub const KEY_SIZE: usize = 16;

const HEADER_SIZE: usize = 8;

/// RC4 keystream state.
#[derive(Clone)]
pub struct Rc4 {
    s: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4 {
    /// Run the key schedule over `key`. The key must not be empty.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.is_empty() {
            return Err(SealpackError::invalid_argument("empty RC4 key"));
        }
        let mut s = [0u8; 256];
        for (i, slot) in s.iter_mut().enumerate() {
            *slot = i as u8;
        }
        let mut j = 0u8;
        for i in 0..256 {
            j = j
                .wrapping_add(s[i])
                .wrapping_add(key[i % key.len()]);
            s.swap(i, usize::from(j));
        }
        Ok(Self { s, i: 0, j: 0 })
    }

    /// XOR the keystream into `data` in place. Encryption and decryption
    /// are the same operation.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data {
            self.i = self.i.wrapping_add(1);
            self.j = self.j.wrapping_add(self.s[usize::from(self.i)]);
            self.s.swap(usize::from(self.i), usize::from(self.j));
            let k = self.s[usize::from(
                self.s[usize::from(self.i)].wrapping_add(self.s[usize::from(self.j)]),
            )];
            *byte ^= k;
        }
    }
}

fn derive_key(passphrase: &[u8]) -> [u8; KEY_SIZE] {
    let digest = kdf::digest(passphrase);
    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&digest[..KEY_SIZE]);
    key
}

/// Encrypt `input` into an RC4 envelope.
pub fn encrypt(input: &[u8], passphrase: &[u8]) -> Result<Buffer> {
    let key = derive_key(passphrase);
    let mut cipher = Rc4::new(&key)?;

    let mut output = Buffer::with_capacity(HEADER_SIZE + input.len())?;
    output.extend_from_slice(&(input.len() as u64).to_le_bytes())?;

    let mut body = input.to_vec();
    cipher.apply_keystream(&mut body);
    output.extend_from_slice(&body)?;
    Ok(output)
}

/// Decrypt an RC4 envelope.
///
/// Fails with `Corrupted` when the header length disagrees with the
/// envelope length.
pub fn decrypt(input: &[u8], passphrase: &[u8]) -> Result<Buffer> {
    if input.len() < HEADER_SIZE {
        return Err(SealpackError::unexpected_eof(HEADER_SIZE - input.len()));
    }
    let mut size_bytes = [0u8; 8];
    size_bytes.copy_from_slice(&input[..HEADER_SIZE]);
    let original_size = u64::from_le_bytes(size_bytes);

    // The length guard above makes this subtraction safe.
    if original_size != (input.len() - HEADER_SIZE) as u64 {
        return Err(SealpackError::corrupted(
            HEADER_SIZE as u64,
            "ciphertext length disagrees with header",
        ));
    }

    let key = derive_key(passphrase);
    let mut cipher = Rc4::new(&key)?;

    let mut body = input[HEADER_SIZE..].to_vec();
    cipher.apply_keystream(&mut body);

    let mut output = Buffer::with_capacity(body.len())?;
    output.extend_from_slice(&body)?;
    Ok(output)
}
