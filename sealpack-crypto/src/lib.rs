//! # Sealpack Crypto
//!
//! Stream ciphers for the Sealpack pipeline:
//!
//! - [`chacha20`]: ChaCha20 with a 96-bit nonce (RFC 7539 block function)
//! - [`salsa20`]: Salsa20 with a 64-bit nonce
//! - [`rc4`]: RC4, kept for compatibility with old archives
//!
//! Keys and nonces are derived from a passphrase by the mixing function in
//! [`kdf`]. The derivation is deterministic, so decryption needs only the
//! passphrase; the nonce also travels in the envelope and the stored copy
//! is authoritative when decrypting.
//!
//! None of this is authenticated encryption: a flipped ciphertext bit
//! yields flipped plaintext, not an error. The envelope length check
//! catches truncation, nothing more.
//!
//! ## Example
//!
//! ```rust
//! use sealpack_crypto::{decrypt_data, encrypt_data, Cipher};
//!
//! let sealed = encrypt_data(b"attack at dawn", b"hunter2", Cipher::Chacha20).unwrap();
//! let opened = decrypt_data(&sealed, b"hunter2", Cipher::Chacha20).unwrap();
//! assert_eq!(opened.as_slice(), b"attack at dawn");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod chacha20;
pub mod kdf;
pub mod rc4;
pub mod salsa20;

use sealpack_core::{Buffer, Result, SealpackError};
use std::fmt;
use std::str::FromStr;

/// The available stream ciphers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cipher {
    /// ChaCha20. The default.
    #[default]
    Chacha20,
    /// Salsa20.
    Salsa20,
    /// RC4.
    Rc4,
}

impl Cipher {
    /// All ciphers, in display order.
    pub const ALL: [Cipher; 3] = [Cipher::Chacha20, Cipher::Salsa20, Cipher::Rc4];

    /// The canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Cipher::Chacha20 => "chacha20",
            Cipher::Salsa20 => "salsa20",
            Cipher::Rc4 => "rc4",
        }
    }
}

impl fmt::Display for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Cipher {
    type Err = SealpackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chacha20" => Ok(Cipher::Chacha20),
            "salsa20" => Ok(Cipher::Salsa20),
            "rc4" => Ok(Cipher::Rc4),
            other => Err(SealpackError::invalid_argument(format!(
                "unknown cipher: {other}"
            ))),
        }
    }
}

fn check_args(input: &[u8], passphrase: &[u8]) -> Result<()> {
    if input.is_empty() {
        return Err(SealpackError::invalid_argument("empty input"));
    }
    if passphrase.is_empty() {
        return Err(SealpackError::invalid_argument("empty passphrase"));
    }
    Ok(())
}

/// Encrypt `input` under a passphrase with the chosen cipher.
///
/// Fails with `InvalidArgument` on empty input or passphrase.
pub fn encrypt_data(input: &[u8], passphrase: &[u8], cipher: Cipher) -> Result<Buffer> {
    check_args(input, passphrase)?;
    match cipher {
        Cipher::Chacha20 => chacha20::encrypt(input, passphrase),
        Cipher::Salsa20 => salsa20::encrypt(input, passphrase),
        Cipher::Rc4 => rc4::encrypt(input, passphrase),
    }
}

/// Decrypt an envelope produced by [`encrypt_data`] with the same cipher
/// and passphrase.
pub fn decrypt_data(input: &[u8], passphrase: &[u8], cipher: Cipher) -> Result<Buffer> {
    check_args(input, passphrase)?;
    match cipher {
        Cipher::Chacha20 => chacha20::decrypt(input, passphrase),
        Cipher::Salsa20 => salsa20::decrypt(input, passphrase),
        Cipher::Rc4 => rc4::decrypt(input, passphrase),
    }
}
