//! Cryptographic primitives for SecretBox.
//!
//! This module provides:
//! - The 256-bit `Key` type, hex codec and password derivation (`keys`)
//! - AES-256-CBC encryption and decryption with a random IV (`encryption`)
//! - Optional encrypt-then-MAC with HMAC-SHA256 (`auth`)

pub mod auth;
pub mod encryption;
pub mod keys;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

// Re-export the most commonly used items so callers can write:
//   use secretbox::crypto::{encrypt, decrypt, Key};
pub use encryption::{decrypt, encrypt, encrypt_with_iv, BLOCK_LEN, IV_LEN};
pub use keys::{Key, KEY_HEX_LEN, KEY_LEN};

/// How envelopes are built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CipherMode {
    /// `IV || ciphertext`, no integrity protection.
    #[default]
    Cbc,
    /// `IV || ciphertext || HMAC-SHA256`, verified before decrypting.
    CbcHmacSha256,
}

impl CipherMode {
    /// Encrypt `plaintext` into an envelope for this mode.
    pub fn seal(self, key: &Key, plaintext: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Cbc => Ok(encryption::encrypt(key, plaintext)),
            Self::CbcHmacSha256 => auth::seal(key, plaintext),
        }
    }

    /// Decrypt an envelope built by `seal` in the same mode.
    pub fn open(self, key: &Key, envelope: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Cbc => encryption::decrypt(key, envelope),
            Self::CbcHmacSha256 => auth::open(key, envelope),
        }
    }
}
