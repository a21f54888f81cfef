//! Key material for SecretBox.
//!
//! A [`Key`] is 32 raw bytes held in memory only.  It can be:
//! - generated from the OS-seeded CSPRNG (`Key::generate`),
//! - decoded from its 64-character hex form (`Key::from_hex`),
//! - derived from a password as `SHA-256(password)` (`Key::from_password`).
//!
//! For the authenticated mode, HKDF-SHA256 expands the key into
//! independent encryption and MAC sub-keys.

use std::fmt;

use hkdf::Hkdf;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, SecretBoxError};

/// Length of a key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Length of a key in its hex representation.
pub const KEY_HEX_LEN: usize = KEY_LEN * 2;

/// A 256-bit symmetric key that zeroes its memory when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Key {
    bytes: [u8; KEY_LEN],
}

impl Key {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Decode a key from hex.
    ///
    /// Accepts upper- or lowercase digits.  Anything that does not decode
    /// to exactly 32 bytes is rejected, which in particular rejects every
    /// string whose length is not 64.
    pub fn from_hex(hex_key: &str) -> Result<Self> {
        if hex_key.len() != KEY_HEX_LEN {
            return Err(SecretBoxError::InvalidKey(format!(
                "expected {KEY_HEX_LEN} hex characters, got {}",
                hex_key.len()
            )));
        }

        let mut bytes = [0u8; KEY_LEN];
        hex::decode_to_slice(hex_key, &mut bytes)
            .map_err(|e| SecretBoxError::InvalidKey(format!("not a hex string: {e}")))?;
        Ok(Self { bytes })
    }

    /// Derive a key from a password: `SHA-256(utf8(password))`.
    ///
    /// The same password always yields the same key.
    pub fn from_password(password: &str) -> Result<Self> {
        if password.is_empty() {
            return Err(SecretBoxError::InvalidPassword(
                "password cannot be empty".into(),
            ));
        }

        let digest = Sha256::digest(password.as_bytes());
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&digest);
        Ok(Self { bytes })
    }

    /// Lowercase hex form (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Derive the AES sub-key used by the authenticated mode.
    pub fn derive_encryption_key(&self) -> Result<Key> {
        hkdf_derive(&self.bytes, b"secretbox-enc")
    }

    /// Derive the HMAC sub-key used by the authenticated mode.
    pub fn derive_mac_key(&self) -> Result<Key> {
        hkdf_derive(&self.bytes, b"secretbox-mac")
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for Key {}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(<redacted>)")
    }
}

/// Run HKDF-SHA256 expand with the given `info`.
///
/// The extract step uses no salt: the input key already carries full
/// entropy or is the caller's chosen secret.
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<Key> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| SecretBoxError::InvalidKey(format!("HKDF expand failed: {e}")))?;

    let key = Key::from_bytes(okm);
    okm.zeroize();
    Ok(key)
}
