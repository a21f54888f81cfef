//! Encrypt-then-MAC on top of the CBC envelope.
//!
//! Layout:
//!   [ 16-byte IV | ciphertext | 32-byte HMAC-SHA256(IV || ciphertext) ]
//!
//! The AES and HMAC keys are independent HKDF expansions of the caller's
//! key, so the same `Key` can be used with either mode.  The tag is
//! checked in constant time before any decryption happens.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::encryption;
use super::keys::Key;
use crate::errors::{Result, SecretBoxError};

type HmacSha256 = Hmac<Sha256>;

/// Size of the HMAC-SHA256 tag appended to the envelope.
pub const TAG_LEN: usize = 32;

/// Encrypt and authenticate `plaintext` under `key`.
pub fn seal(key: &Key, plaintext: &[u8]) -> Result<Vec<u8>> {
    let enc_key = key.derive_encryption_key()?;
    let mac_key = key.derive_mac_key()?;

    let mut envelope = encryption::encrypt(&enc_key, plaintext);
    let tag = compute_tag(&mac_key, &envelope)?;
    envelope.extend_from_slice(&tag);
    Ok(envelope)
}

/// Verify and decrypt an envelope produced by `seal`.
pub fn open(key: &Key, sealed: &[u8]) -> Result<Vec<u8>> {
    if sealed.len() < encryption::IV_LEN + TAG_LEN {
        return Err(SecretBoxError::DecryptionFailed(format!(
            "authenticated envelope is {} bytes, too short for IV and tag",
            sealed.len()
        )));
    }

    let (envelope, tag) = sealed.split_at(sealed.len() - TAG_LEN);

    let mac_key = key.derive_mac_key()?;
    let mut mac = new_mac(&mac_key)?;
    mac.update(envelope);
    mac.verify_slice(tag)
        .map_err(|_| SecretBoxError::AuthenticationFailed)?;

    let enc_key = key.derive_encryption_key()?;
    encryption::decrypt(&enc_key, envelope)
}

fn compute_tag(mac_key: &Key, data: &[u8]) -> Result<[u8; TAG_LEN]> {
    let mut mac = new_mac(mac_key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

fn new_mac(mac_key: &Key) -> Result<HmacSha256> {
    <HmacSha256 as Mac>::new_from_slice(mac_key.as_bytes())
        .map_err(|e| SecretBoxError::InvalidKey(format!("HMAC init failed: {e}")))
}
