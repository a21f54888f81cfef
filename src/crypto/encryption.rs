//! AES-256-CBC encryption with PKCS#7 padding.
//!
//! Each call to `encrypt` generates a fresh random 16-byte IV and
//! prepends it to the ciphertext.  `decrypt` splits the IV back out
//! before decrypting.
//!
//! Layout of the returned byte buffer:
//!   [ 16-byte IV | ciphertext (multiple of 16 bytes) ]
//!
//! There is no integrity check here.  A tampered envelope either fails
//! the padding check or decrypts to garbage; see `auth` for the
//! authenticated variant.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;

use super::keys::Key;
use crate::errors::{Result, SecretBoxError};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Size of the CBC initialization vector in bytes.
pub const IV_LEN: usize = 16;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Encrypt `plaintext` under `key` with a fresh random IV.
///
/// Returns the IV prepended to the ciphertext (IV || ciphertext).
pub fn encrypt(key: &Key, plaintext: &[u8]) -> Vec<u8> {
    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut iv);
    encrypt_with_iv(key, &iv, plaintext)
}

/// Encrypt with a caller-chosen IV.
///
/// Reusing an IV under the same key leaks equality of plaintext
/// prefixes.  Only use this for reproducible test vectors; `encrypt`
/// is the function to call otherwise.
pub fn encrypt_with_iv(key: &Key, iv: &[u8; IV_LEN], plaintext: &[u8]) -> Vec<u8> {
    let ciphertext = Aes256CbcEnc::new(key.as_bytes().into(), iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut output = Vec::with_capacity(IV_LEN + ciphertext.len());
    output.extend_from_slice(iv);
    output.extend_from_slice(&ciphertext);
    output
}

/// Decrypt an envelope produced by `encrypt`.
///
/// Expects the first 16 bytes to be the IV, followed by a non-empty
/// ciphertext whose length is a multiple of the block size.
pub fn decrypt(key: &Key, envelope: &[u8]) -> Result<Vec<u8>> {
    if envelope.len() < IV_LEN {
        return Err(SecretBoxError::DecryptionFailed(format!(
            "envelope is {} bytes, shorter than the {IV_LEN}-byte IV",
            envelope.len()
        )));
    }

    let (iv, ciphertext) = envelope.split_at(IV_LEN);

    // PKCS#7 always adds at least one byte, so an empty ciphertext is
    // as malformed as a ragged one.
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(SecretBoxError::DecryptionFailed(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
            ciphertext.len()
        )));
    }

    Aes256CbcDec::new(key.as_bytes().into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| {
            SecretBoxError::DecryptionFailed("invalid padding — wrong key or corrupted data".into())
        })
}
