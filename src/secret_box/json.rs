//! JSON values in and out of base64 envelopes.
//!
//! `encrypt_json` serializes with `serde_json`, encrypts the UTF-8 bytes
//! and returns the envelope as standard (padded) base64 text.
//! `decrypt_json` reverses each step.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use zeroize::Zeroizing;

use super::store::SecretBox;
use crate::errors::{Result, SecretBoxError};

impl SecretBox {
    /// Serialize `value` to JSON, encrypt it, and return base64 text.
    pub fn encrypt_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        self.key()?;

        let json = Zeroizing::new(serde_json::to_vec(value).map_err(SecretBoxError::Serialization)?);
        let envelope = self.encrypt_buffer(&json)?;
        Ok(BASE64.encode(envelope))
    }

    /// Decode base64 text, decrypt it, and parse the JSON inside.
    ///
    /// Leading and trailing whitespace around the base64 text is ignored.
    pub fn decrypt_json<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        self.key()?;

        let envelope = BASE64.decode(text.trim()).map_err(|e| {
            SecretBoxError::DecryptionFailed(format!("envelope is not valid base64: {e}"))
        })?;
        let plaintext = Zeroizing::new(self.decrypt_buffer(&envelope)?);

        let json = std::str::from_utf8(&plaintext).map_err(|e| {
            SecretBoxError::Parse(format!("decrypted data is not valid UTF-8: {e}"))
        })?;
        serde_json::from_str(json)
            .map_err(|e| SecretBoxError::Parse(format!("decrypted data is not valid JSON: {e}")))
    }
}
