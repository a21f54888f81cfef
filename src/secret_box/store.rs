//! The `SecretBox` handle: key state plus buffer encryption.
//!
//! A box starts without a key.  Every cryptographic operation checks for
//! one and fails with `SecretBoxError::MissingKey` instead of doing
//! nothing.  Key setters take `&mut self` and crypto takes `&self`, so a
//! box shared across threads needs an external lock to change its key.

use std::fmt;

use tracing::debug;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::{CipherMode, Key};
use crate::errors::{Result, SecretBoxError};

/// Holds one 256-bit key and encrypts/decrypts with it.
#[derive(Default)]
pub struct SecretBox {
    /// The active key, if any.
    key: Option<Key>,

    /// The password the key was derived from, when it was set that way.
    password: Option<Zeroizing<String>>,

    /// Envelope mode and file-writing options.
    settings: Settings,
}

impl SecretBox {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a box with default settings and no key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a box with explicit settings and no key.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            key: None,
            password: None,
            settings,
        }
    }

    /// Create a box that already holds `key`.
    pub fn with_key(key: Key) -> Self {
        let mut secret_box = Self::new();
        secret_box.use_key(key);
        secret_box
    }

    // ------------------------------------------------------------------
    // Key management
    // ------------------------------------------------------------------

    /// Generate a random key, make it the active key, and return its hex form.
    pub fn generate_random_key(&mut self) -> String {
        let key = Key::generate();
        let hex_key = key.to_hex();
        self.replace_key(key, None, "random");
        hex_key
    }

    /// Set the active key from its 64-character hex form.
    ///
    /// On error the previous key (if any) stays in place.
    pub fn set_key(&mut self, hex_key: &str) -> Result<()> {
        let key = Key::from_hex(hex_key)?;
        self.replace_key(key, None, "hex");
        Ok(())
    }

    /// Set the active key from an existing `Key` value.
    pub fn use_key(&mut self, key: Key) {
        self.replace_key(key, None, "value");
    }

    /// Derive the active key as SHA-256 of `password` and remember the password.
    ///
    /// Empty passwords are rejected and leave the box unchanged.
    pub fn set_password(&mut self, password: &str) -> Result<()> {
        let key = Key::from_password(password)?;
        self.replace_key(key, Some(Zeroizing::new(password.to_owned())), "password");
        Ok(())
    }

    /// The active key in lowercase hex.
    pub fn key_hex(&self) -> Result<String> {
        Ok(self.key()?.to_hex())
    }

    /// The active key.
    pub fn key(&self) -> Result<&Key> {
        self.key.as_ref().ok_or(SecretBoxError::MissingKey)
    }

    /// The password the active key was derived from.
    ///
    /// `None` when no password was set, or when the key was replaced
    /// afterwards by `set_key`, `use_key` or `generate_random_key`.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().map(String::as_str)
    }

    /// Returns `true` if a key is set.
    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// Drop the active key and remembered password.
    pub fn clear_key(&mut self) {
        if self.key.take().is_some() {
            debug!("secretbox key cleared");
        }
        self.password = None;
    }

    fn replace_key(&mut self, key: Key, password: Option<Zeroizing<String>>, source: &'static str) {
        let replaced = self.key.replace(key).is_some();
        self.password = password;
        debug!(source, replaced, "secretbox key set");
    }

    // ------------------------------------------------------------------
    // Buffer operations
    // ------------------------------------------------------------------

    /// Encrypt `plaintext` into an envelope (`IV || ciphertext`, plus a
    /// tag in authenticated mode).  Every call uses a fresh IV.
    pub fn encrypt_buffer(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let key = self.key()?;
        self.settings.mode.seal(key, plaintext)
    }

    /// Decrypt an envelope produced by `encrypt_buffer`.
    pub fn decrypt_buffer(&self, envelope: &[u8]) -> Result<Vec<u8>> {
        let key = self.key()?;
        self.settings.mode.open(key, envelope)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the settings this box was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the envelope mode.
    pub fn mode(&self) -> CipherMode {
        self.settings.mode
    }
}

impl fmt::Debug for SecretBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBox")
            .field("has_key", &self.has_key())
            .field("has_password", &self.password.is_some())
            .field("settings", &self.settings)
            .finish()
    }
}
