//! Symmetric encryption of buffers, JSON values and files with a single
//! 256-bit key.
//!
//! ```no_run
//! use secretbox::SecretBox;
//!
//! # fn main() -> secretbox::Result<()> {
//! let mut sb = SecretBox::new();
//! sb.set_password("correct horse battery staple")?;
//!
//! let envelope = sb.encrypt_buffer(b"hello")?;
//! assert_eq!(sb.decrypt_buffer(&envelope)?, b"hello");
//!
//! let text = sb.encrypt_json(&serde_json::json!({ "token": "abc" }))?;
//! let value: serde_json::Value = sb.decrypt_json(&text)?;
//! # let _ = value;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod errors;
pub mod secret_box;

pub use config::Settings;
pub use crypto::{CipherMode, Key};
pub use errors::{ErrorKind, Result, SecretBoxError};
pub use secret_box::SecretBox;
