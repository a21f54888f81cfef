//! The `SecretBox` component.
//!
//! This module provides:
//! - The `SecretBox` handle with key management and buffer encryption (`store`)
//! - JSON adapters producing base64 envelopes (`json`)
//! - Whole-file adapters for buffers and JSON (`files`)

pub mod files;
pub mod json;
pub mod store;

pub use store::SecretBox;
