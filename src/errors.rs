use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`SecretBoxError`].
///
/// Callers that want to branch on the kind of failure should match on
/// this rather than on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A key-dependent operation ran before any key was set.
    Precondition,
    /// A caller-supplied key or password is malformed.
    Validation,
    /// The envelope is malformed, the key is wrong, or padding/tag checks failed.
    Decryption,
    /// A value could not be serialized to JSON.
    Serialization,
    /// Decrypted bytes are not valid UTF-8 JSON of the expected shape.
    Parse,
    /// Reading or writing a file failed.
    Io,
    /// The settings file could not be read or parsed.
    Config,
}

/// All errors that can occur in SecretBox.
#[derive(Debug, Error)]
pub enum SecretBoxError {
    // --- Key errors ---
    #[error("No key set — call set_key, set_password or generate_random_key first")]
    MissingKey,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    // --- Crypto errors ---
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Authentication failed — wrong key or tampered data")]
    AuthenticationFailed,

    // --- JSON errors ---
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{operation} failed for {}", .path.display())]
    File {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: Box<SecretBoxError>,
    },

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),
}

impl SecretBoxError {
    /// The broad category this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingKey => ErrorKind::Precondition,
            Self::InvalidKey(_) | Self::InvalidPassword(_) => ErrorKind::Validation,
            Self::DecryptionFailed(_) | Self::AuthenticationFailed => ErrorKind::Decryption,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Io(_) | Self::File { .. } => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// The kind of the innermost wrapped error.
    ///
    /// File operations wrap every failure as [`ErrorKind::Io`]; this looks
    /// through that wrapper to the error that actually occurred.
    pub fn root_kind(&self) -> ErrorKind {
        match self {
            Self::File { source, .. } => source.root_kind(),
            other => other.kind(),
        }
    }

    pub(crate) fn file(operation: &'static str, path: impl Into<PathBuf>, source: Self) -> Self {
        Self::File {
            operation,
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// Convenience type alias for SecretBox results.
pub type Result<T> = std::result::Result<T, SecretBoxError>;
