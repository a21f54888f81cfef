use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::CipherMode;
use crate::errors::{Result, SecretBoxError};

/// SecretBox configuration, optionally loaded from a TOML file.
///
/// Every field has a sensible default so a `SecretBox` works
/// out-of-the-box without any config file at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Envelope format (`"cbc"` or `"cbc-hmac-sha256"`).
    #[serde(default)]
    pub mode: CipherMode,

    /// Write output files via temp file + fsync + rename.
    #[serde(default = "default_true")]
    pub atomic_writes: bool,

    /// Create output files with mode 0o600 on Unix.
    #[serde(default = "default_true")]
    pub secure_permissions: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_true() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: CipherMode::default(),
            atomic_writes: default_true(),
            secure_permissions: default_true(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            SecretBoxError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;

        Self::from_toml_str(&contents).map_err(|e| match e {
            SecretBoxError::Config(msg) => {
                SecretBoxError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse settings from TOML text.
    ///
    /// Missing fields take their defaults; unknown values are a
    /// `Config` error.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| SecretBoxError::Config(format!("Failed to parse settings: {e}")))
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.mode, CipherMode::Cbc);
        assert!(s.atomic_writes);
        assert!(s.secure_permissions);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(&tmp.path().join("secretbox.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("secretbox.toml");
        let config = r#"
mode = "cbc-hmac-sha256"
atomic_writes = false
secure_permissions = false
"#;
        fs::write(&path, config).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.mode, CipherMode::CbcHmacSha256);
        assert!(!settings.atomic_writes);
        assert!(!settings.secure_permissions);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let settings = Settings::from_toml_str("atomic_writes = false\n").unwrap();
        assert!(!settings.atomic_writes);
        // Rest should be defaults
        assert_eq!(settings.mode, CipherMode::Cbc);
        assert!(settings.secure_permissions);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("secretbox.toml");
        fs::write(&path, "not valid {{toml").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = Settings::from_toml_str("mode = \"ecb\"\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn load_error_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("secretbox.toml");
        fs::write(&path, "atomic_writes = \"sometimes\"\n").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, SecretBoxError::Config(_)));
        let msg = err.to_string();
        assert!(msg.contains("secretbox.toml"), "{msg}");
        assert!(msg.contains("Failed to parse"), "{msg}");
    }
}
