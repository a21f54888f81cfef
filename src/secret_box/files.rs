//! File encryption/decryption operations.
//!
//! Whole files are read into memory, run through the buffer or JSON
//! layer, and written out with overwrite semantics.  Any failure is
//! logged and wrapped in `SecretBoxError::File`, which names the
//! operation and path and keeps the original error as its source.
//!
//! Output files are never left half-written: with `atomic_writes` the
//! data goes to a temp file in the destination directory that is fsynced
//! and renamed into place; without it, a failed write removes the
//! partial file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::store::SecretBox;
use crate::config::Settings;
use crate::errors::{Result, SecretBoxError};

const ENCRYPT_FILE: &str = "encrypt_file";
const DECRYPT_FILE: &str = "decrypt_file";
const ENCRYPT_JSON_TO_FILE: &str = "encrypt_json_to_file";
const DECRYPT_JSON_FROM_FILE: &str = "decrypt_json_from_file";

impl SecretBox {
    /// Encrypt the contents of `src` and write the envelope to `dst`.
    pub fn encrypt_file(&self, src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
        let (src, dst) = (src.as_ref(), dst.as_ref());

        let plaintext = fs::read(src).map_err(|e| file_error(ENCRYPT_FILE, src, e.into()))?;
        let envelope = self
            .encrypt_buffer(&plaintext)
            .map_err(|e| file_error(ENCRYPT_FILE, src, e))?;
        write_output(dst, &envelope, self.settings())
            .map_err(|e| file_error(ENCRYPT_FILE, dst, e))
    }

    /// Decrypt the envelope in `src` and write the plaintext to `dst`.
    pub fn decrypt_file(&self, src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
        let (src, dst) = (src.as_ref(), dst.as_ref());

        let envelope = fs::read(src).map_err(|e| file_error(DECRYPT_FILE, src, e.into()))?;
        let plaintext = self
            .decrypt_buffer(&envelope)
            .map_err(|e| file_error(DECRYPT_FILE, src, e))?;
        write_output(dst, &plaintext, self.settings())
            .map_err(|e| file_error(DECRYPT_FILE, dst, e))
    }

    /// Encrypt `value` as JSON and write the base64 text to `path`.
    pub fn encrypt_json_to_file<T: Serialize + ?Sized>(
        &self,
        value: &T,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();

        let text = self
            .encrypt_json(value)
            .map_err(|e| file_error(ENCRYPT_JSON_TO_FILE, path, e))?;
        write_output(path, text.as_bytes(), self.settings())
            .map_err(|e| file_error(ENCRYPT_JSON_TO_FILE, path, e))
    }

    /// Read base64 text from `path` and decrypt the JSON value inside.
    pub fn decrypt_json_from_file<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> Result<T> {
        let path = path.as_ref();

        let text = fs::read_to_string(path)
            .map_err(|e| file_error(DECRYPT_JSON_FROM_FILE, path, e.into()))?;
        self.decrypt_json(&text)
            .map_err(|e| file_error(DECRYPT_JSON_FROM_FILE, path, e))
    }
}

/// Log a file-layer failure and wrap it with the operation and path.
fn file_error(operation: &'static str, path: &Path, source: SecretBoxError) -> SecretBoxError {
    warn!(
        operation,
        path = %path.display(),
        error = %source,
        "secretbox file operation failed"
    );
    SecretBoxError::file(operation, path, source)
}

/// Write `contents` to `path`, replacing any existing file.
fn write_output(path: &Path, contents: &[u8], settings: &Settings) -> Result<()> {
    if settings.atomic_writes {
        write_atomic(path, contents, settings.secure_permissions)
    } else {
        write_in_place(path, contents, settings.secure_permissions)
    }
}

/// Temp file in the same directory, fsync, then rename over `path`.
///
/// A symlink at `path` is followed: the file it points to is replaced
/// and the link itself is left alone.  If anything fails before the
/// rename, the temp file is removed when it drops and the destination
/// is untouched.
fn write_atomic(path: &Path, contents: &[u8], secure_permissions: bool) -> Result<()> {
    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(e.into()),
    };
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    #[allow(unused_mut)]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Without secure permissions a new file gets the usual 0o666 & !umask.
        let mode = if secure_permissions { 0o600 } else { 0o666 };
        builder.permissions(fs::Permissions::from_mode(mode));
    }

    let mut temp_file = builder.tempfile_in(parent)?;
    temp_file.write_all(contents)?;
    // Flush and fsync() such that the rename, if it succeeds, always
    // points to a complete file.
    temp_file.flush()?;
    temp_file.as_file().sync_all()?;

    if !secure_permissions {
        // Keep the mode of the file being replaced.
        match fs::metadata(&target) {
            Ok(existing) => temp_file.as_file().set_permissions(existing.permissions())?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    temp_file.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

/// Truncate and write `path` directly; remove it if the write fails.
fn write_in_place(path: &Path, contents: &[u8], secure_permissions: bool) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if secure_permissions {
            options.mode(0o600);
        }
    }

    let file = options.open(path)?;

    // `mode` only applies when the file is created.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if secure_permissions {
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
    }
    #[cfg(not(unix))]
    let _ = secure_permissions;

    write_or_remove(path, file, contents)
}

/// A writer whose contents can be forced to stable storage.
trait SyncWrite: Write {
    fn sync(&self) -> io::Result<()>;
}

impl SyncWrite for fs::File {
    fn sync(&self) -> io::Result<()> {
        self.sync_all()
    }
}

/// Write all of `contents` to `writer`, which is open on `path`.
///
/// On failure the writer is closed and `path` is removed so no partial
/// output is left behind.
fn write_or_remove<W: SyncWrite>(path: &Path, mut writer: W, contents: &[u8]) -> Result<()> {
    let written = writer
        .write_all(contents)
        .and_then(|()| writer.flush())
        .and_then(|()| writer.sync());

    if let Err(e) = written {
        drop(writer);
        if let Err(remove_err) = fs::remove_file(path) {
            warn!(
                path = %path.display(),
                error = %remove_err,
                "failed to remove partially written file"
            );
        }
        return Err(e.into());
    }
    Ok(())
}
