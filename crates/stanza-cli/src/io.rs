//! File handling
//!
//! Reading the destination, backup copies, and the compare-then-replace
//! write that guards against concurrent modification.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use stanza_core::ContentHash;
use tempfile::NamedTempFile;

use crate::error::CliError;

/// Read the destination, or start from empty text when allowed
///
/// # Errors
/// [`CliError::MissingDestination`] when the file is missing and `create`
/// is off; [`CliError::Read`] for any other I/O failure.
pub fn read_destination(path: &Path, create: bool) -> Result<String, CliError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            if create {
                tracing::debug!(path = %path.display(), "destination missing, starting empty");
                Ok(String::new())
            } else {
                Err(CliError::MissingDestination(path.to_path_buf()))
            }
        }
        Err(source) => Err(CliError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Backup file name for `path`: `<path>.<pid>.<YYYY-MM-DD@HH:MM:SS>~`
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y-%m-%d@%H:%M:%S");
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{}.{stamp}~", std::process::id()));
    PathBuf::from(name)
}

/// Copy the destination next to itself before it is replaced
///
/// # Errors
/// [`CliError::Backup`] when the copy fails.
pub fn backup(path: &Path) -> Result<PathBuf, CliError> {
    let target = backup_path(path);
    fs::copy(path, &target).map_err(|source| CliError::Backup {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), backup = %target.display(), "backup written");
    Ok(target)
}

/// Replace the destination with `text` if it still hashes to `base`
///
/// The text goes to a temporary file in the destination directory which is
/// then persisted over the destination. The new file gets `mode` when given,
/// otherwise the permissions of the existing destination. A missing
/// destination counts as empty text.
///
/// # Errors
/// [`CliError::ConcurrentModification`] when the file changed since it was
/// read; [`CliError::Write`] or [`CliError::Read`] for I/O failures.
pub fn write_atomic(
    path: &Path,
    text: &str,
    base: &ContentHash,
    mode: Option<u32>,
) -> Result<(), CliError> {
    let write_err = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(directory).map_err(write_err)?;

    let mut temp = NamedTempFile::new_in(directory).map_err(write_err)?;
    temp.write_all(text.as_bytes()).map_err(write_err)?;
    temp.flush().map_err(write_err)?;

    let current = read_destination(path, true)?;
    let found = ContentHash::of_text(&current);
    if &found != base {
        return Err(CliError::ConcurrentModification {
            path: path.to_path_buf(),
            expected: *base,
            found,
        });
    }

    let permissions = match mode {
        Some(mode) => permissions_from_mode(mode),
        None => fs::metadata(path).ok().map(|metadata| metadata.permissions()),
    };
    if let Some(permissions) = permissions {
        fs::set_permissions(temp.path(), permissions).map_err(write_err)?;
    }

    temp.persist(path).map_err(|err| write_err(err.error))?;
    tracing::info!(path = %path.display(), bytes = text.len(), "file replaced");
    Ok(())
}

/// Whether the permission bits of an existing file differ from `mode`
///
/// # Errors
/// [`CliError::Read`] when the file metadata cannot be read.
#[cfg(unix)]
pub fn mode_differs(path: &Path, mode: u32) -> Result<bool, CliError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(metadata.permissions().mode() & 0o7777 != mode)
}

/// Permission bits are not tracked outside unix
///
/// # Errors
/// Never fails.
#[cfg(not(unix))]
pub fn mode_differs(_path: &Path, _mode: u32) -> Result<bool, CliError> {
    Ok(false)
}

/// Set the permission bits of an existing file
///
/// # Errors
/// [`CliError::Write`] when the permissions cannot be changed.
pub fn set_mode(path: &Path, mode: u32) -> Result<(), CliError> {
    if let Some(permissions) = permissions_from_mode(mode) {
        fs::set_permissions(path, permissions).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), mode = %format!("{mode:04o}"), "mode set");
    }
    Ok(())
}

#[cfg(unix)]
fn permissions_from_mode(mode: u32) -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn permissions_from_mode(_mode: u32) -> Option<fs::Permissions> {
    None
}
