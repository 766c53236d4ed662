//! Directory provisioning.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::ProvisionError;

/// What: Make sure `path` exists as a directory, creating missing ancestors first.
///
/// Inputs:
/// - `path`: Directory to provide.
///
/// Output:
/// - `Ok(PathBuf)` with `path` unchanged once it is a directory.
/// - `Err(ProvisionError::NotADirectory)` when a file (or anything else) occupies
///   `path` or one of its ancestors.
/// - `Err(ProvisionError::Io)` for other filesystem failures.
///
/// Details:
/// - Walks up collecting every missing ancestor, then creates them top-down.
/// - A directory appearing concurrently between the check and the creation counts
///   as success.
/// - Idempotent: calling it on an existing directory touches nothing.
pub fn ensure_directory(path: &Path) -> Result<PathBuf, ProvisionError> {
    if path.is_dir() {
        tracing::trace!(path = %path.display(), "found directory");
        return Ok(path.to_path_buf());
    }
    if path.as_os_str().is_empty() {
        return Err(ProvisionError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(ErrorKind::InvalidInput, "empty path"),
        });
    }

    let mut missing: Vec<&Path> = Vec::new();
    let mut cursor = Some(path);
    while let Some(current) = cursor {
        if current.as_os_str().is_empty() || current.is_dir() {
            break;
        }
        if current.exists() {
            return Err(ProvisionError::NotADirectory {
                path: current.to_path_buf(),
            });
        }
        missing.push(current);
        cursor = current.parent();
    }

    for dir in missing.into_iter().rev() {
        match fs::create_dir(dir) {
            Ok(()) => tracing::info!(path = %dir.display(), "created directory"),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => {
                tracing::trace!(path = %dir.display(), "directory appeared meanwhile");
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(ProvisionError::NotADirectory {
                    path: dir.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(ProvisionError::Io {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        }
    }
    Ok(path.to_path_buf())
}
