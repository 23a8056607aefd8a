//! Input resolution: validate the user-supplied deck path.
//!
//! The renderer is handed an absolute path because it runs with the scoped
//! temporary directory as its output target, not the caller's working
//! directory. We canonicalise here, once, so every later stage can treat
//! the deck as a fixed identity. Errors keep the path exactly as the user
//! typed it: the CLI's `File not found:` message must echo their input,
//! not our resolved form.

use crate::error::GridError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a deck path, validating existence and readability.
///
/// Returns the canonical absolute path on success. No external process is
/// spawned before this check passes.
pub fn resolve_deck(path: &Path) -> Result<PathBuf, GridError> {
    if !path.exists() {
        return Err(GridError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    // Check read permission by attempting to open.
    match std::fs::File::open(path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(GridError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(GridError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    let absolute = path
        .canonicalize()
        .map_err(|e| GridError::Internal(format!("Failed to canonicalise deck path: {e}")))?;

    debug!("Resolved deck: {}", absolute.display());
    Ok(absolute)
}
