//! Output directory resolution.

use std::env;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Resolve the configured output directory to an absolute path.
///
/// Relative paths are anchored at the current working directory so the
/// template handed to the tool and the directory served over HTTP agree
/// regardless of where either is used from.
pub fn resolve_output_dir(configured: &Path) -> Result<PathBuf, PathError> {
    if configured.as_os_str().is_empty() {
        return Err(PathError::EmptyPath);
    }
    if configured.is_absolute() {
        return Ok(configured.to_path_buf());
    }
    let cwd = env::current_dir().map_err(|e| PathError::CurrentDirError(e.to_string()))?;
    Ok(cwd.join(configured))
}
