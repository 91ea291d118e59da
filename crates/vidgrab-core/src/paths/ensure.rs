//! Directory creation and verification utilities.
//!
//! Used at startup so a missing or read-only output directory is reported
//! before the first job runs, instead of surfacing as "no output file found"
//! on every link.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::error::PathError;

/// Name of the throwaway file used to probe writability.
const WRITE_PROBE_FILE: &str = ".vidgrab_write_test";

/// Create the directory if it is missing, then check that it is writable.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.as_os_str().is_empty() {
        return Err(PathError::EmptyPath);
    }

    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
    } else {
        fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    }

    verify_writable(path)?;
    Ok(())
}

/// Verify a directory is writable by creating and removing a probe file.
///
/// The probe name never carries a job prefix, so it cannot be mistaken for
/// a job's output.
pub fn verify_writable(path: &Path) -> Result<(), PathError> {
    let probe = path.join(WRITE_PROBE_FILE);
    let not_writable = |reason: String| PathError::NotWritable {
        path: path.to_path_buf(),
        reason,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&probe)
        .map_err(|e| not_writable(e.to_string()))?;
    file.write_all(b"probe")
        .map_err(|e| not_writable(e.to_string()))?;
    drop(file);
    let _ = fs::remove_file(&probe);
    Ok(())
}
