//! Download jobs and their outcomes.
//!
//! A job is one run of the external tool against one link. Its identifier is
//! the only thing tying the run to the files the tool leaves behind, so every
//! output name starts with `"<id> - "`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator between the job identifier and the tool-chosen title.
pub const JOB_PREFIX_SEPARATOR: &str = " - ";

/// Title and extension placeholders filled in by the external tool.
const TEMPLATE_PLACEHOLDERS: &str = "%(title)s.%(ext)s";

/// Unique identifier of a single job (random 128-bit UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Filename prefix every artifact of this job starts with.
    #[must_use]
    pub fn file_prefix(&self) -> String {
        format!("{self}{JOB_PREFIX_SEPARATOR}")
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Build the output-path template handed to the external tool.
pub fn output_template(output_dir: &Path, id: &JobId) -> PathBuf {
    output_dir.join(format!("{}{TEMPLATE_PLACEHOLDERS}", id.file_prefix()))
}

/// A single link scheduled for retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Identifier embedded in every output filename.
    pub id: JobId,
    /// Link passed to the tool as its final argument.
    pub link: String,
    /// `<dir>/<id> - %(title)s.%(ext)s`
    pub output_template: PathBuf,
}

impl Job {
    /// Create a job with a freshly generated identifier.
    pub fn new(link: impl Into<String>, output_dir: &Path) -> Self {
        Self::with_id(JobId::new(), link, output_dir)
    }

    /// Create a job with a known identifier.
    pub fn with_id(id: JobId, link: impl Into<String>, output_dir: &Path) -> Self {
        Self {
            id,
            link: link.into(),
            output_template: output_template(output_dir, &id),
        }
    }
}

/// Result of executing one job.
///
/// `success` is only ever true when the process exited with code 0 and a
/// matching output file was found; the constructors keep that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub job_id: JobId,
    pub success: bool,
    /// Exit code, present only when the process terminated normally.
    pub exit_code: Option<i32>,
    /// Public reference to the resolved file, present only on success.
    pub file: Option<String>,
    /// Failure message, present only on failure.
    pub error: Option<String>,
    /// Captured stdout followed by captured stderr.
    pub diagnostic: String,
}

impl JobOutcome {
    /// Exit code 0 and an output file was resolved.
    pub fn succeeded(job_id: JobId, file: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            job_id,
            success: true,
            exit_code: Some(0),
            file: Some(file.into()),
            error: None,
            diagnostic: diagnostic.into(),
        }
    }

    /// The job failed after the process was started.
    pub fn failed(
        job_id: JobId,
        exit_code: Option<i32>,
        error: impl Into<String>,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            job_id,
            success: false,
            exit_code,
            file: None,
            error: Some(error.into()),
            diagnostic: diagnostic.into(),
        }
    }

    /// The process could not be started at all.
    pub fn spawn_failed(job_id: JobId, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::failed(job_id, None, message.clone(), message)
    }
}

/// Pick the failure message from captured output.
///
/// Standard error wins when it has any non-whitespace content, then standard
/// output, then `fallback`. Stdout is a weak error signal: the tool may log
/// normally there and still fail, so it is only consulted when stderr is blank.
pub fn failure_message(stderr: &str, stdout: &str, fallback: &str) -> String {
    if !stderr.trim().is_empty() {
        stderr.to_string()
    } else if !stdout.trim().is_empty() {
        stdout.to_string()
    } else {
        fallback.to_string()
    }
}
