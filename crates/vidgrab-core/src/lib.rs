//! Core domain for vidgrab.
//!
//! This crate owns everything about a download batch that does not touch a
//! process or a socket:
//!
//! - `domain` - jobs, job outcomes and per-link results
//! - `artifact` - correlating a job with the files the external tool wrote
//! - `ports` - trait seams implemented by the adapters
//! - `services` - the batch coordinator
//! - `settings` / `paths` - configuration and output directory setup
#![deny(unused_crate_dependencies)]

pub mod artifact;
pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use artifact::{
    ArtifactEntry, PARTIAL_DOWNLOAD_SUFFIX, candidates, is_incomplete, public_file_ref,
    resolve_artifact, select_artifact,
};
pub use domain::{
    INVALID_LINK_MESSAGE, Job, JobId, JobOutcome, LinkResult, LinkStatus, failure_message,
    matches_platform, output_template,
};
pub use ports::{ArtifactStorePort, JobRunnerPort, LinkResultSink, NoopSink};
pub use services::{BatchCoordinator, BatchError, BatchPolicy, ValidatedBatch};
pub use settings::{
    DEFAULT_JOB_TIMEOUT_SECS, DEFAULT_LINK_MARKER, DEFAULT_MAX_LINKS, DEFAULT_OUTPUT_DIR,
    DEFAULT_PUBLIC_PREFIX, DEFAULT_TOOL_PATH, MAX_CONCURRENCY, MAX_LINKS_CEILING, Settings,
    SettingsError, validate_settings,
};

// Re-export path utilities
pub use paths::{PathError, ensure_directory, resolve_output_dir, verify_writable};

// Dev-dependencies only reached from some test modules
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tempfile as _;
