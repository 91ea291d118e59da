//! Settings domain types and validation.
//!
//! These are pure configuration values; adapters fill them from flags,
//! environment variables or files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default maximum number of links accepted in one batch.
pub const DEFAULT_MAX_LINKS: usize = 15;

/// Hard ceiling for `max_links`.
pub const MAX_LINKS_CEILING: usize = 50;

/// Default external retrieval tool.
pub const DEFAULT_TOOL_PATH: &str = "yt-dlp";

/// Default substring a link must contain (matches `youtube.com` and `youtu.be`).
pub const DEFAULT_LINK_MARKER: &str = "youtu";

/// Default public path the output directory is served under.
pub const DEFAULT_PUBLIC_PREFIX: &str = "/downloads";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";

/// Default per-job timeout (30 minutes).
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 1800;

/// Maximum number of jobs a single batch may run at once.
pub const MAX_CONCURRENCY: usize = 4;

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory the external tool writes into.
    pub output_dir: PathBuf,

    /// Path or name of the external retrieval tool.
    pub tool_path: PathBuf,

    /// Extra arguments inserted before the output template.
    pub tool_args: Vec<String>,

    /// Public path prefix the output directory is served under.
    pub public_prefix: String,

    /// Case-insensitive substring every accepted link must contain.
    pub link_marker: String,

    /// Maximum links per batch (1-50).
    pub max_links: usize,

    /// Jobs run at once within one batch (1-4). 1 keeps strict sequencing.
    pub concurrency: usize,

    /// Seconds before a running job is terminated.
    pub job_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            tool_path: PathBuf::from(DEFAULT_TOOL_PATH),
            tool_args: Vec::new(),
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            link_marker: DEFAULT_LINK_MARKER.to_string(),
            max_links: DEFAULT_MAX_LINKS,
            concurrency: 1,
            job_timeout_secs: DEFAULT_JOB_TIMEOUT_SECS,
        }
    }

    /// Per-job timeout as a `Duration`.
    #[must_use]
    pub const fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Max links must be between 1 and 50, got {0}")]
    InvalidMaxLinks(usize),

    #[error("Concurrency must be between 1 and 4, got {0}")]
    InvalidConcurrency(usize),

    #[error("Job timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Tool path cannot be empty")]
    EmptyToolPath,

    #[error("Link marker cannot be empty")]
    EmptyLinkMarker,

    #[error("Output directory cannot be empty")]
    EmptyOutputDir,

    #[error("Public prefix must start with '/' and name a path segment, got {0:?}")]
    InvalidPublicPrefix(String),

    #[error("Public prefix {0:?} collides with a built-in route")]
    ReservedPublicPrefix(String),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if !(1..=MAX_LINKS_CEILING).contains(&settings.max_links) {
        return Err(SettingsError::InvalidMaxLinks(settings.max_links));
    }

    if !(1..=MAX_CONCURRENCY).contains(&settings.concurrency) {
        return Err(SettingsError::InvalidConcurrency(settings.concurrency));
    }

    if settings.job_timeout_secs == 0 {
        return Err(SettingsError::ZeroTimeout);
    }

    if settings.tool_path.as_os_str().is_empty() {
        return Err(SettingsError::EmptyToolPath);
    }

    if settings.link_marker.trim().is_empty() {
        return Err(SettingsError::EmptyLinkMarker);
    }

    if settings.output_dir.as_os_str().is_empty() {
        return Err(SettingsError::EmptyOutputDir);
    }

    let prefix = settings.public_prefix.trim_end_matches('/');
    if !prefix.starts_with('/') || prefix.len() < 2 || prefix.contains(['{', '}']) {
        return Err(SettingsError::InvalidPublicPrefix(
            settings.public_prefix.clone(),
        ));
    }

    if is_reserved_prefix(prefix) {
        return Err(SettingsError::ReservedPublicPrefix(
            settings.public_prefix.clone(),
        ));
    }

    Ok(())
}

/// Paths the router owns; the download directory cannot be mounted on them.
const RESERVED_PREFIXES: &[&str] = &["/health", "/api"];

fn is_reserved_prefix(prefix: &str) -> bool {
    RESERVED_PREFIXES.iter().any(|reserved| {
        prefix == *reserved
            || prefix
                .strip_prefix(reserved)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}
