//! Per-link result records returned to callers.

use serde::{Deserialize, Serialize};

use super::job::JobOutcome;

/// Message attached to links that fail the platform shape check.
pub const INVALID_LINK_MESSAGE: &str = "not a valid link";

/// Transient state of a link that is being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Started,
}

/// Result record for one input link.
///
/// Serialized forms:
/// - `{link, ok: false, message}` - rejected before execution
/// - `{link, status: "started"}` - job in flight (streamed only)
/// - `{link, ok: true, file}` - retrieved
/// - `{link, ok: false, error, code?}` - job failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkResult {
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LinkStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Exit code of a failed job that terminated normally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
}

impl LinkResult {
    const fn empty(link: String) -> Self {
        Self {
            link,
            status: None,
            ok: None,
            file: None,
            error: None,
            message: None,
            code: None,
        }
    }

    /// Link rejected before any process was started.
    pub fn rejected(link: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: Some(false),
            message: Some(message.into()),
            ..Self::empty(link.into())
        }
    }

    /// Job for this link has been handed to the runner.
    pub fn started(link: impl Into<String>) -> Self {
        Self {
            status: Some(LinkStatus::Started),
            ..Self::empty(link.into())
        }
    }

    /// Job succeeded and produced `file`.
    pub fn completed(link: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            ok: Some(true),
            file: Some(file.into()),
            ..Self::empty(link.into())
        }
    }

    /// Job failed with `error`.
    pub fn failed(link: impl Into<String>, error: impl Into<String>, code: Option<i32>) -> Self {
        Self {
            ok: Some(false),
            error: Some(error.into()),
            code,
            ..Self::empty(link.into())
        }
    }

    /// Translate a job outcome into the terminal record for `link`.
    pub fn from_outcome(link: impl Into<String>, outcome: &JobOutcome) -> Self {
        match (&outcome.file, outcome.success) {
            (Some(file), true) => Self::completed(link, file.clone()),
            _ => {
                let error = outcome
                    .error
                    .clone()
                    .unwrap_or_else(|| outcome.diagnostic.clone());
                Self::failed(link, error, outcome.exit_code)
            }
        }
    }

    /// Whether this is a final record rather than a progress marker.
    pub const fn is_terminal(&self) -> bool {
        self.ok.is_some()
    }

    pub fn is_ok(&self) -> bool {
        self.ok == Some(true)
    }
}

/// Superficial shape check: does the link mention the expected platform?
///
/// Case-insensitive substring match; reachability is never checked.
pub fn matches_platform(link: &str, marker: &str) -> bool {
    link.to_lowercase().contains(&marker.to_lowercase())
}
