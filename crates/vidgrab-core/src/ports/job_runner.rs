//! Job runner trait definition.
//!
//! This port defines the interface for retrieving a single link with the
//! external tool. Implementations handle identifier generation, process
//! lifecycle and artifact resolution internally.

use async_trait::async_trait;

use crate::domain::JobOutcome;

/// Runs one retrieval job per call.
///
/// `execute` never returns an error: spawn failures, non-zero exits,
/// timeouts and missing output files are all reported as a failed
/// [`JobOutcome`] so a batch can carry on with the next link.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRunnerPort: Send + Sync {
    /// Retrieve `link` and wait until its process has terminated and its
    /// output file has been located.
    async fn execute(&self, link: &str) -> JobOutcome;
}
