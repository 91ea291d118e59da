//! Batch coordination.
//!
//! Validates a batch of links, runs one job per accepted link and assembles
//! one result per input link, in input order. With the default concurrency
//! of 1 the next job is not started until the previous one has terminated
//! and its output has been located. Higher concurrency runs that many jobs
//! at once; `buffered` still yields results in input order.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{INVALID_LINK_MESSAGE, LinkResult, matches_platform};
use crate::ports::{JobRunnerPort, LinkResultSink, NoopSink};
use crate::settings::{DEFAULT_LINK_MARKER, DEFAULT_MAX_LINKS, MAX_CONCURRENCY, Settings};

/// Reasons a whole batch is rejected before any job runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("links must contain at least one link")]
    Empty,

    #[error("too many links: {count} (maximum is {max})")]
    TooMany { count: usize, max: usize },
}

/// Limits and checks applied to every batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Maximum links per batch.
    pub max_links: usize,
    /// Substring every accepted link must contain (case-insensitive).
    pub link_marker: String,
    /// Jobs in flight at once within one batch.
    pub concurrency: usize,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            max_links: DEFAULT_MAX_LINKS,
            link_marker: DEFAULT_LINK_MARKER.to_string(),
            concurrency: 1,
        }
    }
}

impl BatchPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_links: settings.max_links,
            link_marker: settings.link_marker.clone(),
            concurrency: settings.concurrency.clamp(1, MAX_CONCURRENCY),
        }
    }
}

/// Links that already passed [`BatchCoordinator::accept`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBatch {
    links: Vec<String>,
}

impl ValidatedBatch {
    pub fn links(&self) -> &[String] {
        &self.links
    }
}

/// Runs batches of links through a [`JobRunnerPort`].
pub struct BatchCoordinator {
    runner: Arc<dyn JobRunnerPort>,
    policy: BatchPolicy,
}

impl BatchCoordinator {
    pub fn new(runner: Arc<dyn JobRunnerPort>, policy: BatchPolicy) -> Self {
        Self { runner, policy }
    }

    pub const fn policy(&self) -> &BatchPolicy {
        &self.policy
    }

    /// Check batch-level limits without running anything.
    pub const fn validate(&self, links: &[String]) -> Result<(), BatchError> {
        if links.is_empty() {
            return Err(BatchError::Empty);
        }
        if links.len() > self.policy.max_links {
            return Err(BatchError::TooMany {
                count: links.len(),
                max: self.policy.max_links,
            });
        }
        Ok(())
    }

    /// Validate `links`, keeping them for a later [`run_validated`](Self::run_validated).
    pub fn accept(&self, links: Vec<String>) -> Result<ValidatedBatch, BatchError> {
        self.validate(&links)?;
        Ok(ValidatedBatch { links })
    }

    /// Process every link and return one terminal result per link.
    pub async fn process_batch(&self, links: &[String]) -> Result<Vec<LinkResult>, BatchError> {
        self.process_batch_with(links, &NoopSink).await
    }

    /// Like [`process_batch`](Self::process_batch), reporting each `started`
    /// and terminal record to `sink` as it happens.
    pub async fn process_batch_with(
        &self,
        links: &[String],
        sink: &dyn LinkResultSink,
    ) -> Result<Vec<LinkResult>, BatchError> {
        self.validate(links)?;
        Ok(self.run_links(links, sink).await)
    }

    /// Run a batch that was accepted earlier; it cannot be rejected anymore.
    pub async fn run_validated(
        &self,
        batch: &ValidatedBatch,
        sink: &dyn LinkResultSink,
    ) -> Vec<LinkResult> {
        self.run_links(&batch.links, sink).await
    }

    async fn run_links(&self, links: &[String], sink: &dyn LinkResultSink) -> Vec<LinkResult> {
        info!(
            target: "vidgrab.batch",
            links = links.len(),
            concurrency = self.policy.concurrency,
            "Processing batch"
        );

        let results: Vec<LinkResult> = stream::iter(links.iter().cloned().enumerate())
            .map(|(index, link)| self.process_link(index, link, sink))
            .buffered(self.policy.concurrency.max(1))
            .collect()
            .await;

        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        info!(
            target: "vidgrab.batch",
            links = results.len(),
            succeeded,
            failed = results.len() - succeeded,
            "Batch finished"
        );

        results
    }

    async fn process_link(&self, index: usize, link: String, sink: &dyn LinkResultSink) -> LinkResult {
        if !matches_platform(&link, &self.policy.link_marker) {
            debug!(target: "vidgrab.batch", index, link = %link, "Rejected link");
            let result = LinkResult::rejected(link, INVALID_LINK_MESSAGE);
            sink.emit(index, &result);
            return result;
        }

        sink.emit(index, &LinkResult::started(link.clone()));
        let outcome = self.runner.execute(&link).await;
        let result = LinkResult::from_outcome(link, &outcome);
        sink.emit(index, &result);
        result
    }
}
