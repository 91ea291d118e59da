//! Domain types for download jobs and per-link results.

mod job;
mod link;

pub use job::{Job, JobId, JobOutcome, failure_message, output_template};
pub use link::{INVALID_LINK_MESSAGE, LinkResult, LinkStatus, matches_platform};
