//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No `tokio::process` or HTTP types in any signature
//! - The job runner expresses intent (`execute` a link), not process plumbing
//! - The artifact store only lists; it never writes or deletes

pub mod artifact_store;
pub mod job_runner;
pub mod result_sink;

pub use artifact_store::ArtifactStorePort;
pub use job_runner::JobRunnerPort;
pub use result_sink::{LinkResultSink, NoopSink};

#[cfg(test)]
pub use job_runner::MockJobRunnerPort;
