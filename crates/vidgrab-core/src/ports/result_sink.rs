//! Observer for per-link results as a batch progresses.
//!
//! Implementations handle transport details (SSE, channels, logs).

use crate::domain::LinkResult;

/// Receives `started` and terminal records while a batch runs.
///
/// `index` is the link's position in the input list.
///
/// # Implementations
///
/// - `NoopSink` - for callers that only want the final list
/// - Adapter-specific implementations (Axum SSE)
pub trait LinkResultSink: Send + Sync {
    /// Record a result. Must not block.
    fn emit(&self, index: usize, result: &LinkResult);
}

/// A sink that discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NoopSink {
    /// Create a new no-op sink.
    pub const fn new() -> Self {
        Self
    }
}

impl LinkResultSink for NoopSink {
    fn emit(&self, _index: usize, _result: &LinkResult) {}
}
