//! Read-only view of the shared output directory.

use std::io;

use async_trait::async_trait;

use crate::artifact::ArtifactEntry;

/// Lists the files the external tool has written.
///
/// Implementations may use `prefix` to skip unrelated entries early, but the
/// artifact policy filters by prefix again, so returning everything is valid.
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// List regular files, optionally narrowed to names starting with `prefix`.
    async fn list_entries(&self, prefix: &str) -> io::Result<Vec<ArtifactEntry>>;
}
