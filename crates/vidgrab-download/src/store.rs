//! Filesystem implementation of [`ArtifactStorePort`].

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use vidgrab_core::{ArtifactEntry, ArtifactStorePort};

/// Lists regular files directly inside one directory (no recursion).
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ArtifactStorePort for FsArtifactStore {
    async fn list_entries(&self, prefix: &str) -> io::Result<Vec<ArtifactEntry>> {
        let mut dir = tokio::fs::read_dir(&self.root).await?;
        let mut entries = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            // Names that are not valid UTF-8 cannot carry our prefix.
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.starts_with(prefix) {
                continue;
            }
            // The entry may vanish between listing and stat (tool cleanup).
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!(target: "vidgrab.job", file = %name, error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if metadata.is_file() {
                entries.push(ArtifactEntry::new(name, metadata.len()));
            }
        }

        Ok(entries)
    }
}
