//! Correlating a job with the files the external tool wrote.
//!
//! The tool reports nothing structured about what it produced, so a job's
//! output is found purely by filename: every artifact starts with the job's
//! `"<id> - "` prefix. A single download can leave several files behind
//! (thumbnails, subtitles, leftover fragments); the largest one is taken as
//! the media payload.
//!
//! The policy here works on a plain listing so it can be exercised without a
//! process or a real directory.

use tracing::warn;

use crate::domain::JobId;
use crate::ports::ArtifactStorePort;

/// Suffix the tool uses for downloads still in progress.
pub const PARTIAL_DOWNLOAD_SUFFIX: &str = ".part";

/// Suffixes of files that are never the finished payload.
const INCOMPLETE_SUFFIXES: &[&str] = &[PARTIAL_DOWNLOAD_SUFFIX, ".ytdl"];

/// One file in the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEntry {
    pub name: String,
    pub size: u64,
}

impl ArtifactEntry {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Whether `name` marks an incomplete download.
pub fn is_incomplete(name: &str) -> bool {
    INCOMPLETE_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// Entries belonging to `job_id` that look like finished files.
pub fn candidates<'a>(job_id: &JobId, entries: &'a [ArtifactEntry]) -> Vec<&'a ArtifactEntry> {
    let prefix = job_id.file_prefix();
    entries
        .iter()
        .filter(|entry| entry.name.starts_with(&prefix) && !is_incomplete(&entry.name))
        .collect()
}

/// Pick the largest candidate for `job_id`.
///
/// Equal sizes resolve to the lexicographically smallest name so the choice
/// does not depend on directory iteration order.
pub fn select_artifact<'a>(job_id: &JobId, entries: &'a [ArtifactEntry]) -> Option<&'a ArtifactEntry> {
    candidates(job_id, entries)
        .into_iter()
        .max_by(|a, b| a.size.cmp(&b.size).then_with(|| b.name.cmp(&a.name)))
}

/// List the store and select the artifact for `job_id`.
///
/// Listing errors are logged and treated as "nothing found": the job then
/// degrades to a failure instead of taking the batch down.
pub async fn resolve_artifact(store: &dyn ArtifactStorePort, job_id: &JobId) -> Option<ArtifactEntry> {
    let prefix = job_id.file_prefix();
    match store.list_entries(&prefix).await {
        Ok(entries) => select_artifact(job_id, &entries).cloned(),
        Err(e) => {
            warn!(
                target: "vidgrab.job",
                job_id = %job_id,
                error = %e,
                "Failed to scan output directory"
            );
            None
        }
    }
}

/// Public reference for a file served under `public_prefix`.
pub fn public_file_ref(public_prefix: &str, file_name: &str) -> String {
    format!(
        "{}/{}",
        public_prefix.trim_end_matches('/'),
        urlencoding::encode(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io;
    use uuid::Uuid;

    fn id() -> JobId {
        JobId::from_uuid(Uuid::from_u128(0x1234))
    }

    fn named(id: &JobId, rest: &str, size: u64) -> ArtifactEntry {
        ArtifactEntry::new(format!("{}{rest}", id.file_prefix()), size)
    }

    #[test]
    fn test_single_match_is_selected() {
        let id = id();
        let entries = vec![named(&id, "Title.mp4", 10)];
        let picked = select_artifact(&id, &entries).unwrap();
        assert_eq!(picked.name, format!("{}Title.mp4", id.file_prefix()));
    }

    #[test]
    fn test_largest_candidate_wins() {
        let id = id();
        let entries = vec![
            named(&id, "Title.webp", 40),
            named(&id, "Title.mkv", 4_000),
            named(&id, "Title.en.vtt", 2),
        ];
        assert_eq!(select_artifact(&id, &entries).unwrap().size, 4_000);
    }

    #[test]
    fn test_partial_downloads_are_never_candidates() {
        let id = id();
        let entries = vec![
            named(&id, "Title.mp4.part", 9_000),
            named(&id, "Title.mp4.ytdl", 1),
        ];
        assert!(candidates(&id, &entries).is_empty());
        assert!(select_artifact(&id, &entries).is_none());
    }

    #[test]
    fn test_other_jobs_files_are_ignored() {
        let mine = id();
        let other = JobId::from_uuid(Uuid::from_u128(0x9999));
        let entries = vec![named(&other, "Huge.mp4", 1_000_000), named(&mine, "Small.mp4", 1)];
        assert_eq!(select_artifact(&mine, &entries).unwrap().size, 1);
    }

    #[test]
    fn test_id_without_separator_is_not_a_match() {
        let id = id();
        let entries = vec![ArtifactEntry::new(format!("{id}.mp4"), 10)];
        assert!(select_artifact(&id, &entries).is_none());
    }

    #[test]
    fn test_equal_sizes_pick_smallest_name() {
        let id = id();
        let entries = vec![named(&id, "b.mp4", 5), named(&id, "a.mp4", 5)];
        assert!(select_artifact(&id, &entries).unwrap().name.ends_with("a.mp4"));
    }

    #[test]
    fn test_public_ref_percent_encodes_name() {
        assert_eq!(
            public_file_ref("/downloads", "abc - My Video #1.mp4"),
            "/downloads/abc%20-%20My%20Video%20%231.mp4"
        );
        assert_eq!(public_file_ref("/downloads/", "a.mp4"), "/downloads/a.mp4");
    }

    struct BrokenStore;

    #[async_trait]
    impl ArtifactStorePort for BrokenStore {
        async fn list_entries(&self, _prefix: &str) -> io::Result<Vec<ArtifactEntry>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    struct FixedStore(Vec<ArtifactEntry>);

    #[async_trait]
    impl ArtifactStorePort for FixedStore {
        async fn list_entries(&self, _prefix: &str) -> io::Result<Vec<ArtifactEntry>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_scan_errors_resolve_to_nothing() {
        assert!(resolve_artifact(&BrokenStore, &id()).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_applies_policy_to_store_listing() {
        let id = id();
        let store = FixedStore(vec![named(&id, "a.mp4", 3), named(&id, "a.mp4.part", 30)]);
        let picked = resolve_artifact(&store, &id).await.unwrap();
        assert_eq!(picked.size, 3);
    }
}
