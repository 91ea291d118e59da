//! Shared fixtures for router tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use vidgrab_axum::{AxumContext, CorsConfig, create_router};
use vidgrab_core::{JobId, JobOutcome, JobRunnerPort, Settings};

/// Links containing this marker make the stub runner panic.
pub const PANIC_MARKER: &str = "boom";

/// Links containing this marker make the stub runner fail with exit code 1.
pub const FAIL_MARKER: &str = "private";

pub const FAIL_MESSAGE: &str = "ERROR: Private video";

/// Job runner that never spawns anything and counts calls.
#[derive(Default)]
pub struct StubRunner {
    calls: AtomicUsize,
}

impl StubRunner {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobRunnerPort for StubRunner {
    async fn execute(&self, link: &str) -> JobOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!link.contains(PANIC_MARKER), "stub runner asked to panic");
        let id = JobId::new();
        if link.contains(FAIL_MARKER) {
            return JobOutcome::failed(id, Some(1), FAIL_MESSAGE, FAIL_MESSAGE);
        }
        let slug = link.rsplit('/').next().unwrap_or_default();
        JobOutcome::succeeded(id, format!("/downloads/{slug}.mp4"), "")
    }
}

/// Job runner whose jobs never finish on their own.
#[derive(Default)]
pub struct HangingRunner {
    started: AtomicBool,
    cancelled: Arc<AtomicBool>,
}

impl HangingRunner {
    pub fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Set once a running job's future has been dropped.
    pub fn cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl JobRunnerPort for HangingRunner {
    async fn execute(&self, _link: &str) -> JobOutcome {
        let _cancelled = SetOnDrop(self.cancelled.clone());
        self.started.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(60)).await;
        JobOutcome::failed(JobId::new(), None, "never cancelled", "")
    }
}

/// Router around any runner, serving `output_dir`.
pub fn router_with_runner(
    output_dir: &Path,
    cors: &CorsConfig,
    runner: Arc<dyn JobRunnerPort>,
) -> axum::Router {
    let settings = Settings {
        output_dir: output_dir.to_path_buf(),
        ..Settings::default()
    };
    let ctx = AxumContext::new(settings, output_dir.to_path_buf(), runner);
    create_router(ctx, cors)
}

/// Router backed by a `StubRunner`, serving `output_dir`.
pub fn test_router(output_dir: &Path, cors: &CorsConfig) -> (axum::Router, Arc<StubRunner>) {
    let runner = Arc::new(StubRunner::default());
    (router_with_runner(output_dir, cors, runner.clone()), runner)
}
