//! Subprocess execution of one job.

pub mod command;

mod capture;
mod shutdown;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{info, warn};
use vidgrab_core::{
    ArtifactStorePort, DEFAULT_JOB_TIMEOUT_SECS, DEFAULT_PUBLIC_PREFIX, Job, JobOutcome,
    JobRunnerPort, Settings, public_file_ref, resolve_artifact,
};

use crate::store::FsArtifactStore;
use capture::{CapturedOutput, StreamCapture};
use command::build_command;
use shutdown::terminate;

/// Time a timed-out job gets between SIGTERM and SIGKILL.
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(5);

/// Last-resort error text when the tool exited 0 without leaving a file.
pub const NO_OUTPUT_MESSAGE: &str = "no output file found";

/// How to invoke the tool and where its output goes.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub tool_path: PathBuf,
    /// Inserted after the fixed flags, before `-o`.
    pub tool_args: Vec<String>,
    /// Absolute directory handed to the tool and scanned afterwards.
    pub output_dir: PathBuf,
    /// Public path prefix the output directory is served under.
    pub public_prefix: String,
    pub timeout: Duration,
    pub kill_grace: Duration,
}

impl RunnerConfig {
    pub fn new(tool_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool_path: tool_path.into(),
            tool_args: Vec::new(),
            output_dir: output_dir.into(),
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            timeout: Duration::from_secs(DEFAULT_JOB_TIMEOUT_SECS),
            kill_grace: DEFAULT_KILL_GRACE,
        }
    }

    /// Build from validated settings. `output_dir` must already be resolved.
    pub fn from_settings(settings: &Settings, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool_path: settings.tool_path.clone(),
            tool_args: settings.tool_args.clone(),
            output_dir: output_dir.into(),
            public_prefix: settings.public_prefix.clone(),
            timeout: settings.job_timeout(),
            kill_grace: DEFAULT_KILL_GRACE,
        }
    }

    #[must_use]
    pub fn with_tool_args(mut self, args: Vec<String>) -> Self {
        self.tool_args = args;
        self
    }

    #[must_use]
    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.public_prefix = prefix.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }
}

/// Runs the external tool once per link.
///
/// Every job gets its own identifier, so several runners (or several jobs
/// of one runner) can share an output directory without seeing each
/// other's files.
pub struct YtDlpRunner {
    config: RunnerConfig,
    store: Arc<dyn ArtifactStorePort>,
}

impl YtDlpRunner {
    /// Runner scanning `config.output_dir` on the local filesystem.
    pub fn new(config: RunnerConfig) -> Self {
        let store = Arc::new(FsArtifactStore::new(config.output_dir.clone()));
        Self::with_store(config, store)
    }

    pub fn with_store(config: RunnerConfig, store: Arc<dyn ArtifactStorePort>) -> Self {
        Self { config, store }
    }

    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run `job` to completion and report how it ended.
    ///
    /// Never panics and never returns early without an outcome; every
    /// failure mode maps to `success == false` with a message.
    pub async fn run(&self, job: &Job) -> JobOutcome {
        let tool = self.config.tool_path.display().to_string();
        info!(
            target: "vidgrab.job",
            job_id = %job.id,
            link = %job.link,
            tool = %tool,
            "Starting job"
        );

        let mut child = match build_command(&self.config, job).spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(target: "vidgrab.job", job_id = %job.id, tool = %tool, error = %e, "Failed to start tool");
                return JobOutcome::spawn_failed(job.id, format!("failed to start {tool}: {e}"));
            }
        };

        let stdout = StreamCapture::spawn(child.stdout.take());
        let stderr = StreamCapture::spawn(child.stderr.take());

        let status = match timeout(self.config.timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                warn!(target: "vidgrab.job", job_id = %job.id, error = %e, "Failed to wait for tool");
                let output = CapturedOutput::collect(stdout, stderr).await;
                return JobOutcome::failed(
                    job.id,
                    None,
                    format!("failed to wait for {tool}: {e}"),
                    output.combined(),
                );
            }
            Err(_) => {
                warn!(
                    target: "vidgrab.job",
                    job_id = %job.id,
                    timeout = ?self.config.timeout,
                    "Job timed out, terminating tool"
                );
                if let Err(e) = terminate(&mut child, self.config.kill_grace).await {
                    warn!(target: "vidgrab.job", job_id = %job.id, error = %e, "Failed to terminate tool");
                }
                let output = CapturedOutput::collect(stdout, stderr).await;
                return JobOutcome::failed(
                    job.id,
                    None,
                    format!(
                        "timed out after {} seconds",
                        self.config.timeout.as_secs_f64()
                    ),
                    output.combined(),
                );
            }
        };

        let output = CapturedOutput::collect(stdout, stderr).await;

        let Some(code) = status.code() else {
            warn!(target: "vidgrab.job", job_id = %job.id, status = %status, "Tool terminated by signal");
            return JobOutcome::failed(
                job.id,
                None,
                output.failure_message("terminated by signal"),
                output.combined(),
            );
        };

        let artifact = resolve_artifact(self.store.as_ref(), &job.id).await;
        match (code, artifact) {
            (0, Some(entry)) => {
                info!(
                    target: "vidgrab.job",
                    job_id = %job.id,
                    file = %entry.name,
                    size = entry.size,
                    "Job succeeded"
                );
                let file = public_file_ref(&self.config.public_prefix, &entry.name);
                JobOutcome::succeeded(job.id, file, output.combined())
            }
            (0, None) => {
                warn!(target: "vidgrab.job", job_id = %job.id, "Tool exited cleanly but left no output file");
                JobOutcome::failed(
                    job.id,
                    Some(0),
                    output.failure_message(NO_OUTPUT_MESSAGE),
                    output.combined(),
                )
            }
            (code, _) => {
                warn!(target: "vidgrab.job", job_id = %job.id, code, "Tool exited with error");
                JobOutcome::failed(
                    job.id,
                    Some(code),
                    output.failure_message(&format!("exit code {code}")),
                    output.combined(),
                )
            }
        }
    }
}

#[async_trait]
impl JobRunnerPort for YtDlpRunner {
    async fn execute(&self, link: &str) -> JobOutcome {
        let job = Job::new(link, &self.config.output_dir);
        self.run(&job).await
    }
}
