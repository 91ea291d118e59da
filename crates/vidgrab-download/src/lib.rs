//! Job runner for vidgrab.
//!
//! Implements [`JobRunnerPort`](vidgrab_core::JobRunnerPort) by driving the
//! external retrieval tool (yt-dlp by default) as a subprocess:
//!
//! 1. a fresh job identifier is embedded in the output template,
//! 2. the tool runs with discrete arguments (never through a shell),
//! 3. stdout and stderr are captured while the process runs,
//! 4. the wait is bounded by a per-job timeout,
//! 5. the output directory is scanned for files carrying the job's prefix.
//!
//! The filesystem side lives in [`FsArtifactStore`]; the selection policy
//! itself is in `vidgrab_core::artifact`.

mod exec;
mod store;

pub use exec::command::{
    END_OF_OPTIONS, NO_PROGRESS_FLAG, NO_WARNINGS_FLAG, OUTPUT_FLAG, build_args,
};
pub use exec::{DEFAULT_KILL_GRACE, NO_OUTPUT_MESSAGE, RunnerConfig, YtDlpRunner};
pub use store::FsArtifactStore;
