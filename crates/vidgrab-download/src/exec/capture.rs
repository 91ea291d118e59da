//! Incremental capture of a child's output streams.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::debug;
use vidgrab_core::failure_message;

/// How long to keep reading after the process is gone.
///
/// A grandchild (e.g. a muxer the tool started) can inherit the pipe and keep
/// it open; whatever arrived before the grace period is kept.
const DRAIN_GRACE: Duration = Duration::from_secs(5);

const CHUNK_SIZE: usize = 8 * 1024;

/// Background reader appending one stream into a shared buffer.
pub(crate) struct StreamCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
    task: JoinHandle<()>,
}

impl StreamCapture {
    /// Start draining `reader`. A missing pipe yields an empty capture.
    pub(crate) fn spawn<R>(reader: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buffer);
        let task = tokio::spawn(async move {
            let Some(mut reader) = reader else {
                return;
            };
            let mut chunk = vec![0u8; CHUNK_SIZE];
            loop {
                match reader.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => {
                        if let Ok(mut buf) = sink.lock() {
                            buf.extend_from_slice(&chunk[..n]);
                        }
                    }
                    Err(e) => {
                        debug!(target: "vidgrab.job", error = %e, "Output stream read failed");
                        break;
                    }
                }
            }
        });
        Self { buffer, task }
    }

    /// Wait for end-of-stream (bounded) and decode what was read.
    pub(crate) async fn finish(mut self) -> String {
        if timeout(DRAIN_GRACE, &mut self.task).await.is_err() {
            debug!(target: "vidgrab.job", "Output stream still open after exit, keeping partial capture");
            self.task.abort();
        }
        let bytes = self
            .buffer
            .lock()
            .map(|buf| buf.clone())
            .unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Decoded stdout and stderr of one job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub(crate) async fn collect(stdout: StreamCapture, stderr: StreamCapture) -> Self {
        let (stdout, stderr) = tokio::join!(stdout.finish(), stderr.finish());
        Self { stdout, stderr }
    }

    /// Stdout followed by stderr.
    pub(crate) fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    pub(crate) fn failure_message(&self, fallback: &str) -> String {
        failure_message(&self.stderr, &self.stdout, fallback)
    }
}
