//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together.
//! The concrete job runner is instantiated here and handed to the core
//! `BatchCoordinator` as a trait object.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use vidgrab_core::{
    BatchCoordinator, BatchPolicy, JobRunnerPort, Settings,
    ensure_directory, resolve_output_dir, validate_settings,
};
use vidgrab_download::{RunnerConfig, YtDlpRunner};

use crate::routes::{create_router, create_spa_router};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Optional path to static assets for SPA serving.
    pub static_dir: Option<PathBuf>,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// Batch and job settings.
    pub settings: Settings,
}

impl ServerConfig {
    /// Create config with default settings.
    pub fn with_defaults() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: None,
            cors: CorsConfig::default(),
            settings: Settings::default(),
        }
    }

    /// Set the static directory for SPA serving.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// Validated settings the server was started with.
    pub settings: Settings,
    /// Absolute output directory, served under `settings.public_prefix`.
    pub output_dir: PathBuf,
    /// Batch coordinator shared by every request.
    pub batches: Arc<BatchCoordinator>,
}

impl AxumContext {
    /// Wire a context around any job runner.
    pub fn new(settings: Settings, output_dir: PathBuf, runner: Arc<dyn JobRunnerPort>) -> Self {
        let policy = BatchPolicy::from_settings(&settings);
        Self {
            settings,
            output_dir,
            batches: Arc::new(BatchCoordinator::new(runner, policy)),
        }
    }

    /// Public download prefix without a trailing slash.
    pub fn public_prefix(&self) -> &str {
        self.settings.public_prefix.trim_end_matches('/')
    }
}

/// Validate settings, prepare the output directory and build the runner.
pub fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    let settings = config.settings.clone();
    validate_settings(&settings).context("invalid settings")?;

    let output_dir = resolve_output_dir(&settings.output_dir)?;
    ensure_directory(&output_dir).context("output directory is not usable")?;

    info!(
        target: "vidgrab.paths",
        output_dir = %output_dir.display(),
        tool = %settings.tool_path.display(),
        public_prefix = %settings.public_prefix,
        max_links = settings.max_links,
        concurrency = settings.concurrency,
        job_timeout_secs = settings.job_timeout_secs,
        "Bootstrap resolved configuration"
    );

    let runner: Arc<dyn JobRunnerPort> = Arc::new(YtDlpRunner::new(RunnerConfig::from_settings(
        &settings,
        output_dir.clone(),
    )));

    Ok(AxumContext::new(settings, output_dir, runner))
}

/// Start the web server.
///
/// If `config.static_dir` is set, serves static assets with SPA fallback.
/// Otherwise, serves only the API endpoints and the download directory.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let ctx = bootstrap(&config)?;

    let app = if let Some(ref static_dir) = config.static_dir {
        info!(target: "vidgrab.http", static_dir = %static_dir.display(), "Serving static assets");
        create_spa_router(ctx, static_dir, &config.cors)
    } else {
        create_router(ctx, &config.cors)
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local: SocketAddr = listener.local_addr()?;

    info!(target: "vidgrab.http", "vidgrab listening on http://{local}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(target: "vidgrab.http", error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(target: "vidgrab.http", "Shutdown requested");
}
