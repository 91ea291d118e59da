//! HTTP adapter for vidgrab.
//!
//! Exposes the batch coordinator over Axum: `POST /api/download` runs a
//! batch and answers with every per-link result, `POST /api/download/stream`
//! streams the same records as Server-Sent Events, and finished files are
//! served from the output directory.
#![deny(unused_crate_dependencies)]

// Test-only dependencies
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tower as _;

// Used by the `vidgrab` binary
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod cli;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod sse;
pub mod state;

// Re-export primary types
pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, start_server};
pub use cli::Cli;
pub use error::HttpError;
pub use routes::{create_router, create_spa_router};
pub use state::AppState;
