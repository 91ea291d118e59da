//! Request and response bodies for the HTTP API.

pub mod download;

pub use download::{DownloadRequest, DownloadResponse, LinkEvent};
