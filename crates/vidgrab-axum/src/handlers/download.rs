//! Download handlers - run a batch and report per-link results.

use std::convert::Infallible;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::sse::{Event, Sse};
use futures_util::stream::Stream;
use serde_json::Value;

use crate::dto::{DownloadRequest, DownloadResponse};
use crate::error::HttpError;
use crate::sse::stream_batch;
use crate::state::AppState;

/// Run every link and answer once the whole batch has finished.
///
/// Individual link failures are reported inside a `200`; only a malformed
/// or oversized batch is a `400`.
pub async fn run(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DownloadResponse>, HttpError> {
    let request = DownloadRequest::from_body(body)?;

    tracing::debug!(target: "vidgrab.http", links = request.links.len(), "Download batch received");

    let results = state.batches.process_batch(&request.links).await?;
    Ok(Json(DownloadResponse { results }))
}

/// Same batch as [`run`], streamed as Server-Sent Events.
///
/// The batch is accepted before the stream opens, so limit violations still
/// get a plain `400`.
pub async fn stream(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static>, HttpError> {
    let request = DownloadRequest::from_body(body)?;
    let batch = state.batches.accept(request.links)?;

    tracing::debug!(target: "vidgrab.http", links = batch.links().len(), "Streaming download batch received");

    Ok(stream_batch(state.batches.clone(), batch))
}
