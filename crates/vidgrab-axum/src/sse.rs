//! Server-Sent Events for the streaming download endpoint.
//!
//! The batch runs on its own task and reports through a channel. Every
//! `started` and terminal record becomes a `link` event; the full result
//! list follows as a single `done` event. Dropping the response stream (the
//! client went away) aborts the task, which drops the running child and
//! kills it.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::task::AbortOnDropHandle;
use vidgrab_core::{BatchCoordinator, LinkResult, LinkResultSink, ValidatedBatch};

use crate::dto::{DownloadResponse, LinkEvent};

pub const LINK_EVENT: &str = "link";
pub const DONE_EVENT: &str = "done";
/// Sent in place of an event whose payload failed to serialize.
pub const ERROR_EVENT: &str = "error";

#[derive(Debug)]
enum BatchEvent {
    Link(LinkEvent),
    Done(Vec<LinkResult>),
}

impl BatchEvent {
    fn into_sse(self) -> Event {
        match self {
            Self::Link(event) => json_event(LINK_EVENT, &event),
            Self::Done(results) => json_event(DONE_EVENT, &DownloadResponse { results }),
        }
    }
}

fn json_event(name: &str, payload: &impl Serialize) -> Event {
    Event::default()
        .event(name)
        .json_data(payload)
        .unwrap_or_else(|e| {
            tracing::warn!(target: "vidgrab.http", error = %e, "Failed to serialize event");
            Event::default().event(ERROR_EVENT).data(e.to_string())
        })
}

/// Forwards coordinator callbacks into the event channel.
struct ChannelSink {
    sender: mpsc::UnboundedSender<BatchEvent>,
}

impl LinkResultSink for ChannelSink {
    fn emit(&self, index: usize, result: &LinkResult) {
        // A closed channel means the client is gone; the task is about to be aborted.
        let _ = self.sender.send(BatchEvent::Link(LinkEvent {
            index,
            result: result.clone(),
        }));
    }
}

/// Run an accepted batch on a background task and stream its progress.
pub fn stream_batch(
    batches: Arc<BatchCoordinator>,
    batch: ValidatedBatch,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    let (sender, receiver) = mpsc::unbounded_channel();

    let task = tokio::spawn(async move {
        let sink = ChannelSink {
            sender: sender.clone(),
        };
        let results = batches.run_validated(&batch, &sink).await;
        let _ = sender.send(BatchEvent::Done(results));
    });
    let guard = AbortOnDropHandle::new(task);

    let stream = UnboundedReceiverStream::new(receiver).map(move |event| {
        // Keeps the batch task alive exactly as long as the response stream.
        let _guard = &guard;
        Ok(event.into_sse())
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}
