// Newline-delimited JSON streaming of view events
use crate::application::view_state::ViewEvent;
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use bytes::{BufMut, Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::Stream;
use tokio::sync::broadcast::{self, error::RecvError};

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Stream every view transition as one JSON object per line
pub fn ndjson_response<S>(events: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = ViewEvent> + Send + 'static,
{
    let lines = events.map(|event| encode_line(&event));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(lines))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

fn encode_line(event: &ViewEvent) -> Result<Bytes, serde_json::Error> {
    let payload = serde_json::to_vec(event)?;
    let mut line = BytesMut::with_capacity(payload.len() + 1);
    line.put_slice(&payload);
    line.put_u8(b'\n');
    Ok(line.freeze())
}

/// Adapt a broadcast receiver into a stream, skipping over lag
pub fn receiver_stream(mut rx: broadcast::Receiver<ViewEvent>) -> impl Stream<Item = ViewEvent> + Send + 'static {
    async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => yield event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event stream lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}
