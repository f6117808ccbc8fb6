//! Per-request capture loop.
//!
//! Every `/video_feed` request gets its own lazy stream over the shared
//! camera. The transport pulls one part at a time; each pull reads exactly one
//! frame, so nothing is captured ahead of a slow client. The first failed read
//! ends the stream without an error part.

use std::sync::atomic::{AtomicU64, Ordering};

use actix_web::web::{self, Bytes};
use async_stream::stream;
use futures_core::Stream;
use tracing::{Span, debug, warn};
use video_ingest::{CaptureError, SharedDevice};

use crate::service::encoding::{encode_jpeg, multipart_chunk};

static NEXT_STREAM_ID: AtomicU64 = AtomicU64::new(1);

/// Why a capture loop stopped producing parts.
#[derive(Debug)]
enum StreamEnd {
    /// Disconnected, exhausted or busy device. Treated as a clean end.
    Read(CaptureError),
    Encode(anyhow::Error),
    Poisoned,
}

/// Build the multipart body stream for one client.
///
/// Device reads and JPEG encoding run on the blocking pool. The stream never
/// restarts; once it ends, a new request is needed for more frames.
pub fn frame_stream(
    device: SharedDevice,
    jpeg_quality: u8,
) -> impl Stream<Item = Result<Bytes, actix_web::Error>> + 'static {
    let stream_id = NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed);
    let span = tracing::info_span!("capture.stream", stream = stream_id);

    stream! {
        let mut emitted: u64 = 0;
        loop {
            let device = device.clone();
            let step_span = span.clone();
            let step = web::block(move || {
                step_span.in_scope(|| next_part(&device, jpeg_quality))
            })
            .await;

            match step {
                Ok(Ok(part)) => {
                    emitted += 1;
                    yield Ok::<Bytes, actix_web::Error>(part);
                }
                Ok(Err(end)) => {
                    log_end(&span, emitted, &end);
                    break;
                }
                Err(err) => {
                    span.in_scope(|| warn!(parts = emitted, "capture worker failed: {err}"));
                    break;
                }
            }
        }
    }
}

/// Read, encode and frame a single part. Holds the device lock only for the
/// read.
fn next_part(device: &SharedDevice, jpeg_quality: u8) -> Result<Bytes, StreamEnd> {
    let frame = {
        let mut guard = device.lock().map_err(|_| StreamEnd::Poisoned)?;
        guard.read_frame().map_err(StreamEnd::Read)?
    };
    let jpeg = tracing::info_span!(
        "capture.encode",
        width = frame.width,
        height = frame.height,
        captured_at_ms = frame.timestamp_ms
    )
    .in_scope(|| encode_jpeg(&frame, jpeg_quality))
    .map_err(StreamEnd::Encode)?;
    Ok(multipart_chunk(&jpeg))
}

fn log_end(span: &Span, emitted: u64, end: &StreamEnd) {
    span.in_scope(|| match end {
        StreamEnd::Read(err) => debug!(parts = emitted, "stream ended: {err}"),
        StreamEnd::Encode(err) => warn!(parts = emitted, "stream ended on encode failure: {err}"),
        StreamEnd::Poisoned => warn!(parts = emitted, "stream ended: camera lock poisoned"),
    });
}
