//! JPEG encoding and multipart framing for the MJPEG stream.
//!
//! Each streamed part is self-delimited: the boundary line, a single
//! `Content-Type` header, a blank line, the JPEG payload, and a line break.

use actix_web::web::Bytes;
use anyhow::{Result, anyhow, bail};
use image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder};
use video_ingest::{Frame, FrameFormat};

/// Multipart boundary token announced in the response content type.
pub const BOUNDARY: &str = "frame";
pub const STREAM_CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

const PART_HEADER: &[u8] = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n";
const PART_TRAILER: &[u8] = b"\r\n";

/// Encode a captured frame as a baseline JPEG at the frame's own resolution.
///
/// `quality` is clamped to 1..=100. BGR frames are reordered to RGB first.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>> {
    if frame.width <= 0 || frame.height <= 0 {
        bail!("frame has no pixels ({}x{})", frame.width, frame.height);
    }
    let expected = frame.expected_len();
    if frame.data.len() != expected {
        bail!(
            "frame buffer holds {} bytes, {}x{} {:?} needs {expected}",
            frame.data.len(),
            frame.width,
            frame.height,
            frame.format
        );
    }

    let (width, height) = (frame.width as u32, frame.height as u32);
    let mut buffer = Vec::with_capacity(expected / 8);
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    let written = match frame.format {
        FrameFormat::Bgr8 => {
            let rgb: Vec<u8> = frame
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect();
            encoder.write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        }
        FrameFormat::Rgb8 => {
            encoder.write_image(&frame.data, width, height, ExtendedColorType::Rgb8)
        }
        FrameFormat::Gray8 => {
            encoder.write_image(&frame.data, width, height, ExtendedColorType::L8)
        }
    };
    written.map_err(|err| anyhow!("JPEG encode failed: {err}"))?;

    Ok(buffer)
}

/// Wrap an encoded JPEG as one part of the `multipart/x-mixed-replace` body.
pub fn multipart_chunk(jpeg: &[u8]) -> Bytes {
    let mut payload = Vec::with_capacity(PART_HEADER.len() + jpeg.len() + PART_TRAILER.len());
    payload.extend_from_slice(PART_HEADER);
    payload.extend_from_slice(jpeg);
    payload.extend_from_slice(PART_TRAILER);
    Bytes::from(payload)
}
