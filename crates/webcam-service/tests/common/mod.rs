#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use actix_web::web;
use video_ingest::{CaptureDevice, CaptureError, Frame, FrameFormat, SharedDevice, share};
use webcam_service::service::ServiceState;

pub const PART_HEADER: &[u8] = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n";

/// Solid gray level used for the `index`-th scripted frame.
pub fn level(index: usize) -> u8 {
    (20 + 40 * index) as u8
}

/// Yields a fixed number of solid frames, then fails every read.
pub struct ScriptedCamera {
    width: i32,
    height: i32,
    total: usize,
    produced: usize,
    reads: Arc<AtomicUsize>,
}

impl ScriptedCamera {
    pub fn new(frames: usize, width: i32, height: i32) -> Self {
        assert!(frames <= 6, "levels must stay within u8 range");
        Self {
            width,
            height,
            total: frames,
            produced: 0,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Counter of every `read_frame` call, successful or not.
    pub fn reads(&self) -> Arc<AtomicUsize> {
        self.reads.clone()
    }
}

impl CaptureDevice for ScriptedCamera {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.produced == self.total {
            return Err(CaptureError::Read("device disconnected".into()));
        }
        let value = level(self.produced);
        self.produced += 1;
        Ok(Frame {
            data: vec![value; (self.width * self.height * 3) as usize],
            width: self.width,
            height: self.height,
            timestamp_ms: 0,
            format: FrameFormat::Bgr8,
        })
    }

    fn resolution(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}

pub fn state(device: SharedDevice) -> web::Data<ServiceState> {
    web::Data::new(ServiceState::new(device, 95))
}

pub fn scripted(frames: usize, width: i32, height: i32) -> (SharedDevice, Arc<AtomicUsize>) {
    let camera = ScriptedCamera::new(frames, width, height);
    let reads = camera.reads();
    (share(camera), reads)
}

/// Split an MJPEG body into JPEG payloads, panicking on any malformed part.
pub fn split_parts(body: &[u8]) -> Vec<&[u8]> {
    const EOI: &[u8] = b"\xFF\xD9\r\n";

    let mut parts = Vec::new();
    let mut rest = body;
    while !rest.is_empty() {
        assert!(
            rest.starts_with(PART_HEADER),
            "part {} does not start with the multipart header",
            parts.len()
        );
        rest = &rest[PART_HEADER.len()..];
        let end = rest
            .windows(EOI.len())
            .position(|window| window == EOI)
            .expect("JPEG payload without end-of-image marker");
        let payload_len = end + 2;
        parts.push(&rest[..payload_len]);
        rest = &rest[payload_len + 2..];
    }
    parts
}

/// Decode a part and return its dimensions and the gray level at the centre,
/// asserting the whole image is one uniform level.
pub fn decode_solid(jpeg: &[u8]) -> (u32, u32, u8) {
    let image = image::load_from_memory(jpeg).unwrap().to_luma8();
    let (width, height) = image.dimensions();
    let centre = image.get_pixel(width / 2, height / 2).0[0];
    for (_, _, pixel) in image.enumerate_pixels() {
        assert!(
            pixel.0[0].abs_diff(centre) <= 3,
            "part mixes levels {} and {centre}",
            pixel.0[0]
        );
    }
    (width, height, centre)
}

/// Index of the scripted frame a decoded level came from.
pub fn frame_index(centre: u8) -> usize {
    (0..6)
        .min_by_key(|&index| level(index).abs_diff(centre))
        .unwrap()
}
