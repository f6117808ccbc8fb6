//! OpenCV-backed webcam.

use chrono::Utc;
use opencv::{
    core::{self, Mat, MatTraitConstManual},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureTrait, VideoCaptureTraitConst},
};
use tracing::{debug, warn};

use crate::{
    CaptureDevice,
    types::{CaptureError, Frame, FrameFormat},
};

/// A local capture device opened by index, read synchronously one frame at a
/// time.
pub struct OpenCvCamera {
    cap: VideoCapture,
    index: i32,
    width: i32,
    height: i32,
}

impl OpenCvCamera {
    /// Open the device at `index`, preferring V4L and falling back to whatever
    /// backend OpenCV picks.
    pub fn open(index: i32) -> Result<Self, CaptureError> {
        let cap = open_video_capture(index)?;
        let width = cap
            .get(videoio::CAP_PROP_FRAME_WIDTH)
            .map_err(backend)?
            .round() as i32;
        let height = cap
            .get(videoio::CAP_PROP_FRAME_HEIGHT)
            .map_err(backend)?
            .round() as i32;
        debug!(index, width, height, "camera opened");

        Ok(Self {
            cap,
            index,
            width,
            height,
        })
    }

    pub fn index(&self) -> i32 {
        self.index
    }
}

impl CaptureDevice for OpenCvCamera {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let mut mat = Mat::default();
        let grabbed = self
            .cap
            .read(&mut mat)
            .map_err(|e| CaptureError::Read(e.to_string()))?;
        if !grabbed || mat.empty() {
            return Err(CaptureError::Read(format!(
                "device #{} returned no frame",
                self.index
            )));
        }
        mat_to_frame(&mat)
    }

    fn resolution(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        let _ = self.cap.release();
    }
}

fn open_video_capture(index: i32) -> Result<VideoCapture, CaptureError> {
    for api in [videoio::CAP_V4L, videoio::CAP_ANY] {
        match VideoCapture::new(index, api) {
            Ok(cap) => {
                if cap.is_opened().map_err(backend)? {
                    return Ok(cap);
                }
            }
            Err(err) => {
                warn!("failed to open device #{index} with backend {api}: {err}");
            }
        }
    }

    Err(CaptureError::Open { index })
}

/// Copy a Mat into a tightly packed frame buffer.
///
/// Wider samples are scaled down to 8 bits and a BGRA alpha channel is
/// dropped, so every frame leaves here as `Bgr8` or `Gray8`.
fn mat_to_frame(mat: &Mat) -> Result<Frame, CaptureError> {
    let scaled;
    let mat = if mat.depth() == core::CV_8U {
        mat
    } else {
        scaled = to_8bit(mat)?;
        &scaled
    };

    let bgr;
    let (mat, format) = match mat.channels() {
        3 => (mat, FrameFormat::Bgr8),
        1 => (mat, FrameFormat::Gray8),
        4 => {
            let mut out = Mat::default();
            imgproc::cvt_color_def(mat, &mut out, imgproc::COLOR_BGRA2BGR).map_err(backend)?;
            bgr = out;
            (&bgr, FrameFormat::Bgr8)
        }
        other => {
            return Err(CaptureError::Read(format!(
                "unsupported channel count {other}"
            )));
        }
    };

    // A deep clone is always continuous.
    let packed;
    let source = if mat.is_continuous() {
        mat
    } else {
        packed = mat.try_clone().map_err(backend)?;
        &packed
    };
    let data = source.data_bytes().map_err(backend)?.to_vec();

    Ok(Frame {
        data,
        width: mat.cols(),
        height: mat.rows(),
        timestamp_ms: Utc::now().timestamp_millis(),
        format,
    })
}

fn to_8bit(mat: &Mat) -> Result<Mat, CaptureError> {
    let alpha = match mat.depth() {
        core::CV_16U | core::CV_16S => 1.0 / 256.0,
        core::CV_32F | core::CV_64F => 255.0,
        _ => 1.0,
    };
    let mut out = Mat::default();
    mat.convert_to(&mut out, core::CV_8U, alpha, 0.0).map_err(backend)?;
    Ok(out)
}

fn backend(err: opencv::Error) -> CaptureError {
    CaptureError::Backend(err.into())
}
