use anyhow::Error;
use thiserror::Error;

/// Raw frame captured from a video source, tightly packed and row-major.
#[derive(Clone, Debug)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: i32,
    pub height: i32,
    pub timestamp_ms: i64,
    pub format: FrameFormat,
}

impl Frame {
    /// Number of bytes a tightly packed buffer of this frame must hold.
    pub fn expected_len(&self) -> usize {
        let width = self.width.max(0) as usize;
        let height = self.height.max(0) as usize;
        width * height * self.format.channels()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameFormat {
    /// OpenCV's native channel order.
    Bgr8,
    Rgb8,
    Gray8,
}

impl FrameFormat {
    pub fn channels(self) -> usize {
        match self {
            FrameFormat::Bgr8 | FrameFormat::Rgb8 => 3,
            FrameFormat::Gray8 => 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to open video device #{index}")]
    Open { index: i32 },
    /// Covers disconnects, end of input and a busy device alike.
    #[error("failed to read frame: {0}")]
    Read(String),
    #[error(transparent)]
    Backend(#[from] Error),
}
