//! Camera capture primitives shared by the streaming service.
//!
//! A capture source is anything implementing [`CaptureDevice`]. The service
//! holds exactly one device for the whole process behind a [`SharedDevice`]
//! and pulls frames from it on demand; nothing here buffers or spawns threads.

use std::sync::{Arc, Mutex};

#[cfg(feature = "opencv")]
pub mod camera;
pub mod types;

#[cfg(feature = "opencv")]
pub use camera::OpenCvCamera;
pub use types::{CaptureError, Frame, FrameFormat};

/// Blocking frame source.
pub trait CaptureDevice: Send {
    /// Read the next frame. Any error means no frame is available now; callers
    /// cannot tell a busy device from a vanished one.
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Native (width, height) reported by the device.
    fn resolution(&self) -> (i32, i32);
}

/// Process-wide handle to the open camera. Each read holds the lock for one
/// frame only.
pub type SharedDevice = Arc<Mutex<Box<dyn CaptureDevice>>>;

/// Wrap a device so it can be handed to every request.
pub fn share<D: CaptureDevice + 'static>(device: D) -> SharedDevice {
    let device: Box<dyn CaptureDevice> = Box::new(device);
    Arc::new(Mutex::new(device))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Solid {
        reads: usize,
    }

    impl CaptureDevice for Solid {
        fn read_frame(&mut self) -> Result<Frame, CaptureError> {
            self.reads += 1;
            Ok(Frame {
                data: vec![7; 4 * 2 * 3],
                width: 4,
                height: 2,
                timestamp_ms: 0,
                format: FrameFormat::Rgb8,
            })
        }

        fn resolution(&self) -> (i32, i32) {
            (4, 2)
        }
    }

    #[test]
    fn shared_device_reads_through_the_lock() {
        let device = share(Solid { reads: 0 });
        let frame = device.lock().unwrap().read_frame().unwrap();
        assert_eq!(frame.data.len(), frame.expected_len());
        assert_eq!(device.lock().unwrap().resolution(), (4, 2));
    }

    #[test]
    fn expected_len_follows_format() {
        let mut frame = Frame {
            data: Vec::new(),
            width: 640,
            height: 480,
            timestamp_ms: 0,
            format: FrameFormat::Bgr8,
        };
        assert_eq!(frame.expected_len(), 640 * 480 * 3);
        frame.format = FrameFormat::Gray8;
        assert_eq!(frame.expected_len(), 640 * 480);
        frame.width = -1;
        assert_eq!(frame.expected_len(), 0);
    }
}
