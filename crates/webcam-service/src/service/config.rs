/// Loopback only; the service is never reachable off-host.
pub const LISTEN_HOST: &str = "127.0.0.1";
pub const LISTEN_PORT: u16 = 8001;
/// Matches OpenCV's `imencode` default.
pub const JPEG_QUALITY: u8 = 95;

/// Settings shared by the server and every capture loop it starts.
#[derive(Clone, Debug)]
pub struct StreamConfig {
    /// Camera opened at startup. Always the first device.
    pub device_index: i32,
    /// JPEG quality for streamed frames.
    pub jpeg_quality: u8,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

impl StreamConfig {
    /// The fixed loopback address the server binds.
    pub fn bind_addr(&self) -> (&'static str, u16) {
        (LISTEN_HOST, LISTEN_PORT)
    }

    /// URL clients open to watch the stream.
    pub fn stream_url(&self) -> String {
        let (host, port) = self.bind_addr();
        format!("http://{host}:{port}/video_feed")
    }
}
