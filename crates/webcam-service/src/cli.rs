use clap::Parser;

use crate::service::StreamConfig;

/// Serve the first local webcam as an MJPEG stream on 127.0.0.1:8001.
///
/// Takes no options beyond `--help` and `--version`; set `RUST_LOG` to change
/// log verbosity.
#[derive(Debug, Parser)]
#[command(name = "webcam-service", version)]
pub struct ServiceArgs {}

impl From<ServiceArgs> for StreamConfig {
    fn from(_args: ServiceArgs) -> Self {
        Self::default()
    }
}
