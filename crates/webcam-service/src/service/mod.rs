//! Webcam streaming service: pulls frames from the shared camera, encodes
//! them as JPEG, and serves them over HTTP as an MJPEG multipart stream.
//!
//! Submodules:
//! - `config`: Runtime settings consumed by the server.
//! - `capture`: The per-request read → encode → frame loop.
//! - `encoding`: JPEG encoding and multipart part framing.
//! - `server`: Actix Web routes and the blocking server entry point.
//! - `telemetry`: Tracing subscriber bootstrap.

pub use capture::frame_stream;
pub use config::StreamConfig;
pub use encoding::{BOUNDARY, STREAM_CONTENT_TYPE, encode_jpeg, multipart_chunk};
pub use server::{STATUS_MESSAGE, ServiceState, configure, run};

pub mod capture;
pub mod config;
pub mod encoding;
pub mod server;
pub mod telemetry;
