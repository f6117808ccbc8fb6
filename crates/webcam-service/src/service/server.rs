//! Actix Web front end: a liveness route and the MJPEG stream route.
//!
//! The server owns no frames. Each `/video_feed` request starts its own
//! capture loop against the one shared camera, so concurrent viewers take
//! turns reading from the device.

use actix_web::{App, HttpResponse, HttpServer, http::header, web};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use video_ingest::SharedDevice;

use crate::service::{StreamConfig, capture::frame_stream, encoding::STREAM_CONTENT_TYPE};

pub const STATUS_MESSAGE: &str = "Webcam Service Running";

/// Shared state backing HTTP handlers.
pub struct ServiceState {
    device: SharedDevice,
    jpeg_quality: u8,
}

impl ServiceState {
    pub fn new(device: SharedDevice, jpeg_quality: u8) -> Self {
        Self {
            device,
            jpeg_quality,
        }
    }
}

#[derive(Serialize)]
struct StatusResponse {
    message: &'static str,
}

/// Register the service routes. Expects `web::Data<ServiceState>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status_route))
        .route("/video_feed", web::get().to(video_feed_route));
}

/// Bind the configured address and serve until the process is interrupted.
pub fn run(config: &StreamConfig, device: SharedDevice) -> Result<()> {
    let state = web::Data::new(ServiceState::new(device, config.jpeg_quality));
    let (host, port) = config.bind_addr();
    let stream_url = config.stream_url();

    actix_web::rt::System::new().block_on(async move {
        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .configure(configure)
        })
        .bind((host, port))
        .with_context(|| format!("Failed to bind {host}:{port}"))?
        .run();

        info!("MJPEG stream available at {stream_url}");
        server.await.context("HTTP server error")
    })
}

/// Liveness check; never touches the camera.
async fn status_route() -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        message: STATUS_MESSAGE,
    })
}

/// Stream the camera as `multipart/x-mixed-replace` until a read fails or the
/// client goes away.
async fn video_feed_route(state: web::Data<ServiceState>) -> HttpResponse {
    let stream = frame_stream(state.device.clone(), state.jpeg_quality);

    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .insert_header((header::CONTENT_TYPE, STREAM_CONTENT_TYPE))
        .streaming(stream)
}
