use anyhow::Result;
use clap::Parser;
use video_ingest::SharedDevice;
use webcam_service::{
    cli::ServiceArgs,
    service::{self, StreamConfig, telemetry},
};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    telemetry::init();
    let config = StreamConfig::from(ServiceArgs::parse());
    let device = open_camera(&config)?;
    service::run(&config, device)
}

#[cfg(feature = "opencv")]
fn open_camera(config: &StreamConfig) -> Result<SharedDevice> {
    use anyhow::Context;
    use video_ingest::{CaptureDevice, OpenCvCamera};

    let camera = OpenCvCamera::open(config.device_index)
        .with_context(|| format!("Failed to open camera #{}", config.device_index))?;
    let (width, height) = camera.resolution();
    tracing::info!("Camera #{} opened at {width}x{height}", camera.index());
    Ok(video_ingest::share(camera))
}

#[cfg(not(feature = "opencv"))]
fn open_camera(_config: &StreamConfig) -> Result<SharedDevice> {
    anyhow::bail!("webcam-service was built without a camera backend; enable the `opencv` feature")
}
