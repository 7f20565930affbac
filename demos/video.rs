//! Run a continuous exposure for a couple of seconds and report the
//! achieved frame rate and any dropped frames.

use std::time::{Duration, Instant};

use poa_camera::{
    enumerate, AcquisitionPipeline, DeviceSession, ExposureMode, Roi, SimDriver,
};

fn main() {
    env_logger::init();

    let driver = SimDriver::with_default_camera();
    let descriptor = match enumerate(&driver) {
        Ok(mut devices) if !devices.is_empty() => devices.remove(0),
        Ok(_) => {
            eprintln!("No camera found");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut session = DeviceSession::new(driver, descriptor);
    if let Err(e) = stream(&mut session) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn stream(session: &mut DeviceSession<SimDriver>) -> poa_camera::Result<()> {
    session.open()?;
    session.init()?;
    session.set_exposure(Duration::from_millis(10), false)?;
    session.set_roi(Roi::new(0, 0, 640, 480))?;

    let mut frame = vec![0u8; session.frame_bytes()];
    let mut pipeline = AcquisitionPipeline::new(session);
    pipeline.start(ExposureMode::Continuous)?;

    let deadline = Instant::now() + Duration::from_secs(2);
    let mut frames = 0u32;
    while Instant::now() < deadline {
        match pipeline.fetch_next(&mut frame) {
            Ok(()) => frames += 1,
            Err(poa_camera::Error::Timeout) => continue,
            Err(e) => return Err(e),
        }
    }
    let dropped = pipeline.dropped_frame_count()?;
    pipeline.stop()?;

    println!("{} frames in 2s ({:.1} fps), {} dropped", frames, frames as f64 / 2.0, dropped);
    Ok(())
}
