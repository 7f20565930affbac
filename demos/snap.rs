//! Capture a single frame and print a few statistics about it.

use std::time::Duration;

use poa_camera::{enumerate, AcquisitionPipeline, DeviceSession, SimDriver};

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
    println!("Using {} (SN {})", descriptor.model_name, descriptor.serial_number);

    let mut session = DeviceSession::new(driver, descriptor);
    if let Err(e) = capture(&mut session) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn capture(session: &mut DeviceSession<SimDriver>) -> poa_camera::Result<()> {
    session.open()?;
    session.init()?;
    session.set_exposure(Duration::from_millis(20), false)?;
    session.set_gain(120, false)?;

    let mut frame = vec![0u8; session.frame_bytes()];
    let roi = session.roi();

    let mut pipeline = AcquisitionPipeline::new(session);
    pipeline.snap(&mut frame)?;

    let sum: u64 = frame.iter().map(|&b| b as u64).sum();
    println!(
        "Captured {}x{} frame, {} bytes, mean level {:.1}",
        roi.width,
        roi.height,
        frame.len(),
        sum as f64 / frame.len() as f64
    );
    Ok(())
}
