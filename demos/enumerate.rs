//! List all connected cameras with their property snapshots.

use poa_camera::{enumerate, SimCameraConfig, SimDriver};

fn main() {
    env_logger::init();

    let driver = SimDriver::with_default_camera();
    driver.add_camera(SimCameraConfig::color());

    match enumerate(&driver) {
        Ok(devices) => {
            println!("Found {} camera(s):", devices.len());
            for (i, dev) in devices.iter().enumerate() {
                println!(
                    "  [{}] {}  SN={}  {}x{} {}bit  {:?}  bins={:?}  formats={:?}",
                    i,
                    dev.model_name,
                    dev.serial_number,
                    dev.max_width,
                    dev.max_height,
                    dev.bit_depth,
                    dev.bayer_pattern,
                    dev.bins,
                    dev.img_formats
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
