//! # poa-camera - Rust binding core for POA astronomy cameras
//!
//! Typed, state-checked layer over the vendor camera driver. Provides:
//! - Device enumeration with full property snapshots
//! - A per-camera session owning the `Closed -> Opened -> Exposing` lifecycle
//! - Typed configuration with per-identifier attributes, bounds, and auto mode
//! - ROI / format / binning control with the driver's alignment rules
//! - A frame acquisition pipeline with timeouts and dropped-frame accounting
//! - An in-memory simulated driver for development and tests without hardware
//!
//! ## Quick Start
//! ```no_run
//! use poa_camera::{enumerate, AcquisitionPipeline, DeviceSession, SimDriver};
//! use std::time::Duration;
//!
//! let driver = SimDriver::with_default_camera();
//! let descriptor = enumerate(&driver).unwrap().remove(0);
//!
//! let mut session = DeviceSession::new(driver, descriptor);
//! session.open().unwrap();
//! session.init().unwrap();
//! session.set_exposure(Duration::from_millis(10), false).unwrap();
//!
//! let mut frame = vec![0u8; session.frame_bytes()];
//! let mut pipeline = AcquisitionPipeline::new(&mut session);
//! pipeline.snap(&mut frame).unwrap();
//! ```

pub mod acquisition;
pub mod config;
pub mod driver;
pub mod error;
pub mod session;
pub mod sim;
pub mod types;

pub use acquisition::{AcquisitionPipeline, ExposureMode, FETCH_MARGIN};
pub use config::{ConfigAttributes, ConfigId, ConfigRegistry, ConfigValue, ValueType};
pub use driver::CameraDriver;
pub use error::Error;
pub use session::{enumerate, DeviceSession};
pub use sim::{SimCameraConfig, SimDriver};
pub use types::*;

/// Result type alias for camera operations.
pub type Result<T> = std::result::Result<T, Error>;
