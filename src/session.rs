//! Device enumeration and the per-camera session state machine.

use std::time::Duration;

use crate::config::{ConfigId, ConfigRegistry, ConfigValue};
use crate::driver::{
    decode_config_attributes, decode_properties, decode_sensor_mode, CameraDriver,
};
use crate::types::{
    CameraState, DeviceDescriptor, GuideDirection, ImageFormat, Roi, SensorMode,
};
use crate::{Error, Result};

/// List all connected cameras with their property snapshots.
///
/// Cameras whose property query or decode fails are skipped with a
/// warning rather than failing the whole enumeration.
pub fn enumerate<D: CameraDriver>(driver: &D) -> Result<Vec<DeviceDescriptor>> {
    let mut devices = Vec::new();
    for index in 0..driver.camera_count() {
        match driver.properties(index).and_then(|raw| decode_properties(&raw)) {
            Ok(desc) => devices.push(desc),
            Err(e) => log::warn!("failed to query camera at index {}: {}", index, e),
        }
    }
    Ok(devices)
}

/// Exclusive owner of one camera's lifecycle.
///
/// Tracks the `Closed -> Opened -> Exposing` state machine itself and
/// enforces every precondition before a call reaches the driver, so state
/// violations surface as errors here instead of disappearing into driver
/// behavior. Also owns the ROI/format/binning sub-state, including the
/// explicit stop-before-reconfigure sequencing.
pub struct DeviceSession<D: CameraDriver> {
    driver: D,
    descriptor: DeviceDescriptor,
    registry: ConfigRegistry,
    state: CameraState,
    roi: Roi,
    bin: u32,
    format: ImageFormat,
}

impl<D: CameraDriver> DeviceSession<D> {
    /// Create a session for an enumerated camera. Starts `Closed`; call
    /// [`DeviceSession::open`] before anything else.
    pub fn new(driver: D, descriptor: DeviceDescriptor) -> Self {
        Self {
            driver,
            descriptor,
            registry: ConfigRegistry::new(Vec::new()),
            state: CameraState::Closed,
            roi: Roi::default(),
            bin: 1,
            format: ImageFormat::Raw8,
        }
    }

    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub(crate) fn driver(&self) -> &D {
        &self.driver
    }

    pub(crate) fn camera_id(&self) -> i32 {
        self.descriptor.camera_id
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == CameraState::Closed {
            return Err(Error::NotOpened);
        }
        Ok(())
    }

    /// Open the camera and load its config registry and current geometry.
    /// A no-op if the session is already open.
    pub fn open(&mut self) -> Result<()> {
        if self.state != CameraState::Closed {
            return Ok(());
        }
        let id = self.camera_id();
        self.driver.open(id)?;

        self.registry = self.load_registry()?;
        let (width, height) = self.driver.image_size(id)?;
        let (start_x, start_y) = self.driver.image_start_pos(id)?;
        self.roi = Roi::new(start_x, start_y, width, height);
        self.bin = self.driver.image_bin(id)?;
        self.format = self.driver.image_format(id)?;
        self.state = CameraState::Opened;

        log::info!(
            "opened {} (SN {}): {}x{} bin{} {:?}, {} configs",
            self.descriptor.model_name,
            self.descriptor.serial_number,
            self.roi.width,
            self.roi.height,
            self.bin,
            self.format,
            self.registry.len()
        );
        Ok(())
    }

    fn load_registry(&self) -> Result<ConfigRegistry> {
        let id = self.camera_id();
        let count = self.driver.config_count(id)?;
        let mut attrs = Vec::with_capacity(count);
        for index in 0..count {
            let raw = self.driver.config_attributes(id, index)?;
            match decode_config_attributes(&raw) {
                Ok(a) => attrs.push(a),
                // Driver-internal or newer-than-this-binding identifiers.
                Err(_) => log::debug!("skipping config code {} at index {}", raw.config_id, index),
            }
        }
        Ok(ConfigRegistry::new(attrs))
    }

    /// Initialize camera hardware and driver buffers. Idempotent; callable
    /// only while `Opened`.
    pub fn init(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.state == CameraState::Exposing {
            return Err(Error::Exposing);
        }
        self.driver.init(self.camera_id())
    }

    /// Close the camera, releasing driver resources. Forces a stop first
    /// if an exposure is in flight. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        if self.state == CameraState::Closed {
            return Ok(());
        }
        if self.state == CameraState::Exposing {
            if let Err(e) = self.driver.stop_exposure(self.camera_id()) {
                log::warn!("stop exposure during close failed: {}", e);
            }
        }
        self.driver.close(self.camera_id())?;
        self.state = CameraState::Closed;
        log::info!("closed {}", self.descriptor.model_name);
        Ok(())
    }

    // --- Typed configuration ---

    /// The per-identifier attribute registry loaded at open.
    pub fn config_registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    /// Read a config value and its auto flag.
    pub fn get_config(&self, id: ConfigId) -> Result<(ConfigValue, bool)> {
        self.ensure_open()?;
        self.registry.validate_get(id)?;
        self.driver.get_config(self.camera_id(), id)
    }

    /// Write a config value, optionally requesting auto mode.
    ///
    /// The registry validates writability, value tag, bounds, and
    /// exposing-state restrictions before the driver sees the call.
    /// `request_auto` on an identifier without auto support is downgraded
    /// to manual with a warning. For trigger identifiers (the flips) the
    /// value is ignored and the write acts as a command.
    pub fn set_config(&mut self, id: ConfigId, value: ConfigValue, request_auto: bool) -> Result<()> {
        self.ensure_open()?;
        let exposing = self.state == CameraState::Exposing;
        let auto = self.registry.validate_set(id, value, request_auto, exposing)?;
        self.driver.set_config(self.camera_id(), id, value, auto)
    }

    /// Set exposure time. Sub-microsecond fractions are truncated.
    pub fn set_exposure(&mut self, exposure: Duration, auto: bool) -> Result<()> {
        let us = i64::try_from(exposure.as_micros()).map_err(|_| Error::OutOfLimit)?;
        self.set_config(ConfigId::Exposure, ConfigValue::Int(us), auto)
    }

    /// Current exposure time and auto flag.
    pub fn exposure(&self) -> Result<(Duration, bool)> {
        let (value, auto) = self.get_config(ConfigId::Exposure)?;
        let us = value.as_int().ok_or(Error::OperationFailed)?;
        Ok((Duration::from_micros(us.max(0) as u64), auto))
    }

    pub fn set_gain(&mut self, gain: i64, auto: bool) -> Result<()> {
        self.set_config(ConfigId::Gain, ConfigValue::Int(gain), auto)
    }

    pub fn gain(&self) -> Result<(i64, bool)> {
        let (value, auto) = self.get_config(ConfigId::Gain)?;
        Ok((value.as_int().ok_or(Error::OperationFailed)?, auto))
    }

    /// Set the image flip state through the four trigger identifiers.
    pub fn set_image_flip(&mut self, horizontal: bool, vertical: bool) -> Result<()> {
        let id = match (horizontal, vertical) {
            (true, true) => ConfigId::FlipBoth,
            (true, false) => ConfigId::FlipHorizontal,
            (false, true) => ConfigId::FlipVertical,
            (false, false) => ConfigId::FlipNone,
        };
        self.set_config(id, ConfigValue::Bool(true), false)
    }

    /// Current (horizontal, vertical) flip state.
    pub fn image_flip(&self) -> Result<(bool, bool)> {
        if self.get_config(ConfigId::FlipBoth)?.0 == ConfigValue::Bool(true) {
            return Ok((true, true));
        }
        if self.get_config(ConfigId::FlipVertical)?.0 == ConfigValue::Bool(true) {
            return Ok((false, true));
        }
        if self.get_config(ConfigId::FlipHorizontal)?.0 == ConfigValue::Bool(true) {
            return Ok((true, false));
        }
        Ok((false, false))
    }

    /// Pulse an ST4 guide line on or off.
    pub fn set_guide(&mut self, direction: GuideDirection, on: bool) -> Result<()> {
        let id = match direction {
            GuideDirection::North => ConfigId::GuideNorth,
            GuideDirection::South => ConfigId::GuideSouth,
            GuideDirection::East => ConfigId::GuideEast,
            GuideDirection::West => ConfigId::GuideWest,
        };
        self.set_config(id, ConfigValue::Bool(on), false)
    }

    // --- ROI, format, binning, sensor mode ---

    /// Current ROI in binned pixels.
    pub fn roi(&self) -> Roi {
        self.roi
    }

    pub fn binning(&self) -> u32 {
        self.bin
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Bytes one full frame occupies at the current ROI and format.
    pub fn frame_bytes(&self) -> usize {
        self.roi.width as usize * self.roi.height as usize * self.format.bytes_per_pixel()
    }

    /// Sensor bounds at the current binning factor.
    fn binned_limits(&self) -> (u32, u32) {
        (
            self.descriptor.max_width / self.bin,
            self.descriptor.max_height / self.bin,
        )
    }

    /// Apply a new ROI.
    ///
    /// Width is rounded down to a multiple of 4 and height to a multiple
    /// of 2, the driver's alignment rule. The area must fit the sensor at
    /// the current binning, else `OutOfLimit`. If an exposure is running
    /// it is stopped first; on a driver failure after that stop the
    /// session stays `Opened` and is not re-armed.
    pub fn set_roi(&mut self, roi: Roi) -> Result<()> {
        self.ensure_open()?;

        let width = roi.width & !3;
        let height = roi.height & !1;
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument);
        }
        if width != roi.width || height != roi.height {
            log::debug!(
                "ROI {}x{} aligned down to {}x{}",
                roi.width,
                roi.height,
                width,
                height
            );
        }

        let (max_w, max_h) = self.binned_limits();
        // Widened to avoid wrapping on absurd offsets.
        if roi.start_x as u64 + width as u64 > max_w as u64
            || roi.start_y as u64 + height as u64 > max_h as u64
        {
            return Err(Error::OutOfLimit);
        }

        self.stop_before_reconfigure("ROI change")?;

        let id = self.camera_id();
        self.driver
            .set_image_size(id, width, height)
            .and_then(|()| self.driver.set_image_start_pos(id, roi.start_x, roi.start_y))
            .map_err(|e| {
                log::warn!("applying ROI failed: {}", e);
                Error::OperationFailed
            })?;

        self.roi = Roi::new(roi.start_x, roi.start_y, width, height);
        Ok(())
    }

    /// Select the image data format. Fails with `InvalidArgument` if the
    /// camera does not support it. Stops a running exposure first.
    pub fn set_format(&mut self, format: ImageFormat) -> Result<()> {
        self.ensure_open()?;
        if !self.descriptor.supports_format(format) {
            return Err(Error::InvalidArgument);
        }
        self.stop_before_reconfigure("format change")?;
        self.driver.set_image_format(self.camera_id(), format)?;
        self.format = format;
        Ok(())
    }

    /// Change the binning factor. The factor must appear in the
    /// descriptor's supported list. Stops a running exposure first.
    ///
    /// The valid ROI range changes with the binning scale, so the driver
    /// may clamp the current ROI; the session re-reads it afterwards and
    /// callers should do the same via [`DeviceSession::roi`]. A previously
    /// set ROI is never auto-restored. If the geometry re-query fails the
    /// error is logged and descriptor-derived fallback bounds are used,
    /// the one documented place where an error is absorbed.
    pub fn set_binning(&mut self, bin: u32) -> Result<()> {
        self.ensure_open()?;
        if !self.descriptor.supports_bin(bin) {
            return Err(Error::InvalidArgument);
        }
        self.stop_before_reconfigure("binning change")?;

        let id = self.camera_id();
        self.driver.set_image_bin(id, bin)?;
        self.bin = bin;

        match self
            .driver
            .image_size(id)
            .and_then(|size| self.driver.image_start_pos(id).map(|pos| (size, pos)))
        {
            Ok(((width, height), (start_x, start_y))) => {
                self.roi = Roi::new(start_x, start_y, width, height);
            }
            Err(e) => {
                let (max_w, max_h) = self.binned_limits();
                log::warn!(
                    "geometry query after bin{} failed ({}), falling back to {}x{}",
                    bin,
                    e,
                    max_w,
                    max_h
                );
                self.roi = Roi::new(0, 0, max_w & !3, max_h & !1);
            }
        }
        log::info!("binning set to {}, ROI now {:?}", bin, self.roi);
        Ok(())
    }

    /// List the camera's selectable sensor modes. Empty when the camera
    /// has none.
    pub fn sensor_modes(&self) -> Result<Vec<SensorMode>> {
        self.ensure_open()?;
        let id = self.camera_id();
        let count = self.driver.sensor_mode_count(id)?;
        let mut modes = Vec::with_capacity(count);
        for index in 0..count {
            modes.push(decode_sensor_mode(&self.driver.sensor_mode_info(id, index)?));
        }
        Ok(modes)
    }

    /// Index of the currently selected sensor mode.
    pub fn sensor_mode_index(&self) -> Result<usize> {
        self.ensure_open()?;
        self.driver.sensor_mode(self.camera_id())
    }

    /// Select a sensor mode by index.
    ///
    /// Returns whether an in-progress exposure had to be aborted to apply
    /// the change. Callers are expected to stop exposure themselves first;
    /// if they do not, the selection still succeeds and the abort is
    /// reported through the returned flag instead of happening silently
    /// inside the driver.
    pub fn select_sensor_mode(&mut self, index: usize) -> Result<bool> {
        self.ensure_open()?;
        let id = self.camera_id();
        let count = self.driver.sensor_mode_count(id)?;
        if count == 0 {
            return Err(Error::InvalidArgument);
        }
        if index >= count {
            return Err(Error::InvalidIndex);
        }

        let aborted = self.state == CameraState::Exposing;
        if aborted {
            log::warn!("sensor mode change aborting in-progress exposure");
            self.stop_exposure()?;
        }
        self.driver.set_sensor_mode(id, index)?;
        Ok(aborted)
    }

    fn stop_before_reconfigure(&mut self, what: &str) -> Result<()> {
        if self.state == CameraState::Exposing {
            log::info!("stopping exposure before {}", what);
            self.stop_exposure()?;
        }
        Ok(())
    }

    // --- Exposure control ---

    /// Begin exposing. `single_frame` selects snap mode (one frame, then
    /// the camera idles); continuous mode free-runs until stopped.
    /// Starting while already `Exposing` fails with `Exposing`.
    pub fn start_exposure(&mut self, single_frame: bool) -> Result<()> {
        self.ensure_open()?;
        if self.state == CameraState::Exposing {
            return Err(Error::Exposing);
        }
        self.driver.start_exposure(self.camera_id(), single_frame)?;
        self.state = CameraState::Exposing;
        log::info!(
            "exposure started ({})",
            if single_frame { "single frame" } else { "continuous" }
        );
        Ok(())
    }

    /// Stop exposing and return to `Opened`. A no-op when already idle;
    /// required even after a completed single-frame exposure so that every
    /// state transition stays explicit.
    pub fn stop_exposure(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.state != CameraState::Exposing {
            return Ok(());
        }
        self.driver.stop_exposure(self.camera_id())?;
        self.state = CameraState::Opened;
        log::info!("exposure stopped");
        Ok(())
    }
}

impl<D: CameraDriver> Drop for DeviceSession<D> {
    fn drop(&mut self) {
        if self.state != CameraState::Closed {
            if let Err(e) = self.close() {
                log::warn!("closing {} on drop failed: {}", self.descriptor.model_name, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValueType;
    use crate::sim::{SimCameraConfig, SimDriver};

    fn session_for(cfg: SimCameraConfig) -> DeviceSession<SimDriver> {
        let driver = SimDriver::new();
        driver.add_camera(cfg);
        let descriptor = enumerate(&driver).unwrap().remove(0);
        DeviceSession::new(driver, descriptor)
    }

    fn open_session() -> DeviceSession<SimDriver> {
        let mut session = session_for(SimCameraConfig::default());
        session.open().unwrap();
        session.init().unwrap();
        session
    }

    #[test]
    fn enumeration_reports_descriptor() {
        let driver = SimDriver::with_default_camera();
        let devices = enumerate(&driver).unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].model_name, "Sim Mars-M");
        assert_eq!(devices[0].bins, vec![1, 2]);
        assert!(!devices[0].is_color());
    }

    #[test]
    fn closed_session_rejects_everything_but_open() {
        let mut session = session_for(SimCameraConfig::default());
        assert_eq!(session.state(), CameraState::Closed);
        assert_eq!(session.init().unwrap_err(), Error::NotOpened);
        assert_eq!(
            session.get_config(ConfigId::Gain).unwrap_err(),
            Error::NotOpened
        );
        assert_eq!(
            session.set_roi(Roi::new(0, 0, 640, 480)).unwrap_err(),
            Error::NotOpened
        );
        assert_eq!(session.start_exposure(true).unwrap_err(), Error::NotOpened);
        assert_eq!(session.stop_exposure().unwrap_err(), Error::NotOpened);
        assert!(session.close().is_ok());
    }

    #[test]
    fn open_is_idempotent_and_loads_registry() {
        let mut session = open_session();
        assert_eq!(session.state(), CameraState::Opened);
        assert!(!session.config_registry().is_empty());
        assert_eq!(session.roi(), Roi::new(0, 0, 1920, 1080));
        assert_eq!(session.binning(), 1);

        session.open().unwrap();
        assert_eq!(session.state(), CameraState::Opened);
    }

    #[test]
    fn close_is_idempotent_and_reopens() {
        let mut session = open_session();
        session.close().unwrap();
        session.close().unwrap();
        assert_eq!(session.state(), CameraState::Closed);
        session.open().unwrap();
        assert_eq!(session.state(), CameraState::Opened);
    }

    #[test]
    fn close_while_exposing_forces_stop() {
        let mut session = open_session();
        session.start_exposure(false).unwrap();
        assert_eq!(session.state(), CameraState::Exposing);
        session.close().unwrap();
        assert_eq!(session.state(), CameraState::Closed);
    }

    #[test]
    fn double_start_is_rejected() {
        let mut session = open_session();
        session.start_exposure(false).unwrap();
        assert_eq!(session.start_exposure(false).unwrap_err(), Error::Exposing);
        assert_eq!(session.state(), CameraState::Exposing);
        session.stop_exposure().unwrap();
        assert_eq!(session.state(), CameraState::Opened);
        // Stop when already idle is a no-op.
        session.stop_exposure().unwrap();
    }

    #[test]
    fn config_set_get_round_trip() {
        let mut session = open_session();
        session
            .set_config(ConfigId::Gain, ConfigValue::Int(250), false)
            .unwrap();
        assert_eq!(
            session.get_config(ConfigId::Gain).unwrap(),
            (ConfigValue::Int(250), false)
        );
    }

    #[test]
    fn config_wrong_tag_is_type_mismatch() {
        let mut session = open_session();
        assert_eq!(
            session
                .set_config(ConfigId::Gain, ConfigValue::Float(1.0), false)
                .unwrap_err(),
            Error::TypeMismatch {
                expected: ValueType::Int,
                got: ValueType::Float,
            }
        );
    }

    #[test]
    fn config_access_rules_enforced() {
        let mut session = open_session();
        assert_eq!(
            session
                .set_config(ConfigId::Temperature, ConfigValue::Float(0.0), false)
                .unwrap_err(),
            Error::NotWritable(ConfigId::Temperature)
        );
        assert_eq!(
            session.get_config(ConfigId::GuideNorth).unwrap_err(),
            Error::NotReadable(ConfigId::GuideNorth)
        );
        assert_eq!(
            session.set_gain(401, false).unwrap_err(),
            Error::OutOfLimit
        );
        // MonoBin is a color-camera identifier the mono unit does not expose.
        assert_eq!(
            session
                .set_config(ConfigId::MonoBin, ConfigValue::Bool(true), false)
                .unwrap_err(),
            Error::InvalidConfig(ConfigId::MonoBin)
        );
    }

    #[test]
    fn auto_request_downgraded_without_support() {
        let mut session = open_session();
        // Offset has no auto support; the write lands as manual.
        session
            .set_config(ConfigId::Offset, ConfigValue::Int(20), true)
            .unwrap();
        assert_eq!(
            session.get_config(ConfigId::Offset).unwrap(),
            (ConfigValue::Int(20), false)
        );
        // Exposure does; the auto flag sticks.
        session.set_exposure(Duration::from_millis(5), true).unwrap();
        assert_eq!(
            session.exposure().unwrap(),
            (Duration::from_millis(5), true)
        );
    }

    #[test]
    fn idle_only_config_rejected_while_exposing() {
        let mut session = open_session();
        session.start_exposure(false).unwrap();
        assert_eq!(
            session
                .set_config(ConfigId::HardwareBin, ConfigValue::Bool(true), false)
                .unwrap_err(),
            Error::Exposing
        );
        // Plain controls stay writable mid-exposure.
        session.set_gain(50, false).unwrap();
        session.stop_exposure().unwrap();
    }

    #[test]
    fn flip_state_round_trip() {
        let mut session = open_session();
        assert_eq!(session.image_flip().unwrap(), (false, false));
        session.set_image_flip(true, false).unwrap();
        assert_eq!(session.image_flip().unwrap(), (true, false));
        session.set_image_flip(true, true).unwrap();
        assert_eq!(session.image_flip().unwrap(), (true, true));
        session.set_image_flip(false, false).unwrap();
        assert_eq!(session.image_flip().unwrap(), (false, false));
    }

    #[test]
    fn guide_lines_pulse() {
        let mut session = open_session();
        session.set_guide(GuideDirection::North, true).unwrap();
        session.set_guide(GuideDirection::North, false).unwrap();
    }

    #[test]
    fn roi_width_and_height_are_aligned_down() {
        let mut session = open_session();
        session.set_roi(Roi::new(4, 2, 910, 521)).unwrap();
        assert_eq!(session.roi(), Roi::new(4, 2, 908, 520));
        assert_eq!(session.frame_bytes(), 908 * 520);
    }

    #[test]
    fn roi_degenerate_and_out_of_bounds() {
        let mut session = open_session();
        assert_eq!(
            session.set_roi(Roi::new(0, 0, 3, 480)).unwrap_err(),
            Error::InvalidArgument
        );
        assert_eq!(
            session.set_roi(Roi::new(1900, 0, 640, 480)).unwrap_err(),
            Error::OutOfLimit
        );
        // Failed calls leave the cached ROI untouched.
        assert_eq!(session.roi(), Roi::new(0, 0, 1920, 1080));
    }

    #[test]
    fn roi_offset_near_u32_max_is_out_of_limit() {
        let mut session = open_session();
        assert_eq!(
            session.set_roi(Roi::new(u32::MAX - 4, 0, 8, 8)).unwrap_err(),
            Error::OutOfLimit
        );
        assert_eq!(
            session.set_roi(Roi::new(0, u32::MAX - 2, 8, 8)).unwrap_err(),
            Error::OutOfLimit
        );
        assert_eq!(session.roi(), Roi::new(0, 0, 1920, 1080));
    }

    #[test]
    fn session_state_agrees_with_driver_state() {
        let mut session = open_session();
        let id = session.descriptor().camera_id;
        assert_eq!(session.driver().camera_state(id).unwrap(), session.state());
        session.start_exposure(false).unwrap();
        assert_eq!(session.driver().camera_state(id).unwrap(), session.state());
        session.stop_exposure().unwrap();
        assert_eq!(session.driver().camera_state(id).unwrap(), session.state());
    }

    #[test]
    fn roi_change_stops_running_exposure() {
        let mut session = open_session();
        session.start_exposure(false).unwrap();
        session.set_roi(Roi::new(0, 0, 640, 480)).unwrap();
        assert_eq!(session.state(), CameraState::Opened);
        assert_eq!(session.roi(), Roi::new(0, 0, 640, 480));
    }

    #[test]
    fn binning_rescales_roi_bounds() {
        let mut session = open_session();
        session.set_binning(2).unwrap();
        assert_eq!(session.binning(), 2);
        let roi = session.roi();
        assert!(roi.start_x + roi.width <= 960);
        assert!(roi.start_y + roi.height <= 540);
        assert_eq!(roi.width % 4, 0);
        assert_eq!(roi.height % 2, 0);

        // The old full-sensor ROI no longer fits at bin 2.
        assert_eq!(
            session.set_roi(Roi::new(0, 0, 1920, 1080)).unwrap_err(),
            Error::OutOfLimit
        );
        assert_eq!(session.set_binning(3).unwrap_err(), Error::InvalidArgument);
    }

    #[test]
    fn format_must_be_supported() {
        let mut session = open_session();
        assert_eq!(
            session.set_format(ImageFormat::Rgb24).unwrap_err(),
            Error::InvalidArgument
        );
        session.set_format(ImageFormat::Raw16).unwrap();
        assert_eq!(session.format(), ImageFormat::Raw16);
        assert_eq!(session.frame_bytes(), 1920 * 1080 * 2);
    }

    #[test]
    fn sensor_modes_absent_by_default() {
        let mut session = open_session();
        assert!(session.sensor_modes().unwrap().is_empty());
        assert_eq!(
            session.select_sensor_mode(0).unwrap_err(),
            Error::InvalidArgument
        );
    }

    #[test]
    fn sensor_mode_selection_and_abort_flag() {
        let mut session = session_for(SimCameraConfig {
            sensor_modes: vec![
                ("Normal".into(), "standard readout".into()),
                ("LowNoise".into(), "slower, lower read noise".into()),
            ],
            ..SimCameraConfig::default()
        });
        session.open().unwrap();

        let modes = session.sensor_modes().unwrap();
        assert_eq!(modes.len(), 2);
        assert_eq!(modes[1].name, "LowNoise");
        assert_eq!(session.sensor_mode_index().unwrap(), 0);

        assert!(!session.select_sensor_mode(1).unwrap());
        assert_eq!(session.sensor_mode_index().unwrap(), 1);
        assert_eq!(
            session.select_sensor_mode(2).unwrap_err(),
            Error::InvalidIndex
        );

        session.start_exposure(false).unwrap();
        assert!(session.select_sensor_mode(0).unwrap());
        assert_eq!(session.state(), CameraState::Opened);
    }
}
