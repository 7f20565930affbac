//! In-memory simulated driver for development and tests without hardware.
//!
//! [`SimDriver`] implements [`CameraDriver`] with the same handle-based,
//! interior-mutable shape as the vendor library. Each exposing camera runs
//! a background frame-producer thread feeding a small bounded channel;
//! `image_data` blocks on it with a timeout and frames that overflow the
//! channel are counted as dropped, so timeout and backpressure behavior
//! match the real driver closely enough to test acquisition loops against.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::config::{ConfigId, ConfigValue, ValueType};
use crate::driver::{
    pad_string, CameraDriver, RawCameraProperties, RawConfigAttributes, RawSensorModeInfo,
};
use crate::types::{BayerPattern, CameraState, ImageFormat};
use crate::{Error, Result};

/// Frames the simulated driver buffers before it starts dropping.
const FRAME_QUEUE_DEPTH: usize = 2;

/// Granularity of the producer's stop-flag checks during an exposure.
const EXPOSURE_SLICE: Duration = Duration::from_millis(5);

/// Blueprint for one simulated camera.
#[derive(Debug, Clone)]
pub struct SimCameraConfig {
    pub model_name: String,
    pub serial_number: String,
    pub sensor_name: String,
    pub max_width: u32,
    pub max_height: u32,
    pub bit_depth: u32,
    pub is_color: bool,
    pub has_cooler: bool,
    pub has_st4_port: bool,
    pub usb3: bool,
    pub supports_hardware_bin: bool,
    pub bayer_pattern: BayerPattern,
    pub pixel_size_um: f64,
    pub bins: Vec<u32>,
    pub img_formats: Vec<ImageFormat>,
    /// (name, description) pairs; empty means no selectable modes.
    pub sensor_modes: Vec<(String, String)>,
}

impl Default for SimCameraConfig {
    fn default() -> Self {
        Self {
            model_name: "Sim Mars-M".into(),
            serial_number: "SIM0000001".into(),
            sensor_name: "IMX462".into(),
            max_width: 1920,
            max_height: 1080,
            bit_depth: 12,
            is_color: false,
            has_cooler: false,
            has_st4_port: true,
            usb3: true,
            supports_hardware_bin: true,
            bayer_pattern: BayerPattern::Mono,
            pixel_size_um: 2.9,
            bins: vec![1, 2],
            img_formats: vec![ImageFormat::Raw8, ImageFormat::Raw16],
            sensor_modes: Vec::new(),
        }
    }
}

impl SimCameraConfig {
    /// A cooled color camera variant of the defaults.
    pub fn color() -> Self {
        Self {
            model_name: "Sim Uranus-C Pro".into(),
            serial_number: "SIM0000002".into(),
            sensor_name: "IMX585".into(),
            max_width: 3856,
            max_height: 2180,
            is_color: true,
            has_cooler: true,
            bayer_pattern: BayerPattern::Rggb,
            img_formats: vec![
                ImageFormat::Raw8,
                ImageFormat::Raw16,
                ImageFormat::Rgb24,
                ImageFormat::Mono8,
            ],
            ..Self::default()
        }
    }
}

struct ExposureRun {
    stop: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
    receiver: Receiver<Vec<u8>>,
    frame_len: usize,
}

impl ExposureRun {
    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

struct SimCamera {
    props: RawCameraProperties,
    attrs: Vec<RawConfigAttributes>,
    values: HashMap<i32, (ConfigValue, bool)>,
    flip_h: bool,
    flip_v: bool,
    state: CameraState,
    start_x: u32,
    start_y: u32,
    width: u32,
    height: u32,
    bin: u32,
    format: ImageFormat,
    sensor_modes: Vec<(String, String)>,
    mode_index: usize,
    run: Option<ExposureRun>,
    dropped: Arc<AtomicU32>,
    frame_seq: Arc<AtomicU64>,
}

impl SimCamera {
    fn new(camera_id: i32, cfg: &SimCameraConfig) -> Self {
        let mut props = RawCameraProperties {
            model_name: pad_string(&cfg.model_name),
            camera_id,
            max_width: cfg.max_width as i32,
            max_height: cfg.max_height as i32,
            bit_depth: cfg.bit_depth as i32,
            is_color: cfg.is_color as i32,
            has_st4_port: cfg.has_st4_port as i32,
            has_cooler: cfg.has_cooler as i32,
            is_usb3_speed: cfg.usb3 as i32,
            bayer_pattern: cfg.bayer_pattern as i32,
            pixel_size: cfg.pixel_size_um,
            serial_number: pad_string(&cfg.serial_number),
            sensor_name: pad_string(&cfg.sensor_name),
            supports_hardware_bin: cfg.supports_hardware_bin as i32,
            ..Default::default()
        };
        for (slot, &bin) in props.bins.iter_mut().zip(cfg.bins.iter()) {
            *slot = bin as i32;
        }
        for (slot, &fmt) in props.img_formats.iter_mut().zip(cfg.img_formats.iter()) {
            *slot = fmt as i32;
        }

        let attrs = default_attributes(cfg);
        let values = attrs
            .iter()
            .filter(|a| a.is_readable != 0)
            .filter(|a| ConfigId::from_code(a.config_id).is_some_and(|id| !id.is_trigger()))
            .map(|a| {
                let value = match ValueType::from_raw(a.value_type) {
                    Some(ValueType::Float) => ConfigValue::Float(a.default_value),
                    Some(ValueType::Bool) => ConfigValue::Bool(a.default_value != 0.0),
                    _ => ConfigValue::Int(a.default_value as i64),
                };
                (a.config_id, (value, false))
            })
            .collect();

        Self {
            props,
            attrs,
            values,
            flip_h: false,
            flip_v: false,
            state: CameraState::Closed,
            start_x: 0,
            start_y: 0,
            width: cfg.max_width & !3,
            height: cfg.max_height & !1,
            bin: 1,
            format: cfg.img_formats.first().copied().unwrap_or(ImageFormat::Raw8),
            sensor_modes: cfg.sensor_modes.clone(),
            mode_index: 0,
            run: None,
            dropped: Arc::new(AtomicU32::new(0)),
            frame_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == CameraState::Closed {
            return Err(Error::NotOpened);
        }
        Ok(())
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.state == CameraState::Exposing {
            return Err(Error::Exposing);
        }
        Ok(())
    }

    fn attrs_of(&self, id: ConfigId) -> Result<&RawConfigAttributes> {
        self.attrs
            .iter()
            .find(|a| a.config_id == id.code())
            .ok_or(Error::InvalidConfig(id))
    }

    fn binned_width(&self) -> u32 {
        self.props.max_width as u32 / self.bin
    }

    fn binned_height(&self) -> u32 {
        self.props.max_height as u32 / self.bin
    }

    fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    fn abort_exposure(&mut self) {
        if let Some(mut run) = self.run.take() {
            run.shutdown();
        }
        if self.state == CameraState::Exposing {
            self.state = CameraState::Opened;
        }
    }
}

/// Simulated vendor driver holding any number of virtual cameras.
///
/// Cheap to clone; clones address the same cameras, like multiple users of
/// one loaded driver library.
#[derive(Clone)]
pub struct SimDriver {
    inner: Arc<Mutex<Vec<SimCamera>>>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// A driver with no cameras attached.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A driver with one default monochrome camera attached.
    pub fn with_default_camera() -> Self {
        let driver = Self::new();
        driver.add_camera(SimCameraConfig::default());
        driver
    }

    /// Attach a camera and return its driver-assigned id.
    pub fn add_camera(&self, cfg: SimCameraConfig) -> i32 {
        let mut cameras = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let camera_id = cameras.len() as i32 + 1;
        cameras.push(SimCamera::new(camera_id, &cfg));
        camera_id
    }

    /// Detach a camera, simulating an unplug. Open sessions on it will
    /// start failing with `InvalidId`.
    pub fn remove_camera(&self, camera_id: i32) {
        let mut cameras = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        cameras.retain(|c| c.props.camera_id != camera_id);
    }

    fn with_camera<T>(&self, camera_id: i32, f: impl FnOnce(&mut SimCamera) -> Result<T>) -> Result<T> {
        let mut cameras = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let camera = cameras
            .iter_mut()
            .find(|c| c.props.camera_id == camera_id)
            .ok_or(Error::InvalidId)?;
        f(camera)
    }
}

impl CameraDriver for SimDriver {
    fn camera_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn properties(&self, index: usize) -> Result<RawCameraProperties> {
        let cameras = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        cameras
            .get(index)
            .map(|c| c.props.clone())
            .ok_or(Error::InvalidIndex)
    }

    fn open(&self, camera_id: i32) -> Result<()> {
        self.with_camera(camera_id, |cam| {
            if cam.state == CameraState::Closed {
                cam.state = CameraState::Opened;
            }
            Ok(())
        })
    }

    fn init(&self, camera_id: i32) -> Result<()> {
        self.with_camera(camera_id, |cam| cam.ensure_open())
    }

    fn close(&self, camera_id: i32) -> Result<()> {
        self.with_camera(camera_id, |cam| {
            cam.abort_exposure();
            cam.state = CameraState::Closed;
            Ok(())
        })
    }

    fn config_count(&self, camera_id: i32) -> Result<usize> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            Ok(cam.attrs.len())
        })
    }

    fn config_attributes(&self, camera_id: i32, index: usize) -> Result<RawConfigAttributes> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            cam.attrs.get(index).cloned().ok_or(Error::InvalidIndex)
        })
    }

    fn get_config(&self, camera_id: i32, id: ConfigId) -> Result<(ConfigValue, bool)> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            let attrs = cam.attrs_of(id)?;
            if attrs.is_readable == 0 {
                return Err(Error::NotReadable(id));
            }
            if id.is_trigger() {
                let current = match (cam.flip_h, cam.flip_v) {
                    (true, true) => ConfigId::FlipBoth,
                    (true, false) => ConfigId::FlipHorizontal,
                    (false, true) => ConfigId::FlipVertical,
                    (false, false) => ConfigId::FlipNone,
                };
                return Ok((ConfigValue::Bool(id == current), false));
            }
            cam.values
                .get(&id.code())
                .copied()
                .ok_or(Error::InvalidConfig(id))
        })
    }

    fn set_config(&self, camera_id: i32, id: ConfigId, value: ConfigValue, auto: bool) -> Result<()> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            let attrs = cam.attrs_of(id)?;
            if attrs.is_writable == 0 {
                return Err(Error::NotWritable(id));
            }
            if id.requires_idle() && cam.state == CameraState::Exposing {
                return Err(Error::Exposing);
            }
            if id.is_trigger() {
                // The value is ignored; the id itself is the command.
                let (h, v) = match id {
                    ConfigId::FlipHorizontal => (true, false),
                    ConfigId::FlipVertical => (false, true),
                    ConfigId::FlipBoth => (true, true),
                    _ => (false, false),
                };
                cam.flip_h = h;
                cam.flip_v = v;
                return Ok(());
            }
            if let (ConfigValue::Int(v), min, max) =
                (value, attrs.min_value as i64, attrs.max_value as i64)
            {
                if v < min || v > max {
                    return Err(Error::OutOfLimit);
                }
            }
            if attrs.is_readable != 0 {
                cam.values.insert(id.code(), (value, auto));
            }
            Ok(())
        })
    }

    fn image_size(&self, camera_id: i32) -> Result<(u32, u32)> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            Ok((cam.width, cam.height))
        })
    }

    fn set_image_size(&self, camera_id: i32, width: u32, height: u32) -> Result<()> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            cam.ensure_idle()?;
            let width = width & !3;
            let height = height & !1;
            if width == 0
                || height == 0
                || width > cam.binned_width()
                || height > cam.binned_height()
            {
                return Err(Error::OutOfLimit);
            }
            cam.width = width;
            cam.height = height;
            Ok(())
        })
    }

    fn image_start_pos(&self, camera_id: i32) -> Result<(u32, u32)> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            Ok((cam.start_x, cam.start_y))
        })
    }

    fn set_image_start_pos(&self, camera_id: i32, start_x: u32, start_y: u32) -> Result<()> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            cam.ensure_idle()?;
            if start_x as u64 + cam.width as u64 > cam.binned_width() as u64
                || start_y as u64 + cam.height as u64 > cam.binned_height() as u64
            {
                return Err(Error::OutOfLimit);
            }
            cam.start_x = start_x;
            cam.start_y = start_y;
            Ok(())
        })
    }

    fn image_bin(&self, camera_id: i32) -> Result<u32> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            Ok(cam.bin)
        })
    }

    fn set_image_bin(&self, camera_id: i32, bin: u32) -> Result<()> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            cam.ensure_idle()?;
            if !cam.props.bins.contains(&(bin as i32)) {
                return Err(Error::InvalidArgument);
            }
            cam.bin = bin;
            // Clamp the ROI to the new per-pixel scale, like the real
            // driver; callers re-fetch geometry afterwards.
            cam.width = cam.width.min(cam.binned_width()) & !3;
            cam.height = cam.height.min(cam.binned_height()) & !1;
            cam.start_x = cam.start_x.min(cam.binned_width() - cam.width);
            cam.start_y = cam.start_y.min(cam.binned_height() - cam.height);
            Ok(())
        })
    }

    fn image_format(&self, camera_id: i32) -> Result<ImageFormat> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            Ok(cam.format)
        })
    }

    fn set_image_format(&self, camera_id: i32, format: ImageFormat) -> Result<()> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            cam.ensure_idle()?;
            if !cam.props.img_formats.contains(&(format as i32)) {
                return Err(Error::InvalidArgument);
            }
            cam.format = format;
            Ok(())
        })
    }

    fn start_exposure(&self, camera_id: i32, single_frame: bool) -> Result<()> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            cam.ensure_idle()?;

            let exposure_us = cam
                .values
                .get(&ConfigId::Exposure.code())
                .and_then(|(v, _)| v.as_int())
                .unwrap_or(10_000);
            let exposure = Duration::from_micros(exposure_us.max(0) as u64);
            let frame_len = cam.frame_len();

            cam.dropped.store(0, Ordering::Relaxed);
            let (sender, receiver) = crossbeam_channel::bounded(FRAME_QUEUE_DEPTH);
            let stop = Arc::new(AtomicBool::new(false));
            let thread = std::thread::Builder::new()
                .name(format!("sim-cam-{camera_id}"))
                .spawn({
                    let stop = stop.clone();
                    let dropped = cam.dropped.clone();
                    let seq = cam.frame_seq.clone();
                    move || {
                        frame_producer_loop(
                            exposure,
                            frame_len,
                            single_frame,
                            sender,
                            stop,
                            dropped,
                            seq,
                        );
                    }
                })
                .map_err(|_| Error::ExposureFailed)?;

            cam.run = Some(ExposureRun {
                stop,
                thread: Some(thread),
                receiver,
                frame_len,
            });
            cam.state = CameraState::Exposing;
            Ok(())
        })
    }

    fn stop_exposure(&self, camera_id: i32) -> Result<()> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            cam.abort_exposure();
            Ok(())
        })
    }

    fn camera_state(&self, camera_id: i32) -> Result<CameraState> {
        self.with_camera(camera_id, |cam| Ok(cam.state))
    }

    fn image_ready(&self, camera_id: i32) -> Result<bool> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            Ok(cam.run.as_ref().is_some_and(|run| !run.receiver.is_empty()))
        })
    }

    fn image_data(&self, camera_id: i32, buffer: &mut [u8], timeout: Duration) -> Result<()> {
        // Snapshot the channel under the lock, then block outside it so a
        // stop issued from another thread is not deadlocked.
        let (receiver, frame_len) = self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            let run = cam.run.as_ref().ok_or(Error::OperationFailed)?;
            Ok((run.receiver.clone(), run.frame_len))
        })?;

        if buffer.len() < frame_len {
            return Err(Error::SizeTooSmall {
                given: buffer.len(),
                needed: frame_len,
            });
        }
        // Disconnected means the single-frame producer already delivered
        // and exited; nothing more will arrive, same as a timeout.
        let frame = receiver.recv_timeout(timeout).map_err(|_| Error::Timeout)?;
        buffer[..frame_len].copy_from_slice(&frame);
        Ok(())
    }

    fn dropped_frames(&self, camera_id: i32) -> Result<u32> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            Ok(cam.dropped.load(Ordering::Relaxed))
        })
    }

    fn sensor_mode_count(&self, camera_id: i32) -> Result<usize> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            Ok(cam.sensor_modes.len())
        })
    }

    fn sensor_mode_info(&self, camera_id: i32, index: usize) -> Result<RawSensorModeInfo> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            let (name, description) = cam.sensor_modes.get(index).ok_or(Error::InvalidIndex)?;
            Ok(RawSensorModeInfo {
                name: pad_string(name),
                description: pad_string(description),
            })
        })
    }

    fn sensor_mode(&self, camera_id: i32) -> Result<usize> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            if cam.sensor_modes.is_empty() {
                return Err(Error::InvalidArgument);
            }
            Ok(cam.mode_index)
        })
    }

    fn set_sensor_mode(&self, camera_id: i32, index: usize) -> Result<()> {
        self.with_camera(camera_id, |cam| {
            cam.ensure_open()?;
            if cam.sensor_modes.is_empty() {
                return Err(Error::InvalidArgument);
            }
            if index >= cam.sensor_modes.len() {
                return Err(Error::InvalidIndex);
            }
            // The real driver aborts a running exposure on mode change.
            cam.abort_exposure();
            cam.mode_index = index;
            Ok(())
        })
    }
}

/// Produces one frame per exposure interval until stopped (or after one
/// frame in single-frame mode). Overflowing the bounded queue counts as a
/// dropped frame, the driver's backpressure signal.
fn frame_producer_loop(
    exposure: Duration,
    frame_len: usize,
    single_frame: bool,
    sender: Sender<Vec<u8>>,
    stop: Arc<AtomicBool>,
    dropped: Arc<AtomicU32>,
    seq: Arc<AtomicU64>,
) {
    log::debug!(
        "sim producer started: exposure {:?}, {} bytes/frame, single={}",
        exposure,
        frame_len,
        single_frame
    );
    loop {
        if !wait_exposure(&stop, exposure) {
            break;
        }
        let n = seq.fetch_add(1, Ordering::Relaxed);
        let mut frame = vec![(n & 0xff) as u8; frame_len];
        if frame_len >= 8 {
            frame[..8].copy_from_slice(&n.to_le_bytes());
        }

        if single_frame {
            let _ = sender.send(frame);
            break;
        }
        match sender.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                dropped.fetch_add(1, Ordering::Relaxed);
                log::trace!("sim queue full, dropping frame {}", n);
            }
            Err(TrySendError::Disconnected(_)) => break,
        }
    }
    log::debug!("sim producer stopped");
}

/// Sleep through one exposure in slices, watching the stop flag.
/// Returns false if stopped mid-exposure.
fn wait_exposure(stop: &AtomicBool, exposure: Duration) -> bool {
    let deadline = Instant::now() + exposure;
    loop {
        if stop.load(Ordering::Relaxed) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        std::thread::sleep((deadline - now).min(EXPOSURE_SLICE));
    }
}

fn raw_attr(
    id: ConfigId,
    value_type: ValueType,
    min: f64,
    max: f64,
    default: f64,
    supports_auto: bool,
    writable: bool,
    readable: bool,
    name: &str,
    description: &str,
) -> RawConfigAttributes {
    RawConfigAttributes {
        is_support_auto: supports_auto as i32,
        is_writable: writable as i32,
        is_readable: readable as i32,
        config_id: id.code(),
        value_type: value_type as i32,
        max_value: max,
        min_value: min,
        default_value: default,
        name: pad_string(name),
        description: pad_string(description),
    }
}

/// Attribute table a typical camera reports, trimmed to the capabilities
/// of the blueprint.
fn default_attributes(cfg: &SimCameraConfig) -> Vec<RawConfigAttributes> {
    use ConfigId as C;
    use ValueType as V;

    let mut attrs = vec![
        raw_attr(C::Exposure, V::Int, 10.0, 2e9, 10_000.0, true, true, true,
            "Exposure", "exposure time (us)"),
        raw_attr(C::Gain, V::Int, 0.0, 400.0, 100.0, true, true, true,
            "Gain", "analog gain"),
        raw_attr(C::Offset, V::Int, 0.0, 200.0, 10.0, false, true, true,
            "Offset", "sensor offset (bias)"),
        raw_attr(C::Temperature, V::Float, -50.0, 100.0, 25.0, false, false, true,
            "Temperature", "sensor temperature (C)"),
        raw_attr(C::EGain, V::Float, 0.0, 10.0, 1.0, false, false, true,
            "eGain", "conversion gain (e/ADU)"),
        raw_attr(C::FrameRateLimit, V::Int, 0.0, 2000.0, 0.0, false, true, true,
            "FrameRateLimit", "frame rate limit, 0 = unlimited"),
        raw_attr(C::UsbBandwidthLimit, V::Int, 35.0, 100.0, 100.0, false, true, true,
            "USBBandwidthLimit", "USB bandwidth limit (%)"),
        raw_attr(C::AutoExpoMaxGain, V::Int, 0.0, 400.0, 300.0, false, true, true,
            "AutoExpoMaxGain", "gain ceiling for auto adjustment"),
        raw_attr(C::AutoExpoMaxExposure, V::Int, 1.0, 60_000.0, 100.0, false, true, true,
            "AutoExpoMaxExposure", "exposure ceiling for auto adjustment (ms)"),
        raw_attr(C::AutoExpoBrightness, V::Int, 50.0, 200.0, 100.0, false, true, true,
            "AutoExpoBrightness", "target brightness for auto adjustment"),
        raw_attr(C::FlipNone, V::Bool, 0.0, 1.0, 1.0, false, true, true,
            "FlipNone", "clear both flips"),
        raw_attr(C::FlipHorizontal, V::Bool, 0.0, 1.0, 0.0, false, true, true,
            "FlipHori", "flip horizontally"),
        raw_attr(C::FlipVertical, V::Bool, 0.0, 1.0, 0.0, false, true, true,
            "FlipVert", "flip vertically"),
        raw_attr(C::FlipBoth, V::Bool, 0.0, 1.0, 0.0, false, true, true,
            "FlipBoth", "flip both axes"),
        raw_attr(C::PixelBinSum, V::Bool, 0.0, 1.0, 0.0, false, true, true,
            "PixelBinSum", "sum instead of average when binning"),
        raw_attr(C::HighQualityImage, V::Bool, 0.0, 1.0, 0.0, false, true, true,
            "HQI", "high quality image mode"),
    ];

    if cfg.supports_hardware_bin {
        attrs.push(raw_attr(C::HardwareBin, V::Bool, 0.0, 1.0, 0.0, false, true, true,
            "HardwareBin", "hardware binning on/off"));
    }
    if cfg.has_st4_port {
        for (id, name) in [
            (C::GuideNorth, "GuideNorth"),
            (C::GuideSouth, "GuideSouth"),
            (C::GuideEast, "GuideEast"),
            (C::GuideWest, "GuideWest"),
        ] {
            attrs.push(raw_attr(id, V::Bool, 0.0, 1.0, 0.0, false, true, false,
                name, "ST4 guide line"));
        }
    }
    if cfg.is_color {
        for (id, name) in [
            (C::WbRed, "WB_R"),
            (C::WbGreen, "WB_G"),
            (C::WbBlue, "WB_B"),
        ] {
            attrs.push(raw_attr(id, V::Int, 0.0, 200.0, 100.0, true, true, true,
                name, "white balance coefficient"));
        }
        attrs.push(raw_attr(C::MonoBin, V::Bool, 0.0, 1.0, 0.0, false, true, true,
            "MonoBin", "bin across the Bayer pattern"));
    }
    if cfg.has_cooler {
        attrs.push(raw_attr(C::TargetTemp, V::Int, -50.0, 50.0, 0.0, false, true, true,
            "TargetTemp", "cooler target temperature (C)"));
        attrs.push(raw_attr(C::Cooler, V::Bool, 0.0, 1.0, 0.0, false, true, true,
            "Cooler", "cooler and fan on/off"));
        attrs.push(raw_attr(C::CoolerPower, V::Int, 0.0, 100.0, 0.0, false, false, true,
            "CoolerPower", "cooler power (%)"));
        attrs.push(raw_attr(C::HeaterPower, V::Int, 0.0, 100.0, 10.0, false, true, true,
            "HeaterPower", "lens heater power (%)"));
        attrs.push(raw_attr(C::FanPower, V::Int, 0.0, 100.0, 70.0, false, true, true,
            "FanPower", "radiator fan power (%)"));
    }

    attrs
}
