//! The boundary toward the native camera driver.
//!
//! [`CameraDriver`] mirrors the vendor library's C entry points: every
//! operation addresses a camera by id and returns a discrete error from the
//! closed taxonomy in [`crate::Error`]. Structs crossing this boundary
//! carry fixed-capacity, zero-padded byte fields for strings, exactly as
//! the C ABI lays them out; they are decoded once, at ingestion, into
//! owned Rust types and never leak past this module's decode functions.

use std::time::Duration;

use crate::config::{ConfigAttributes, ConfigId, ConfigValue, ValueType};
use crate::types::{
    BayerPattern, Capabilities, CameraState, DeviceDescriptor, ImageFormat, SensorMode,
    FORMAT_LIST_END,
};
use crate::{Error, Result};

/// Decode a fixed-capacity, zero-padded string field. Trailing NUL fill is
/// trimmed; anything after the first NUL is padding by contract.
pub fn string_from_padded(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Encode a string into a fixed-capacity zero-padded field, truncating at
/// the capacity. The inverse of [`string_from_padded`], used when
/// fabricating driver-side structs (simulator, tests).
pub(crate) fn pad_string<const N: usize>(s: &str) -> [u8; N] {
    let mut buf = [0u8; N];
    let len = s.len().min(N);
    buf[..len].copy_from_slice(&s.as_bytes()[..len]);
    buf
}

/// Camera property block as the driver reports it. String fields are
/// fixed-capacity and zero-padded; `bins` is zero-terminated and
/// `img_formats` is terminated by `-1`.
#[derive(Debug, Clone)]
pub struct RawCameraProperties {
    pub model_name: [u8; 256],
    pub camera_id: i32,
    pub max_width: i32,
    pub max_height: i32,
    pub bit_depth: i32,
    pub is_color: i32,
    pub has_st4_port: i32,
    pub has_cooler: i32,
    pub is_usb3_speed: i32,
    pub bayer_pattern: i32,
    pub pixel_size: f64,
    pub serial_number: [u8; 64],
    pub sensor_name: [u8; 32],
    pub bins: [i32; 8],
    pub img_formats: [i32; 8],
    pub supports_hardware_bin: i32,
}

impl Default for RawCameraProperties {
    fn default() -> Self {
        Self {
            model_name: [0; 256],
            camera_id: 0,
            max_width: 0,
            max_height: 0,
            bit_depth: 0,
            is_color: 0,
            has_st4_port: 0,
            has_cooler: 0,
            is_usb3_speed: 0,
            bayer_pattern: BayerPattern::Mono as i32,
            pixel_size: 0.0,
            serial_number: [0; 64],
            sensor_name: [0; 32],
            bins: [0; 8],
            img_formats: [FORMAT_LIST_END; 8],
            supports_hardware_bin: 0,
        }
    }
}

/// Decode a raw property block into an owned [`DeviceDescriptor`].
pub fn decode_properties(raw: &RawCameraProperties) -> Result<DeviceDescriptor> {
    let mut capabilities = Capabilities::empty();
    capabilities.set(Capabilities::COLOR, raw.is_color != 0);
    capabilities.set(Capabilities::ST4_PORT, raw.has_st4_port != 0);
    capabilities.set(Capabilities::COOLER, raw.has_cooler != 0);
    capabilities.set(Capabilities::USB3_SPEED, raw.is_usb3_speed != 0);
    capabilities.set(Capabilities::HARDWARE_BIN, raw.supports_hardware_bin != 0);

    let bayer_pattern =
        BayerPattern::from_raw(raw.bayer_pattern).ok_or(Error::InvalidArgument)?;

    let bins: Vec<u32> = raw
        .bins
        .iter()
        .take_while(|&&b| b > 0)
        .map(|&b| b as u32)
        .collect();

    let mut img_formats = Vec::new();
    for &f in &raw.img_formats {
        if f == FORMAT_LIST_END {
            break;
        }
        img_formats.push(ImageFormat::from_raw(f).ok_or(Error::InvalidArgument)?);
    }

    if raw.max_width <= 0 || raw.max_height <= 0 || bins.is_empty() || img_formats.is_empty() {
        return Err(Error::InvalidArgument);
    }

    Ok(DeviceDescriptor {
        camera_id: raw.camera_id,
        model_name: string_from_padded(&raw.model_name),
        serial_number: string_from_padded(&raw.serial_number),
        sensor_name: string_from_padded(&raw.sensor_name),
        capabilities,
        max_width: raw.max_width as u32,
        max_height: raw.max_height as u32,
        bit_depth: raw.bit_depth as u32,
        bayer_pattern,
        pixel_size_um: raw.pixel_size,
        bins,
        img_formats,
    })
}

/// Config attribute block as the driver reports it. `min`/`max`/`default`
/// share double-width storage regardless of the declared value type, the
/// driver's union convention.
#[derive(Debug, Clone)]
pub struct RawConfigAttributes {
    pub is_support_auto: i32,
    pub is_writable: i32,
    pub is_readable: i32,
    pub config_id: i32,
    pub value_type: i32,
    pub max_value: f64,
    pub min_value: f64,
    pub default_value: f64,
    pub name: [u8; 64],
    pub description: [u8; 128],
}

/// Decode a raw attribute block, resolving the bound/default storage into
/// properly tagged [`ConfigValue`]s. Unknown config codes or value types
/// fail with `InvalidConfig`/`InvalidArgument` so callers can skip
/// identifiers newer than this binding.
pub fn decode_config_attributes(raw: &RawConfigAttributes) -> Result<ConfigAttributes> {
    let id = ConfigId::from_code(raw.config_id)
        .ok_or(Error::InvalidArgument)?;
    let value_type = ValueType::from_raw(raw.value_type).ok_or(Error::InvalidArgument)?;

    let tag = |storage: f64| match value_type {
        ValueType::Int => ConfigValue::Int(storage as i64),
        ValueType::Float => ConfigValue::Float(storage),
        ValueType::Bool => ConfigValue::Bool(storage != 0.0),
    };

    Ok(ConfigAttributes {
        id,
        supports_auto: raw.is_support_auto != 0,
        writable: raw.is_writable != 0,
        readable: raw.is_readable != 0,
        value_type,
        min: tag(raw.min_value),
        max: tag(raw.max_value),
        default: tag(raw.default_value),
        name: string_from_padded(&raw.name),
        description: string_from_padded(&raw.description),
    })
}

/// Sensor mode info block as the driver reports it.
#[derive(Debug, Clone)]
pub struct RawSensorModeInfo {
    pub name: [u8; 64],
    pub description: [u8; 128],
}

pub fn decode_sensor_mode(raw: &RawSensorModeInfo) -> SensorMode {
    SensorMode {
        name: string_from_padded(&raw.name),
        description: string_from_padded(&raw.description),
    }
}

/// The vendor driver's C-ABI-shaped entry points.
///
/// Handle-based and interior-mutable like the C library: all methods take
/// `&self` and address a camera by the id from its property block. Every
/// precondition violation surfaces as an error; nothing is silently
/// no-op'd. Only [`CameraDriver::image_data`] may block, bounded by its
/// timeout argument.
pub trait CameraDriver {
    /// Number of connected cameras. Needs no open camera.
    fn camera_count(&self) -> usize;

    /// Property block of the camera at `index` in `[0, camera_count)`.
    fn properties(&self, index: usize) -> Result<RawCameraProperties>;

    fn open(&self, camera_id: i32) -> Result<()>;

    /// Initialize hardware and driver-side buffers. Requires open.
    fn init(&self, camera_id: i32) -> Result<()>;

    fn close(&self, camera_id: i32) -> Result<()>;

    fn config_count(&self, camera_id: i32) -> Result<usize>;

    fn config_attributes(&self, camera_id: i32, index: usize) -> Result<RawConfigAttributes>;

    /// Current value and auto flag of a config identifier.
    fn get_config(&self, camera_id: i32, id: ConfigId) -> Result<(ConfigValue, bool)>;

    fn set_config(&self, camera_id: i32, id: ConfigId, value: ConfigValue, auto: bool)
        -> Result<()>;

    fn image_size(&self, camera_id: i32) -> Result<(u32, u32)>;

    fn set_image_size(&self, camera_id: i32, width: u32, height: u32) -> Result<()>;

    fn image_start_pos(&self, camera_id: i32) -> Result<(u32, u32)>;

    fn set_image_start_pos(&self, camera_id: i32, start_x: u32, start_y: u32) -> Result<()>;

    fn image_bin(&self, camera_id: i32) -> Result<u32>;

    fn set_image_bin(&self, camera_id: i32, bin: u32) -> Result<()>;

    fn image_format(&self, camera_id: i32) -> Result<ImageFormat>;

    fn set_image_format(&self, camera_id: i32, format: ImageFormat) -> Result<()>;

    /// Begin exposing. `single_frame` selects snap mode; continuous
    /// (video) mode free-runs until stopped.
    fn start_exposure(&self, camera_id: i32, single_frame: bool) -> Result<()>;

    fn stop_exposure(&self, camera_id: i32) -> Result<()>;

    fn camera_state(&self, camera_id: i32) -> Result<CameraState>;

    /// Non-blocking: is a complete frame buffered and ready to fetch?
    fn image_ready(&self, camera_id: i32) -> Result<bool>;

    /// Copy the next frame into `buffer`, blocking up to `timeout`.
    /// Fails with `Timeout` if no frame arrives in time and `SizeTooSmall`
    /// if the buffer cannot hold a full frame; on failure the buffer is
    /// left untouched.
    fn image_data(&self, camera_id: i32, buffer: &mut [u8], timeout: Duration) -> Result<()>;

    /// Frames the driver discarded because the consumer fetched too
    /// slowly. Non-decreasing within one exposure run; reset when a new
    /// exposure starts.
    fn dropped_frames(&self, camera_id: i32) -> Result<u32>;

    /// Number of selectable sensor modes; 0 means the camera has none.
    fn sensor_mode_count(&self, camera_id: i32) -> Result<usize>;

    fn sensor_mode_info(&self, camera_id: i32, index: usize) -> Result<RawSensorModeInfo>;

    fn sensor_mode(&self, camera_id: i32) -> Result<usize>;

    fn set_sensor_mode(&self, camera_id: i32, index: usize) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_string_trims_fill() {
        let field: [u8; 16] = pad_string("Mars-C");
        assert_eq!(string_from_padded(&field), "Mars-C");

        let full: [u8; 4] = pad_string("ABCDEF");
        assert_eq!(string_from_padded(&full), "ABCD");

        assert_eq!(string_from_padded(&[0u8; 8]), "");
    }

    #[test]
    fn decode_properties_stops_at_terminators() {
        let mut raw = RawCameraProperties {
            model_name: pad_string("Apollo-M MAX"),
            camera_id: 7,
            max_width: 1920,
            max_height: 1080,
            bit_depth: 12,
            serial_number: pad_string("SN0001"),
            sensor_name: pad_string("IMX432"),
            ..Default::default()
        };
        raw.bins = [1, 2, 4, 0, 0, 0, 0, 0];
        raw.img_formats = [0, 1, FORMAT_LIST_END, 0, 0, 0, 0, 0];

        let desc = decode_properties(&raw).unwrap();
        assert_eq!(desc.model_name, "Apollo-M MAX");
        assert_eq!(desc.serial_number, "SN0001");
        assert_eq!(desc.bins, vec![1, 2, 4]);
        assert_eq!(
            desc.img_formats,
            vec![ImageFormat::Raw8, ImageFormat::Raw16]
        );
        assert_eq!(desc.bayer_pattern, BayerPattern::Mono);
        assert!(!desc.is_color());
    }

    #[test]
    fn decode_config_attributes_tags_bounds() {
        let raw = RawConfigAttributes {
            is_support_auto: 1,
            is_writable: 1,
            is_readable: 1,
            config_id: ConfigId::Exposure.code(),
            value_type: 0,
            max_value: 2_000_000_000.0,
            min_value: 10.0,
            default_value: 10_000.0,
            name: pad_string("Exposure"),
            description: pad_string("exposure time (us)"),
        };
        let attrs = decode_config_attributes(&raw).unwrap();
        assert_eq!(attrs.id, ConfigId::Exposure);
        assert_eq!(attrs.min, ConfigValue::Int(10));
        assert_eq!(attrs.max, ConfigValue::Int(2_000_000_000));
        assert_eq!(attrs.default, ConfigValue::Int(10_000));
        assert_eq!(attrs.name, "Exposure");
        assert!(attrs.supports_auto);
    }

    #[test]
    fn decode_config_attributes_rejects_unknown_code() {
        let raw = RawConfigAttributes {
            is_support_auto: 0,
            is_writable: 0,
            is_readable: 1,
            config_id: 19, // deprecated heater slot, not part of the binding
            value_type: 2,
            max_value: 1.0,
            min_value: 0.0,
            default_value: 0.0,
            name: pad_string("Heater"),
            description: [0; 128],
        };
        assert!(decode_config_attributes(&raw).is_err());
    }
}
