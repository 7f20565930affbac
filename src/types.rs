//! Device-level types: descriptors, capabilities, geometry, states.

bitflags::bitflags! {
    /// Capability bitmap assembled from the driver's per-camera property flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u32 {
        /// Color sensor (has a Bayer filter array).
        const COLOR        = 1 << 0;
        /// ST4 autoguider port present.
        const ST4_PORT     = 1 << 1;
        /// Cooler assembly present (cooler, lens heater, fan).
        const COOLER       = 1 << 2;
        /// Connected at USB 3.0 speed.
        const USB3_SPEED   = 1 << 3;
        /// Sensor supports hardware binning.
        const HARDWARE_BIN = 1 << 4;
    }
}

/// Bayer color-filter-array layout of a color sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BayerPattern {
    /// Monochrome sensor, no filter array.
    Mono = -1,
    Rggb = 0,
    Bggr = 1,
    Grbg = 2,
    Gbrg = 3,
}

impl BayerPattern {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            -1 => Some(Self::Mono),
            0 => Some(Self::Rggb),
            1 => Some(Self::Bggr),
            2 => Some(Self::Grbg),
            3 => Some(Self::Gbrg),
            _ => None,
        }
    }
}

/// Image data format of retrieved frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// 8-bit raw sensor data, 1 byte per pixel.
    Raw8 = 0,
    /// 16-bit raw sensor data, 2 bytes per pixel, little-endian.
    Raw16 = 1,
    /// Debayered RGB, 3 bytes per pixel (color cameras only).
    Rgb24 = 2,
    /// 8-bit monochrome derived from the Bayer array (color cameras only).
    Mono8 = 3,
}

/// Terminator value in the driver's fixed-capacity format list.
pub(crate) const FORMAT_LIST_END: i32 = -1;

impl ImageFormat {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Raw8),
            1 => Some(Self::Raw16),
            2 => Some(Self::Rgb24),
            3 => Some(Self::Mono8),
            _ => None,
        }
    }

    /// Bytes occupied by one pixel in this format.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Raw8 | Self::Mono8 => 1,
            Self::Raw16 => 2,
            Self::Rgb24 => 3,
        }
    }
}

/// Camera lifecycle state. Transitions are strictly sequential:
/// `Closed -> Opened -> Exposing`, back to `Opened` on stop, and to
/// `Closed` from either open state on close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Closed,
    Opened,
    Exposing,
}

/// ST4 guide line direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideDirection {
    /// Generally DEC+ on the mount.
    North,
    /// Generally DEC- on the mount.
    South,
    /// Generally RA+ on the mount.
    East,
    /// Generally RA- on the mount.
    West,
}

/// Region of interest: the sensor sub-rectangle actually read out,
/// expressed in binned pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Roi {
    pub start_x: u32,
    pub start_y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    pub const fn new(start_x: u32, start_y: u32, width: u32, height: u32) -> Self {
        Self {
            start_x,
            start_y,
            width,
            height,
        }
    }
}

/// Named capture mode of the sensor (e.g. normal vs. low-noise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorMode {
    /// Display name, suitable for a UI list.
    pub name: String,
    /// Longer description, suitable for a tooltip.
    pub description: String,
}

/// Immutable snapshot of one camera's identity, capabilities, and sensor
/// geometry, fetched at enumeration time. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDescriptor {
    /// Driver-assigned unique camera id; all control calls address it.
    pub camera_id: i32,
    /// Camera model name, e.g. "Mars-C".
    pub model_name: String,
    /// Serial number, unique per unit.
    pub serial_number: String,
    /// Sensor model, e.g. "IMX462".
    pub sensor_name: String,
    pub capabilities: Capabilities,
    /// Maximum sensor width in unbinned pixels.
    pub max_width: u32,
    /// Maximum sensor height in unbinned pixels.
    pub max_height: u32,
    /// ADC bit depth of the sensor.
    pub bit_depth: u32,
    pub bayer_pattern: BayerPattern,
    /// Pixel pitch in micrometers.
    pub pixel_size_um: f64,
    /// Supported binning factors, ascending, e.g. `[1, 2]`.
    pub bins: Vec<u32>,
    /// Supported image formats in driver order.
    pub img_formats: Vec<ImageFormat>,
}

impl DeviceDescriptor {
    pub fn is_color(&self) -> bool {
        self.capabilities.contains(Capabilities::COLOR)
    }

    pub fn supports_bin(&self, bin: u32) -> bool {
        self.bins.contains(&bin)
    }

    pub fn supports_format(&self, format: ImageFormat) -> bool {
        self.img_formats.contains(&format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_per_pixel_per_format() {
        assert_eq!(ImageFormat::Raw8.bytes_per_pixel(), 1);
        assert_eq!(ImageFormat::Raw16.bytes_per_pixel(), 2);
        assert_eq!(ImageFormat::Rgb24.bytes_per_pixel(), 3);
        assert_eq!(ImageFormat::Mono8.bytes_per_pixel(), 1);
    }

    #[test]
    fn bayer_pattern_raw_mapping() {
        assert_eq!(BayerPattern::from_raw(-1), Some(BayerPattern::Mono));
        assert_eq!(BayerPattern::from_raw(0), Some(BayerPattern::Rggb));
        assert_eq!(BayerPattern::from_raw(7), None);
    }

    #[test]
    fn capability_queries() {
        let caps = Capabilities::COLOR | Capabilities::USB3_SPEED;
        assert!(caps.contains(Capabilities::COLOR));
        assert!(!caps.contains(Capabilities::COOLER));
    }
}
