//! Typed configuration: identifiers, tagged values, per-identifier
//! attributes, and the validating registry.

use crate::{Error, Result};

/// Closed set of configuration identifiers understood by the driver.
///
/// Discriminants match the driver's numeric config codes. Not every camera
/// exposes every identifier; the per-device [`ConfigRegistry`] is the
/// authority on what a given unit supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigId {
    /// Exposure time in microseconds, supports auto.
    Exposure = 0,
    /// Analog gain, supports auto.
    Gain = 1,
    /// Hardware binning on/off.
    HardwareBin = 2,
    /// Sensor temperature in Celsius, read-only.
    Temperature = 3,
    /// White balance red coefficient.
    WbRed = 4,
    /// White balance green coefficient.
    WbGreen = 5,
    /// White balance blue coefficient.
    WbBlue = 6,
    /// Sensor offset (bias).
    Offset = 7,
    /// Gain ceiling for auto adjustment.
    AutoExpoMaxGain = 8,
    /// Exposure ceiling for auto adjustment, in milliseconds.
    AutoExpoMaxExposure = 9,
    /// Target brightness for auto adjustment.
    AutoExpoBrightness = 10,
    /// ST4 guide line, write-only.
    GuideNorth = 11,
    /// ST4 guide line, write-only.
    GuideSouth = 12,
    /// ST4 guide line, write-only.
    GuideEast = 13,
    /// ST4 guide line, write-only.
    GuideWest = 14,
    /// Conversion gain in e/ADU, read-only.
    EGain = 15,
    /// Cooler power percentage, read-only.
    CoolerPower = 16,
    /// Cooler target temperature in Celsius.
    TargetTemp = 17,
    /// Cooler (and fan) on/off.
    Cooler = 18,
    /// Lens heater power percentage.
    HeaterPower = 20,
    /// Radiator fan power percentage.
    FanPower = 21,
    /// Trigger: clear both flips. The supplied value is ignored.
    FlipNone = 22,
    /// Trigger: flip horizontally only. The supplied value is ignored.
    FlipHorizontal = 23,
    /// Trigger: flip vertically only. The supplied value is ignored.
    FlipVertical = 24,
    /// Trigger: flip both axes. The supplied value is ignored.
    FlipBoth = 25,
    /// Frame rate limit, 0 means unlimited.
    FrameRateLimit = 26,
    /// High quality image mode for DDR-less cameras.
    HighQualityImage = 27,
    /// USB bandwidth limit percentage.
    UsbBandwidthLimit = 28,
    /// Sum (instead of average) pixels when binning.
    PixelBinSum = 29,
    /// Bin across the Bayer pattern, color cameras only.
    MonoBin = 30,
}

impl ConfigId {
    /// Numeric config code used on the driver boundary.
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Exposure,
            1 => Self::Gain,
            2 => Self::HardwareBin,
            3 => Self::Temperature,
            4 => Self::WbRed,
            5 => Self::WbGreen,
            6 => Self::WbBlue,
            7 => Self::Offset,
            8 => Self::AutoExpoMaxGain,
            9 => Self::AutoExpoMaxExposure,
            10 => Self::AutoExpoBrightness,
            11 => Self::GuideNorth,
            12 => Self::GuideSouth,
            13 => Self::GuideEast,
            14 => Self::GuideWest,
            15 => Self::EGain,
            16 => Self::CoolerPower,
            17 => Self::TargetTemp,
            18 => Self::Cooler,
            20 => Self::HeaterPower,
            21 => Self::FanPower,
            22 => Self::FlipNone,
            23 => Self::FlipHorizontal,
            24 => Self::FlipVertical,
            25 => Self::FlipBoth,
            26 => Self::FrameRateLimit,
            27 => Self::HighQualityImage,
            28 => Self::UsbBandwidthLimit,
            29 => Self::PixelBinSum,
            30 => Self::MonoBin,
            _ => return None,
        })
    }

    /// Pure-trigger identifiers: setting them performs an action and the
    /// supplied value is ignored. Exempt from the set/get round-trip law.
    pub const fn is_trigger(self) -> bool {
        matches!(
            self,
            Self::FlipNone | Self::FlipHorizontal | Self::FlipVertical | Self::FlipBoth
        )
    }

    /// Identifiers the driver only accepts while the camera is not exposing.
    pub const fn requires_idle(self) -> bool {
        matches!(
            self,
            Self::HardwareBin | Self::PixelBinSum | Self::MonoBin | Self::HighQualityImage
        )
    }
}

/// Declared value type of a configuration identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Int = 0,
    Float = 1,
    Bool = 2,
}

impl ValueType {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Int),
            1 => Some(Self::Float),
            2 => Some(Self::Bool),
            _ => None,
        }
    }
}

/// A configuration value with exactly one active interpretation.
///
/// The driver stores these three cases in overlapping union storage; here
/// the tag is explicit and checked. Reading a value with the wrong
/// accessor is a programming error, hence the panicking `expect_*`
/// accessors alongside the fallible `as_*` ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigValue {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ConfigValue {
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Int(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
            Self::Bool(_) => ValueType::Bool,
        }
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Panics if the active tag is not `Int`.
    pub fn expect_int(&self) -> i64 {
        match self {
            Self::Int(v) => *v,
            other => panic!("expected Int config value, got {other:?}"),
        }
    }

    /// Panics if the active tag is not `Float`.
    pub fn expect_float(&self) -> f64 {
        match self {
            Self::Float(v) => *v,
            other => panic!("expected Float config value, got {other:?}"),
        }
    }

    /// Panics if the active tag is not `Bool`.
    pub fn expect_bool(&self) -> bool {
        match self {
            Self::Bool(v) => *v,
            other => panic!("expected Bool config value, got {other:?}"),
        }
    }
}

/// Per-identifier descriptor: access rules, value type, bounds, default.
/// Fetched once per device and immutable while the device stays open.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigAttributes {
    pub id: ConfigId,
    pub supports_auto: bool,
    pub writable: bool,
    pub readable: bool,
    pub value_type: ValueType,
    pub min: ConfigValue,
    pub max: ConfigValue,
    pub default: ConfigValue,
    /// Human-readable name, e.g. "Exposure".
    pub name: String,
    /// Short description of what the identifier controls.
    pub description: String,
}

/// Registry of the configuration identifiers one camera supports.
///
/// Validates typed get/set calls against the per-identifier attributes
/// before they are dispatched to the driver: access rules, value tag,
/// bounds, exposing-state restrictions, and auto-mode support.
#[derive(Debug, Clone)]
pub struct ConfigRegistry {
    attrs: Vec<ConfigAttributes>,
}

impl ConfigRegistry {
    pub(crate) fn new(attrs: Vec<ConfigAttributes>) -> Self {
        Self { attrs }
    }

    /// Attributes of `id`, or `InvalidConfig` if this camera does not
    /// expose the identifier.
    pub fn attributes_of(&self, id: ConfigId) -> Result<&ConfigAttributes> {
        self.attrs
            .iter()
            .find(|a| a.id == id)
            .ok_or(Error::InvalidConfig(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigAttributes> {
        self.attrs.iter()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Validate a read of `id`. Write-only identifiers fail with
    /// `NotReadable`.
    pub(crate) fn validate_get(&self, id: ConfigId) -> Result<()> {
        let attrs = self.attributes_of(id)?;
        if !attrs.readable {
            return Err(Error::NotReadable(id));
        }
        Ok(())
    }

    /// Validate a write of `value` to `id` and resolve the effective auto
    /// flag.
    ///
    /// Requesting auto on an identifier without `supports_auto` is
    /// downgraded to non-auto with a warning rather than rejected; the
    /// driver tolerates either, and downgrading keeps existing callers
    /// working while still making the mismatch visible.
    ///
    /// Trigger identifiers skip the type and bounds checks because their
    /// value is ignored by contract.
    pub(crate) fn validate_set(
        &self,
        id: ConfigId,
        value: ConfigValue,
        request_auto: bool,
        exposing: bool,
    ) -> Result<bool> {
        let attrs = self.attributes_of(id)?;
        if !attrs.writable {
            return Err(Error::NotWritable(id));
        }
        if exposing && id.requires_idle() {
            return Err(Error::Exposing);
        }

        if !id.is_trigger() {
            if value.value_type() != attrs.value_type {
                return Err(Error::TypeMismatch {
                    expected: attrs.value_type,
                    got: value.value_type(),
                });
            }
            if !in_bounds(value, attrs.min, attrs.max) {
                return Err(Error::OutOfLimit);
            }
        }

        let auto = request_auto && attrs.supports_auto;
        if request_auto && !attrs.supports_auto {
            log::warn!(
                "config {:?} does not support auto mode, request downgraded to manual",
                id
            );
        }
        Ok(auto)
    }
}

/// Bounds check for int and float values. Bool-typed configs carry no
/// meaningful bounds and always pass.
fn in_bounds(value: ConfigValue, min: ConfigValue, max: ConfigValue) -> bool {
    match (value, min, max) {
        (ConfigValue::Int(v), ConfigValue::Int(lo), ConfigValue::Int(hi)) => v >= lo && v <= hi,
        (ConfigValue::Float(v), ConfigValue::Float(lo), ConfigValue::Float(hi)) => {
            v >= lo && v <= hi
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(
        id: ConfigId,
        value_type: ValueType,
        writable: bool,
        readable: bool,
        supports_auto: bool,
    ) -> ConfigAttributes {
        let (min, max, default) = match value_type {
            ValueType::Int => (
                ConfigValue::Int(0),
                ConfigValue::Int(100),
                ConfigValue::Int(50),
            ),
            ValueType::Float => (
                ConfigValue::Float(-50.0),
                ConfigValue::Float(50.0),
                ConfigValue::Float(0.0),
            ),
            ValueType::Bool => (
                ConfigValue::Bool(false),
                ConfigValue::Bool(true),
                ConfigValue::Bool(false),
            ),
        };
        ConfigAttributes {
            id,
            supports_auto,
            writable,
            readable,
            value_type,
            min,
            max,
            default,
            name: format!("{id:?}"),
            description: String::new(),
        }
    }

    fn registry() -> ConfigRegistry {
        ConfigRegistry::new(vec![
            attrs(ConfigId::Gain, ValueType::Int, true, true, true),
            attrs(ConfigId::Offset, ValueType::Int, true, true, false),
            attrs(ConfigId::Temperature, ValueType::Float, false, true, false),
            attrs(ConfigId::GuideNorth, ValueType::Bool, true, false, false),
            attrs(ConfigId::Cooler, ValueType::Bool, true, true, false),
            attrs(ConfigId::HardwareBin, ValueType::Bool, true, true, false),
            attrs(ConfigId::FlipBoth, ValueType::Bool, true, true, false),
        ])
    }

    #[test]
    fn unknown_id_is_invalid_config() {
        let reg = registry();
        assert_eq!(
            reg.attributes_of(ConfigId::MonoBin).unwrap_err(),
            Error::InvalidConfig(ConfigId::MonoBin)
        );
    }

    #[test]
    fn read_only_rejects_writes() {
        let reg = registry();
        let err = reg
            .validate_set(ConfigId::Temperature, ConfigValue::Float(0.0), false, false)
            .unwrap_err();
        assert_eq!(err, Error::NotWritable(ConfigId::Temperature));
    }

    #[test]
    fn write_only_rejects_reads() {
        let reg = registry();
        assert_eq!(
            reg.validate_get(ConfigId::GuideNorth).unwrap_err(),
            Error::NotReadable(ConfigId::GuideNorth)
        );
    }

    #[test]
    fn wrong_tag_is_type_mismatch() {
        let reg = registry();
        let err = reg
            .validate_set(ConfigId::Gain, ConfigValue::Bool(true), false, false)
            .unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: ValueType::Int,
                got: ValueType::Bool,
            }
        );
    }

    #[test]
    fn out_of_bounds_is_out_of_limit() {
        let reg = registry();
        let err = reg
            .validate_set(ConfigId::Gain, ConfigValue::Int(101), false, false)
            .unwrap_err();
        assert_eq!(err, Error::OutOfLimit);
    }

    #[test]
    fn bool_configs_ignore_bounds() {
        let reg = registry();
        assert!(reg
            .validate_set(ConfigId::Cooler, ConfigValue::Bool(true), false, false)
            .is_ok());
    }

    #[test]
    fn auto_downgraded_when_unsupported() {
        let reg = registry();
        let auto = reg
            .validate_set(ConfigId::Offset, ConfigValue::Int(10), true, false)
            .unwrap();
        assert!(!auto);

        let auto = reg
            .validate_set(ConfigId::Gain, ConfigValue::Int(10), true, false)
            .unwrap();
        assert!(auto);
    }

    #[test]
    fn idle_only_config_rejected_while_exposing() {
        let reg = registry();
        let err = reg
            .validate_set(ConfigId::HardwareBin, ConfigValue::Bool(true), false, true)
            .unwrap_err();
        assert_eq!(err, Error::Exposing);

        assert!(reg
            .validate_set(ConfigId::HardwareBin, ConfigValue::Bool(true), false, false)
            .is_ok());
    }

    #[test]
    fn trigger_skips_type_and_bounds_checks() {
        let reg = registry();
        // Value tag does not matter for triggers.
        assert!(reg
            .validate_set(ConfigId::FlipBoth, ConfigValue::Int(999), false, false)
            .is_ok());
    }

    #[test]
    fn config_code_round_trip() {
        for id in [
            ConfigId::Exposure,
            ConfigId::Gain,
            ConfigId::Temperature,
            ConfigId::EGain,
            ConfigId::FlipNone,
            ConfigId::MonoBin,
        ] {
            assert_eq!(ConfigId::from_code(id.code()), Some(id));
        }
        assert_eq!(ConfigId::from_code(19), None); // deprecated heater slot
        assert_eq!(ConfigId::from_code(99), None);
    }

    #[test]
    #[should_panic(expected = "expected Int config value")]
    fn wrong_accessor_panics() {
        ConfigValue::Bool(true).expect_int();
    }
}
