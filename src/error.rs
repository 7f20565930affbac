use crate::config::{ConfigId, ValueType};

/// Errors reported by the camera driver and the client-side control layer.
///
/// The first seventeen variants re-express the driver's closed error-code
/// enumeration one-to-one. `TypeMismatch` is raised client-side by the
/// config registry before a value with the wrong tag ever reaches the
/// driver, which has no code for it (its value storage is an untyped union).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("index out of range")]
    InvalidIndex,

    #[error("invalid camera id")]
    InvalidId,

    #[error("unknown configuration {0:?} for this camera")]
    InvalidConfig(ConfigId),

    #[error("invalid argument")]
    InvalidArgument,

    #[error("camera not opened")]
    NotOpened,

    #[error("camera not found, it may have been removed")]
    DeviceNotFound,

    #[error("value out of limit")]
    OutOfLimit,

    #[error("camera exposure failed")]
    ExposureFailed,

    #[error("timeout waiting for image data")]
    Timeout,

    #[error("image buffer too small: {given} bytes, need {needed}")]
    SizeTooSmall { given: usize, needed: usize },

    #[error("camera is exposing, stop exposure first")]
    Exposing,

    #[error("invalid pointer")]
    InvalidPointer,

    #[error("configuration {0:?} is not writable")]
    NotWritable(ConfigId),

    #[error("configuration {0:?} is not readable")]
    NotReadable(ConfigId),

    #[error("access denied, the camera may be held by another process")]
    AccessDenied,

    #[error("operation failed, the camera may have been disconnected")]
    OperationFailed,

    #[error("memory allocation failed in the driver")]
    MemoryFailed,

    #[error("config value type mismatch: expected {expected:?}, got {got:?}")]
    TypeMismatch { expected: ValueType, got: ValueType },
}
