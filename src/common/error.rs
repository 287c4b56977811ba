// src/common/error.rs

use super::calibration::CalibrationPoint;
use super::registers::Field;
use super::variant::Variant;

/// Top-level error returned by every session operation.
///
/// Generic over the bus error `E` so the caller keeps the HAL's own error type.
#[derive(Debug, thiserror::Error)]
pub enum OemError<E = ()>
where
    E: core::fmt::Debug, // Still need Debug for the generic transport error
{
    /// Underlying error from the bus transport. Never retried here.
    #[error("Transport error: {0:?}")]
    Transport(E),

    /// Rejected before any bus I/O took place.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A value could not be converted to or from its register encoding.
    #[error("Encoding error: {0}")]
    Codec(#[from] CodecError),

    /// The device did not clear its calibration request register.
    /// Carries the raw code read back from the device.
    #[error("Calibration not confirmed by device (code {0:#04x})")]
    CalibrationNotConfirmed(u8),

    /// The calibration confirm register held a value outside the variant's table.
    #[error("Unknown calibration bitmask: {0:#04x}")]
    UnknownCalibrationBitmask(u8),

    /// The vendor protocol does not expose this operation in software.
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Problems detected from the arguments alone.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Not one of the OEM addresses 0x64..=0x67.
    #[error("Invalid OEM address: {0:#04x}")]
    InvalidAddress(u8),

    /// Variant name other than "EC" or "PH".
    #[error("Unsupported module type, expected EC or PH")]
    UnsupportedVariant,

    /// Register name that no register map defines.
    #[error("Unknown register field")]
    UnknownField,

    /// Register exists, but not on this variant (e.g. `device_ph_msb` on EC).
    #[error("Register {field:?} is not defined for {variant:?}")]
    FieldNotInMap { field: Field, variant: Variant },

    /// Calibration point name that no variant accepts.
    #[error("Unknown calibration point name")]
    UnknownCalibrationPoint,

    /// Calibration point not accepted by this variant (e.g. `mid` on EC).
    #[error("Calibration point {point:?} is not valid for {variant:?}")]
    InvalidCalibrationPoint { point: CalibrationPoint, variant: Variant },

    /// Register transfers are 1 to 4 bytes long.
    #[error("Invalid register byte count: {0}")]
    InvalidByteCount(usize),

    /// A variant-specific driver was built on a session of the other variant.
    #[error("Expected a {expected:?} session, found {found:?}")]
    VariantMismatch { expected: Variant, found: Variant },
}

/// Errors from the fixed-point codec.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Scaled value is negative, not finite, or too large for the field width.
    #[error("Value does not fit in {width} byte(s)")]
    EncodingOverflow { width: usize },

    /// Fields are 1 to 4 bytes wide.
    #[error("Unsupported field width: {0}")]
    InvalidWidth(usize),
}

impl<E: core::fmt::Debug> OemError<E> {
    /// True for errors raised before touching the bus.
    pub fn is_config(&self) -> bool {
        matches!(self, OemError::Config(_))
    }
}
