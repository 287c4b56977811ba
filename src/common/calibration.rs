// src/common/calibration.rs

use super::error::ConfigError;
use super::variant::Variant;
use core::fmt;
use core::str::FromStr;

/// Request code that wipes all stored calibration points.
pub const CLEAR_CALIBRATION_CODE: u8 = 0x01;

/// A calibration point. Which ones are valid depends on the variant.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationPoint {
    /// EC only: probe in air.
    Dry,
    /// EC only: one-point calibration.
    Single,
    Low,
    /// pH only.
    Mid,
    High,
}

impl CalibrationPoint {
    pub const fn name(self) -> &'static str {
        match self {
            CalibrationPoint::Dry => "dry",
            CalibrationPoint::Single => "single",
            CalibrationPoint::Low => "low",
            CalibrationPoint::Mid => "mid",
            CalibrationPoint::High => "high",
        }
    }

    /// Code written to the calibration request register for this point.
    pub fn request_code(self, variant: Variant) -> Result<u8, ConfigError> {
        let code = match (variant, self) {
            (Variant::Ec, CalibrationPoint::Dry) => 0x02,
            (Variant::Ec, CalibrationPoint::Single) => 0x03,
            (Variant::Ec, CalibrationPoint::Low) => 0x04,
            (Variant::Ec, CalibrationPoint::High) => 0x05,
            (Variant::Ph, CalibrationPoint::Low) => 0x02,
            (Variant::Ph, CalibrationPoint::Mid) => 0x03,
            (Variant::Ph, CalibrationPoint::High) => 0x04,
            (variant, point) => return Err(ConfigError::InvalidCalibrationPoint { point, variant }),
        };
        Ok(code)
    }

    /// Bit set in the calibration confirm register once this point is stored.
    pub fn status_bit(self, variant: Variant) -> Result<u8, ConfigError> {
        let bit = match (variant, self) {
            (Variant::Ec, CalibrationPoint::Dry) => 0,
            (Variant::Ec, CalibrationPoint::Single) => 1,
            (Variant::Ec, CalibrationPoint::Low) => 2,
            (Variant::Ec, CalibrationPoint::High) => 3,
            (Variant::Ph, CalibrationPoint::Low) => 0,
            (Variant::Ph, CalibrationPoint::Mid) => 1,
            (Variant::Ph, CalibrationPoint::High) => 2,
            (variant, point) => return Err(ConfigError::InvalidCalibrationPoint { point, variant }),
        };
        Ok(1 << bit)
    }
}

impl FromStr for CalibrationPoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dry" => Ok(CalibrationPoint::Dry),
            "single" => Ok(CalibrationPoint::Single),
            "low" => Ok(CalibrationPoint::Low),
            "mid" => Ok(CalibrationPoint::Mid),
            "high" => Ok(CalibrationPoint::High),
            _ => Err(ConfigError::UnknownCalibrationPoint),
        }
    }
}

impl fmt::Display for CalibrationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Bit 0 dry, bit 1 single, bit 2 low, bit 3 high.
const EC_CALIBRATION_STATUS: [&str; 16] = [
    "nothing",
    "dry",
    "single",
    "dry, single",
    "low",
    "dry, low",
    "single, low",
    "dry, single, low",
    "high",
    "dry, high",
    "single, high",
    "dry, single, high",
    "low, high",
    "dry, low, high",
    "single, low, high",
    "all",
];

// Bit 0 low, bit 1 mid, bit 2 high.
const PH_CALIBRATION_STATUS: [&str; 8] = [
    "nothing",
    "low",
    "mid",
    "low, mid",
    "high",
    "low, high",
    "mid, high",
    "all",
];

/// Decoded contents of the calibration confirm register.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationStatus {
    variant: Variant,
    bits: u8,
}

impl CalibrationStatus {
    /// Validates `bits` against the variant's table (0..=15 EC, 0..=7 pH).
    pub fn from_bits(variant: Variant, bits: u8) -> Option<Self> {
        let table: &[&str] = match variant {
            Variant::Ec => &EC_CALIBRATION_STATUS,
            Variant::Ph => &PH_CALIBRATION_STATUS,
        };
        (usize::from(bits) < table.len()).then_some(CalibrationStatus { variant, bits })
    }

    pub const fn bits(&self) -> u8 {
        self.bits
    }

    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Human-readable list of the stored points, `"nothing"` or `"all"`.
    pub fn description(&self) -> &'static str {
        match self.variant {
            Variant::Ec => EC_CALIBRATION_STATUS[usize::from(self.bits)],
            Variant::Ph => PH_CALIBRATION_STATUS[usize::from(self.bits)],
        }
    }

    /// False for points the variant does not have.
    pub fn is_calibrated(&self, point: CalibrationPoint) -> bool {
        point
            .status_bit(self.variant)
            .map(|bit| self.bits & bit != 0)
            .unwrap_or(false)
    }
}

impl fmt::Display for CalibrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Progress of the calibration sequence within one session.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationState {
    #[default]
    Idle,
    /// Calibration value written, no point requested yet.
    ValueStaged,
    /// Request code written, waiting on the device.
    RequestSent,
    Confirmed,
    /// The device returned a non-zero code.
    Failed(u8),
}
