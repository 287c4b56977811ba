// src/common/variant.rs

use super::error::ConfigError;
use super::registers::{Field, RegisterMap, EC_REGISTERS, PH_REGISTERS};
use core::fmt;
use core::str::FromStr;

/// Vendor device type code reported by a pH circuit.
pub const PH_DEVICE_TYPE: u8 = 1;
/// Vendor device type code reported by an EC circuit.
pub const EC_DEVICE_TYPE: u8 = 4;

/// The OEM circuit variants this driver speaks to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// Electrical conductivity, reads in µS/cm.
    Ec,
    /// pH.
    Ph,
}

impl Variant {
    /// Register map for this variant.
    pub fn registers(self) -> &'static RegisterMap {
        match self {
            Variant::Ec => &EC_REGISTERS,
            Variant::Ph => &PH_REGISTERS,
        }
    }

    /// First register of the 4-byte primary reading.
    pub const fn measurement_field(self) -> Field {
        match self {
            Variant::Ec => Field::EcMsb,
            Variant::Ph => Field::PhMsb,
        }
    }

    /// Fixed-point scale of the primary reading and the calibration value.
    pub const fn measurement_scale(self) -> f64 {
        match self {
            Variant::Ec => 100.0,
            Variant::Ph => 1000.0,
        }
    }

    /// Device type code the circuit reports in register 0x00.
    pub const fn device_type(self) -> u8 {
        match self {
            Variant::Ec => EC_DEVICE_TYPE,
            Variant::Ph => PH_DEVICE_TYPE,
        }
    }

    pub const fn from_device_type(code: u8) -> Option<Self> {
        match code {
            EC_DEVICE_TYPE => Some(Variant::Ec),
            PH_DEVICE_TYPE => Some(Variant::Ph),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Variant::Ec => "EC",
            Variant::Ph => "PH",
        }
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    /// Case-insensitive "EC" or "PH".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("EC") {
            Ok(Variant::Ec)
        } else if s.eq_ignore_ascii_case("PH") {
            Ok(Variant::Ph)
        } else {
            Err(ConfigError::UnsupportedVariant)
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
