// src/common/address.rs

use super::error::ConfigError;
use core::convert::TryFrom;
use core::fmt;

/// A validated 7-bit I2C address of an Atlas Scientific OEM circuit.
///
/// The OEM family ships on four fixed addresses: 0x64 (EC), 0x65 (pH),
/// 0x66 (ORP) and 0x67 (DO). The decimal forms 100..=103 are the same bytes.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OemAddr(u8);

impl OemAddr {
    pub const EC: OemAddr = OemAddr(0x64);
    pub const PH: OemAddr = OemAddr(0x65);
    pub const ORP: OemAddr = OemAddr(0x66);
    pub const DO: OemAddr = OemAddr(0x67);

    /// Creates a new `OemAddr` if the given byte is one of the OEM addresses.
    pub fn new(address: u8) -> Result<Self, ConfigError> {
        if Self::is_valid(address) {
            Ok(OemAddr(address))
        } else {
            Err(ConfigError::InvalidAddress(address))
        }
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_valid(address: u8) -> bool {
        matches!(address, 0x64..=0x67)
    }
}

impl Default for OemAddr {
    fn default() -> Self {
        Self::EC
    }
}

impl TryFrom<u8> for OemAddr {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OemAddr> for u8 {
    fn from(value: OemAddr) -> Self {
        value.0
    }
}

impl fmt::Display for OemAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}
