// src/common/types.rs

use super::variant::Variant;

/// Contents of the device type and firmware registers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceInfo {
    /// Vendor type code (1 = pH, 4 = EC).
    pub device_type: u8,
    pub firmware: u8,
}

impl DeviceInfo {
    /// Variant matching the reported type code, if it is one this driver knows.
    pub fn variant(&self) -> Option<Variant> {
        Variant::from_device_type(self.device_type)
    }
}

/// Active/hibernate state held in the sleep register.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerState {
    Hibernating = 0x00,
    Awake = 0x01,
}

impl PowerState {
    /// Any non-zero value reads as awake.
    pub const fn from_u8(value: u8) -> Self {
        if value == 0 {
            PowerState::Hibernating
        } else {
            PowerState::Awake
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Interrupt pin behaviour when a new reading is available.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptMode {
    Disabled,
    /// Pin driven high on a new reading.
    HighOnReading,
    /// Pin driven low on a new reading.
    LowOnReading,
    /// Pin inverts on every new reading.
    ChangeOnReading,
    /// A code the datasheet does not list.
    Unknown(u8),
}

impl InterruptMode {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => InterruptMode::Disabled,
            2 => InterruptMode::HighOnReading,
            4 => InterruptMode::LowOnReading,
            8 => InterruptMode::ChangeOnReading,
            other => InterruptMode::Unknown(other),
        }
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            InterruptMode::Disabled => 0,
            InterruptMode::HighOnReading => 2,
            InterruptMode::LowOnReading => 4,
            InterruptMode::ChangeOnReading => 8,
            InterruptMode::Unknown(other) => other,
        }
    }
}

/// One register and the byte it held.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterValue {
    pub offset: u8,
    pub value: u8,
}

/// Capacity covers the largest map (EC, 0x00..=0x23).
pub const REGISTER_DUMP_CAPACITY: usize = 40;

/// Snapshot of a device's register file.
pub type RegisterDump = heapless::Vec<RegisterValue, REGISTER_DUMP_CAPACITY>;
