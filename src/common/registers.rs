// src/common/registers.rs

//! Register maps of the EC and pH OEM circuits.
//!
//! Multi-byte fields are stored most significant byte first. Each field is
//! listed by all of its byte names (`msb`, `high`, `low`, `lsb`) so any name
//! from the vendor datasheet resolves, but block transfers always start at
//! the `msb` offset and cover [`Field::width`] consecutive registers.

use super::error::ConfigError;
use super::variant::Variant;
use core::fmt;

/// A named register of an OEM circuit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    DeviceType,
    DeviceFirmware,
    DeviceAddrLock,
    DeviceAddr,
    DeviceIntr,
    DeviceLed,
    DeviceSleep,
    DeviceNewReading,
    ProbeTypeMsb,
    ProbeTypeLsb,
    CalibrationMsb,
    CalibrationHigh,
    CalibrationLow,
    CalibrationLsb,
    CalibrationRequest,
    CalibrationConfirm,
    TemperatureCompMsb,
    TemperatureCompHigh,
    TemperatureCompLow,
    TemperatureCompLsb,
    TemperatureConfirmMsb,
    TemperatureConfirmHigh,
    TemperatureConfirmLow,
    TemperatureConfirmLsb,
    EcMsb,
    EcHigh,
    EcLow,
    EcLsb,
    TdsMsb,
    TdsHigh,
    TdsLow,
    TdsLsb,
    SalinityMsb,
    SalinityHigh,
    SalinityLow,
    SalinityLsb,
    PhMsb,
    PhHigh,
    PhLow,
    PhLsb,
}

impl Field {
    /// Every field, in datasheet order.
    pub const ALL: [Field; 40] = [
        Field::DeviceType,
        Field::DeviceFirmware,
        Field::DeviceAddrLock,
        Field::DeviceAddr,
        Field::DeviceIntr,
        Field::DeviceLed,
        Field::DeviceSleep,
        Field::DeviceNewReading,
        Field::ProbeTypeMsb,
        Field::ProbeTypeLsb,
        Field::CalibrationMsb,
        Field::CalibrationHigh,
        Field::CalibrationLow,
        Field::CalibrationLsb,
        Field::CalibrationRequest,
        Field::CalibrationConfirm,
        Field::TemperatureCompMsb,
        Field::TemperatureCompHigh,
        Field::TemperatureCompLow,
        Field::TemperatureCompLsb,
        Field::TemperatureConfirmMsb,
        Field::TemperatureConfirmHigh,
        Field::TemperatureConfirmLow,
        Field::TemperatureConfirmLsb,
        Field::EcMsb,
        Field::EcHigh,
        Field::EcLow,
        Field::EcLsb,
        Field::TdsMsb,
        Field::TdsHigh,
        Field::TdsLow,
        Field::TdsLsb,
        Field::SalinityMsb,
        Field::SalinityHigh,
        Field::SalinityLow,
        Field::SalinityLsb,
        Field::PhMsb,
        Field::PhHigh,
        Field::PhLow,
        Field::PhLsb,
    ];

    /// Datasheet name of the register, e.g. `device_calibration_confirm`.
    pub const fn name(self) -> &'static str {
        match self {
            Field::DeviceType => "device_type",
            Field::DeviceFirmware => "device_firmware",
            Field::DeviceAddrLock => "device_addr_lock",
            Field::DeviceAddr => "device_addr",
            Field::DeviceIntr => "device_intr",
            Field::DeviceLed => "device_led",
            Field::DeviceSleep => "device_sleep",
            Field::DeviceNewReading => "device_new_reading",
            Field::ProbeTypeMsb => "device_probe_type_msb",
            Field::ProbeTypeLsb => "device_probe_type_lsb",
            Field::CalibrationMsb => "device_calibration_msb",
            Field::CalibrationHigh => "device_calibration_high",
            Field::CalibrationLow => "device_calibration_low",
            Field::CalibrationLsb => "device_calibration_lsb",
            Field::CalibrationRequest => "device_calibration_request",
            Field::CalibrationConfirm => "device_calibration_confirm",
            Field::TemperatureCompMsb => "device_temperature_comp_msb",
            Field::TemperatureCompHigh => "device_temperature_comp_high",
            Field::TemperatureCompLow => "device_temperature_comp_low",
            Field::TemperatureCompLsb => "device_temperature_comp_lsb",
            Field::TemperatureConfirmMsb => "device_temperature_confirm_msb",
            Field::TemperatureConfirmHigh => "device_temperature_confirm_high",
            Field::TemperatureConfirmLow => "device_temperature_confirm_low",
            Field::TemperatureConfirmLsb => "device_temperature_confirm_lsb",
            Field::EcMsb => "device_ec_msb",
            Field::EcHigh => "device_ec_high",
            Field::EcLow => "device_ec_low",
            Field::EcLsb => "device_ec_lsb",
            Field::TdsMsb => "device_tds_msb",
            Field::TdsHigh => "device_tds_high",
            Field::TdsLow => "device_tds_low",
            Field::TdsLsb => "device_tds_lsb",
            Field::SalinityMsb => "device_salinity_msb",
            Field::SalinityHigh => "device_salinity_high",
            Field::SalinityLow => "device_salinity_low",
            Field::SalinityLsb => "device_salinity_lsb",
            Field::PhMsb => "device_ph_msb",
            Field::PhHigh => "device_ph_high",
            Field::PhLow => "device_ph_low",
            Field::PhLsb => "device_ph_lsb",
        }
    }

    /// Looks a field up by its datasheet name.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name() == name)
            .ok_or(ConfigError::UnknownField)
    }

    /// Number of bytes in a block transfer starting at this field.
    pub const fn width(self) -> usize {
        match self {
            Field::ProbeTypeMsb => 2,
            Field::CalibrationMsb
            | Field::TemperatureCompMsb
            | Field::TemperatureConfirmMsb
            | Field::EcMsb
            | Field::TdsMsb
            | Field::SalinityMsb
            | Field::PhMsb => 4,
            _ => 1,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable field-to-offset table of one variant.
#[derive(Debug)]
pub struct RegisterMap {
    variant: Variant,
    entries: &'static [(Field, u8)],
}

impl RegisterMap {
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Byte offset of `field`, if this variant has it.
    pub fn offset(&self, field: Field) -> Option<u8> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, offset)| *offset)
    }

    pub fn entries(&self) -> impl Iterator<Item = (Field, u8)> + '_ {
        self.entries.iter().copied()
    }

    /// Highest mapped register offset.
    pub fn max_offset(&self) -> u8 {
        self.entries.iter().map(|(_, offset)| *offset).max().unwrap_or(0)
    }
}

/// Resolves `field` against the register map of `variant`.
pub fn field_offset(variant: Variant, field: Field) -> Result<u8, ConfigError> {
    variant
        .registers()
        .offset(field)
        .ok_or(ConfigError::FieldNotInMap { field, variant })
}

/// Same as [`field_offset`], addressed by datasheet name.
pub fn field_offset_by_name(variant: Variant, name: &str) -> Result<u8, ConfigError> {
    field_offset(variant, Field::from_name(name)?)
}

/// EC circuit registers.
///
/// The conductivity reading occupies 0x18..=0x1B. The vendor table lists its
/// low and lsb bytes at 0x20/0x21, which overlap the salinity block; the
/// contiguous offsets are used instead.
pub static EC_REGISTERS: RegisterMap = RegisterMap {
    variant: Variant::Ec,
    entries: &[
        (Field::DeviceType, 0x00),
        (Field::DeviceFirmware, 0x01),
        (Field::DeviceAddrLock, 0x02),
        (Field::DeviceAddr, 0x03),
        (Field::DeviceIntr, 0x04),
        (Field::DeviceLed, 0x05),
        (Field::DeviceSleep, 0x06),
        (Field::DeviceNewReading, 0x07),
        (Field::ProbeTypeMsb, 0x08),
        (Field::ProbeTypeLsb, 0x09),
        (Field::CalibrationMsb, 0x0A),
        (Field::CalibrationHigh, 0x0B),
        (Field::CalibrationLow, 0x0C),
        (Field::CalibrationLsb, 0x0D),
        (Field::CalibrationRequest, 0x0E),
        (Field::CalibrationConfirm, 0x0F),
        (Field::TemperatureCompMsb, 0x10),
        (Field::TemperatureCompHigh, 0x11),
        (Field::TemperatureCompLow, 0x12),
        (Field::TemperatureCompLsb, 0x13),
        (Field::TemperatureConfirmMsb, 0x14),
        (Field::TemperatureConfirmHigh, 0x15),
        (Field::TemperatureConfirmLow, 0x16),
        (Field::TemperatureConfirmLsb, 0x17),
        (Field::EcMsb, 0x18),
        (Field::EcHigh, 0x19),
        (Field::EcLow, 0x1A),
        (Field::EcLsb, 0x1B),
        (Field::TdsMsb, 0x1C),
        (Field::TdsHigh, 0x1D),
        (Field::TdsLow, 0x1E),
        (Field::TdsLsb, 0x1F),
        (Field::SalinityMsb, 0x20),
        (Field::SalinityHigh, 0x21),
        (Field::SalinityLow, 0x22),
        (Field::SalinityLsb, 0x23),
    ],
};

/// pH circuit registers.
pub static PH_REGISTERS: RegisterMap = RegisterMap {
    variant: Variant::Ph,
    entries: &[
        (Field::DeviceType, 0x00),
        (Field::DeviceFirmware, 0x01),
        (Field::DeviceAddrLock, 0x02),
        (Field::DeviceAddr, 0x03),
        (Field::DeviceIntr, 0x04),
        (Field::DeviceLed, 0x05),
        (Field::DeviceSleep, 0x06),
        (Field::DeviceNewReading, 0x07),
        (Field::CalibrationMsb, 0x08),
        (Field::CalibrationHigh, 0x09),
        (Field::CalibrationLow, 0x0A),
        (Field::CalibrationLsb, 0x0B),
        (Field::CalibrationRequest, 0x0C),
        (Field::CalibrationConfirm, 0x0D),
        (Field::TemperatureCompMsb, 0x0E),
        (Field::TemperatureCompHigh, 0x0F),
        (Field::TemperatureCompLow, 0x10),
        (Field::TemperatureCompLsb, 0x11),
        (Field::TemperatureConfirmMsb, 0x12),
        (Field::TemperatureConfirmHigh, 0x13),
        (Field::TemperatureConfirmLow, 0x14),
        (Field::TemperatureConfirmLsb, 0x15),
        (Field::PhMsb, 0x16),
        (Field::PhHigh, 0x17),
        (Field::PhLow, 0x18),
        (Field::PhLsb, 0x19),
    ],
};
