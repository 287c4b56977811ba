// src/session/ec.rs

use super::{OemResult, OemSession};
use crate::common::{
    address::OemAddr,
    config::OemConfig,
    error::{ConfigError, OemError},
    hal_traits::{OemBus, OemTimer},
    registers::Field,
    variant::Variant,
};
use core::ops::{Deref, DerefMut};

/// Probe constant K is stored in hundredths.
pub const PROBE_CONSTANT_SCALE: f64 = 100.0;
/// TDS (ppm) and salinity (PSU) are stored in hundredths.
pub const DERIVED_READING_SCALE: f64 = 100.0;

/// EC circuit driver: the shared session plus probe constant, TDS and salinity.
#[derive(Debug)]
pub struct EcOem<IF>
where
    IF: OemBus + OemTimer,
{
    session: OemSession<IF>,
}

impl<IF> EcOem<IF>
where
    IF: OemBus + OemTimer,
{
    pub fn new(interface: IF, address: OemAddr, config: OemConfig) -> Self {
        EcOem {
            session: OemSession::new(interface, address, Variant::Ec, config),
        }
    }

    /// Wraps an existing session, which must be an EC one.
    pub fn from_session(session: OemSession<IF>) -> OemResult<Self, IF> {
        match session.variant() {
            Variant::Ec => Ok(EcOem { session }),
            found => Err(OemError::Config(ConfigError::VariantMismatch {
                expected: Variant::Ec,
                found,
            })),
        }
    }

    pub fn into_session(self) -> OemSession<IF> {
        self.session
    }

    /// Probe cell constant K (e.g. 0.1, 1.0, 10.0).
    pub fn get_probe_constant(&mut self) -> OemResult<f64, IF> {
        self.session.read_scaled(Field::ProbeTypeMsb, PROBE_CONSTANT_SCALE)
    }

    pub fn set_probe_constant(&mut self, k: f64) -> OemResult<(), IF> {
        self.session.warn_if_hibernating("probe constant write");
        self.session.write_scaled(Field::ProbeTypeMsb, k, PROBE_CONSTANT_SCALE)
    }

    /// Total dissolved solids in ppm, derived by the device from the last reading.
    pub fn get_tds(&mut self) -> OemResult<f64, IF> {
        self.session.read_scaled(Field::TdsMsb, DERIVED_READING_SCALE)
    }

    /// Salinity in PSU, derived by the device from the last reading.
    pub fn get_salinity(&mut self) -> OemResult<f64, IF> {
        self.session.read_scaled(Field::SalinityMsb, DERIVED_READING_SCALE)
    }
}

impl<IF> Deref for EcOem<IF>
where
    IF: OemBus + OemTimer,
{
    type Target = OemSession<IF>;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl<IF> DerefMut for EcOem<IF>
where
    IF: OemBus + OemTimer,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.session
    }
}
