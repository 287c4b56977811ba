// src/session/ph.rs

use super::{OemResult, OemSession};
use crate::common::{
    address::OemAddr,
    config::OemConfig,
    error::{ConfigError, OemError},
    hal_traits::{OemBus, OemTimer},
    variant::Variant,
};
use core::ops::{Deref, DerefMut};

/// pH circuit driver.
#[derive(Debug)]
pub struct PhOem<IF>
where
    IF: OemBus + OemTimer,
{
    session: OemSession<IF>,
}

impl<IF> PhOem<IF>
where
    IF: OemBus + OemTimer,
{
    pub fn new(interface: IF, address: OemAddr, config: OemConfig) -> Self {
        PhOem {
            session: OemSession::new(interface, address, Variant::Ph, config),
        }
    }

    /// Wraps an existing session, which must be a pH one.
    pub fn from_session(session: OemSession<IF>) -> OemResult<Self, IF> {
        match session.variant() {
            Variant::Ph => Ok(PhOem { session }),
            found => Err(OemError::Config(ConfigError::VariantMismatch {
                expected: Variant::Ph,
                found,
            })),
        }
    }

    pub fn into_session(self) -> OemSession<IF> {
        self.session
    }

    /// Probe slope. The OEM register map has no slope register.
    pub fn get_slope(&mut self) -> OemResult<f64, IF> {
        Err(OemError::NotImplemented("pH probe slope read"))
    }
}

impl<IF> Deref for PhOem<IF>
where
    IF: OemBus + OemTimer,
{
    type Target = OemSession<IF>;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl<IF> DerefMut for PhOem<IF>
where
    IF: OemBus + OemTimer,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.session
    }
}
