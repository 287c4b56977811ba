// src/common/config.rs

use super::timing::Timeouts;
use core::time::Duration;

/// The I2C bus most single-board computers expose by default.
pub const DEFAULT_BUS: u8 = 1;

/// Per-session settings.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct OemConfig {
    /// Bus number, only used to label diagnostics.
    pub bus: u8,
    pub timeouts: Timeouts,
    /// Emit register-level traces for every transfer.
    pub debug: bool,
}

impl OemConfig {
    pub const fn with_bus(mut self, bus: u8) -> Self {
        self.bus = bus;
        self
    }

    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub const fn with_short_timeout(mut self, short: Duration) -> Self {
        self.timeouts.short = short;
        self
    }

    pub const fn with_long_timeout(mut self, long: Duration) -> Self {
        self.timeouts.long = long;
        self
    }

    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl Default for OemConfig {
    fn default() -> Self {
        OemConfig {
            bus: DEFAULT_BUS,
            timeouts: Timeouts::default(),
            debug: false,
        }
    }
}
