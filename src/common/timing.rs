// src/common/timing.rs

use core::time::Duration;

// The circuits need settling time between steps. Polling faster returns
// stale or undefined data and writes right after a wake are dropped.

/// Wait after a request before reading its confirmation.
pub const DEFAULT_SHORT_TIMEOUT: Duration = Duration::from_millis(300);
/// Wait before a measurement read and after waking the device.
pub const DEFAULT_LONG_TIMEOUT: Duration = Duration::from_millis(1500);

/// The two settle delays used by a session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Timeouts {
    /// Post-write confirmation settling.
    pub short: Duration,
    /// Measurement and wake settling.
    pub long: Duration,
}

impl Timeouts {
    pub const fn new(short: Duration, long: Duration) -> Self {
        Timeouts { short, long }
    }

    pub fn short_ms(&self) -> u32 {
        duration_to_ms(self.short)
    }

    pub fn long_ms(&self) -> u32 {
        duration_to_ms(self.long)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts::new(DEFAULT_SHORT_TIMEOUT, DEFAULT_LONG_TIMEOUT)
    }
}

/// Whole milliseconds, saturating at `u32::MAX`.
fn duration_to_ms(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
