// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod calibration;
pub mod codec;
pub mod config;
pub mod error;
pub mod hal_traits;
pub mod registers;
pub mod timing;
pub mod types;
pub mod variant;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::OemAddr;

// From calibration.rs
pub use calibration::{CalibrationPoint, CalibrationState, CalibrationStatus, CLEAR_CALIBRATION_CODE};

// From codec.rs
pub use codec::{decode_fixed_point, encode_fixed_point, hex_digits, RegisterBlock, MAX_FIELD_WIDTH};

// From config.rs
pub use config::{OemConfig, DEFAULT_BUS};

// From error.rs
pub use error::{CodecError, ConfigError, OemError};

// From hal_traits.rs
pub use hal_traits::{OemBus, OemTimer}; // Core sync traits

// From registers.rs
pub use registers::{field_offset, field_offset_by_name, Field, RegisterMap, EC_REGISTERS, PH_REGISTERS};

// From timing.rs
pub use timing::Timeouts;

// From types.rs
pub use types::{DeviceInfo, InterruptMode, PowerState, RegisterDump, RegisterValue};

// From variant.rs
pub use variant::Variant;

// --- Feature-gated re-exports ---

// embedded-hal adapter (from hal_traits.rs)
#[cfg(feature = "impl-generic-hal")]
pub use hal_traits::{GenericHalInterface, HalBusError};
