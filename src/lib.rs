// src/lib.rs

#![no_std] // Specify no_std at the crate root

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

// Must come first so the logging macros are visible to every module below.
mod fmt;

pub mod common;
pub mod session;

// Re-export key types for convenience
pub use common::{OemAddr, OemConfig, OemError, Variant};
pub use session::{EcOem, OemSession, PhOem};
