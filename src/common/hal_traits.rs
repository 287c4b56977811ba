// src/common/hal_traits.rs

use core::fmt::Debug;

/// Abstraction for delay operations required between protocol steps.
///
/// Note: With the `impl-generic-hal` feature, [`GenericHalInterface`] provides
/// this on top of `embedded_hal::delay::DelayNs`.
pub trait OemTimer {
    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Register-addressed byte transport to a device on the bus.
///
/// Implementations own no protocol knowledge and perform no retries.
pub trait OemBus {
    /// Associated error type for bus faults, NACKs and timeouts.
    type Error: Debug;

    /// Reads `buffer.len()` consecutive registers starting at `register`.
    fn read_block(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Reads a single register.
    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, Self::Error>;

    /// Writes `bytes` to consecutive registers starting at `register`.
    fn write_block(&mut self, address: u8, register: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Writes a single register.
    fn write_byte(&mut self, address: u8, register: u8, byte: u8) -> Result<(), Self::Error>;
}

#[cfg(feature = "impl-generic-hal")]
pub use generic::{GenericHalInterface, HalBusError};

#[cfg(feature = "impl-generic-hal")]
mod generic {
    use super::{OemBus, OemTimer};
    use crate::common::codec::MAX_FIELD_WIDTH;
    use arrayvec::ArrayVec;
    use core::fmt::Debug;
    use embedded_hal::delay::DelayNs;
    use embedded_hal::i2c::I2c;

    /// Error of the embedded-hal adapter.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
    pub enum HalBusError<E: Debug> {
        /// The I2C peripheral reported an error.
        #[error("I2C error: {0:?}")]
        I2c(E),

        /// A block write longer than one register block.
        #[error("Write of {len} bytes exceeds one register block")]
        FrameTooLong { len: usize },
    }

    /// Bundles an `embedded_hal` I2C bus and delay into one session interface.
    #[derive(Debug)]
    pub struct GenericHalInterface<I2C, D> {
        i2c: I2C,
        delay: D,
    }

    impl<I2C, D> GenericHalInterface<I2C, D>
    where
        I2C: I2c,
        D: DelayNs,
    {
        pub fn new(i2c: I2C, delay: D) -> Self {
            GenericHalInterface { i2c, delay }
        }

        /// Destroys the interface and returns the bus and delay.
        pub fn release(self) -> (I2C, D) {
            (self.i2c, self.delay)
        }
    }

    impl<I2C, D> OemBus for GenericHalInterface<I2C, D>
    where
        I2C: I2c,
        D: DelayNs,
    {
        type Error = HalBusError<I2C::Error>;

        fn read_block(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
            self.i2c
                .write_read(address, &[register], buffer)
                .map_err(HalBusError::I2c)
        }

        fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
            let mut buffer = [0u8; 1];
            self.read_block(address, register, &mut buffer)?;
            Ok(buffer[0])
        }

        fn write_block(&mut self, address: u8, register: u8, bytes: &[u8]) -> Result<(), Self::Error> {
            let mut frame: ArrayVec<u8, { MAX_FIELD_WIDTH + 1 }> = ArrayVec::new();
            frame.push(register);
            frame
                .try_extend_from_slice(bytes)
                .map_err(|_| HalBusError::FrameTooLong { len: bytes.len() })?;
            self.i2c.write(address, &frame).map_err(HalBusError::I2c)
        }

        fn write_byte(&mut self, address: u8, register: u8, byte: u8) -> Result<(), Self::Error> {
            self.i2c
                .write(address, &[register, byte])
                .map_err(HalBusError::I2c)
        }
    }

    impl<I2C, D> OemTimer for GenericHalInterface<I2C, D>
    where
        I2C: I2c,
        D: DelayNs,
    {
        fn delay_ms(&mut self, ms: u32) {
            self.delay.delay_ms(ms);
        }
    }

}
