// src/session/mod.rs

// Calibration sequence (impl block on OemSession)
mod calibration;

// Variant specializations
pub mod ec;
pub mod ph;

#[cfg(test)]
pub(crate) mod mock;

pub use ec::EcOem;
pub use ph::PhOem;

use crate::common::{
    address::OemAddr,
    calibration::CalibrationState,
    codec::{decode_fixed_point, encode_fixed_point, RegisterBlock, MAX_FIELD_WIDTH},
    config::OemConfig,
    error::{ConfigError, OemError},
    hal_traits::{OemBus, OemTimer},
    registers::{field_offset, Field},
    timing::Timeouts,
    types::{DeviceInfo, InterruptMode, PowerState, RegisterDump, RegisterValue},
    variant::Variant,
};

/// Compensation temperatures are stored in hundredths of a degree.
pub const TEMPERATURE_SCALE: f64 = 100.0;

/// Result of a session operation, carrying the interface's bus error.
pub type OemResult<T, IF> = Result<T, OemError<<IF as OemBus>::Error>>;

/// One protocol conversation with an EC or pH OEM circuit.
///
/// Every call blocks for the duration of its delays and bus transfers. The
/// session performs no locking: two sessions on the same physical address
/// must be serialized by the caller.
#[derive(Debug)]
pub struct OemSession<IF>
where
    IF: OemBus + OemTimer,
{
    interface: IF,
    address: OemAddr,
    variant: Variant,
    config: OemConfig,
    power_state: Option<PowerState>,
    calibration_state: CalibrationState,
}

impl<IF> OemSession<IF>
where
    IF: OemBus + OemTimer,
{
    pub fn new(interface: IF, address: OemAddr, variant: Variant, config: OemConfig) -> Self {
        OemSession {
            interface,
            address,
            variant,
            config,
            power_state: None,
            calibration_state: CalibrationState::Idle,
        }
    }

    /// Validates a raw address and a variant name ("EC"/"PH", any case), then opens the session.
    pub fn open(interface: IF, address: u8, variant: &str, config: OemConfig) -> OemResult<Self, IF> {
        let address = OemAddr::new(address)?;
        let variant = variant.parse::<Variant>()?;
        Ok(Self::new(interface, address, variant, config))
    }

    pub fn address(&self) -> OemAddr {
        self.address
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn config(&self) -> &OemConfig {
        &self.config
    }

    pub fn set_timeouts(&mut self, timeouts: Timeouts) {
        self.config.timeouts = timeouts;
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    /// Last power state written or read, `None` until one was observed.
    pub fn power_state(&self) -> Option<PowerState> {
        self.power_state
    }

    pub fn calibration_state(&self) -> CalibrationState {
        self.calibration_state
    }

    /// Destroys the session and returns the interface.
    pub fn release(self) -> IF {
        self.interface
    }

    // --- Register primitives ---

    /// Reads `byte_count` (1..=4) consecutive registers starting at `field`.
    pub fn read_register(&mut self, field: Field, byte_count: usize) -> OemResult<RegisterBlock, IF> {
        if !(1..=MAX_FIELD_WIDTH).contains(&byte_count) {
            return Err(ConfigError::InvalidByteCount(byte_count).into());
        }
        let register = field_offset(self.variant, field)?;
        let address = self.address.as_u8();

        let mut block = RegisterBlock::new();
        if byte_count > 1 {
            let mut buffer = [0u8; MAX_FIELD_WIDTH];
            self.interface
                .read_block(address, register, &mut buffer[..byte_count])
                .map_err(OemError::Transport)?;
            block.extend(buffer[..byte_count].iter().copied());
        } else {
            let byte = self
                .interface
                .read_byte(address, register)
                .map_err(OemError::Transport)?;
            block.push(byte);
        }

        if self.config.debug {
            debug!(
                "bus {} addr {:#x}: read {} byte(s) from {:?} ({:#x}): {:?}",
                self.config.bus,
                address,
                byte_count,
                field,
                register,
                block.as_slice()
            );
        }
        Ok(block)
    }

    /// Writes one byte with a single-register write, longer values with a block write.
    pub fn write_register(&mut self, field: Field, bytes: &[u8]) -> OemResult<(), IF> {
        if !(1..=MAX_FIELD_WIDTH).contains(&bytes.len()) {
            return Err(ConfigError::InvalidByteCount(bytes.len()).into());
        }
        let register = field_offset(self.variant, field)?;
        let address = self.address.as_u8();

        let written = match bytes {
            [byte] => self.interface.write_byte(address, register, *byte),
            _ => self.interface.write_block(address, register, bytes),
        };
        written.map_err(OemError::Transport)?;

        if self.config.debug {
            debug!(
                "bus {} addr {:#x}: wrote {:?} to {:?} ({:#x})",
                self.config.bus,
                address,
                bytes,
                field,
                register
            );
        }
        Ok(())
    }

    fn read_u8(&mut self, field: Field) -> OemResult<u8, IF> {
        let block = self.read_register(field, 1)?;
        Ok(block[0])
    }

    fn write_u8(&mut self, field: Field, value: u8) -> OemResult<(), IF> {
        self.write_register(field, &[value])
    }

    /// Reads the whole block at `field` and decodes it at `scale`.
    fn read_scaled(&mut self, field: Field, scale: f64) -> OemResult<f64, IF> {
        let block = self.read_register(field, field.width())?;
        let value = decode_fixed_point(&block, scale)?;
        if self.config.debug {
            debug!("{:?} decoded as {}", field, value);
        }
        Ok(value)
    }

    /// Encodes `value` at `scale` into the block at `field` and writes it.
    fn write_scaled(&mut self, field: Field, value: f64, scale: f64) -> OemResult<(), IF> {
        let bytes = encode_fixed_point(value, scale, field.width())?;
        self.write_register(field, &bytes)
    }

    fn settle_short(&mut self) {
        let ms = self.config.timeouts.short_ms();
        trace!("addr {:#x}: short settle {} ms", self.address.as_u8(), ms);
        self.interface.delay_ms(ms);
    }

    fn settle_long(&mut self) {
        let ms = self.config.timeouts.long_ms();
        trace!("addr {:#x}: long settle {} ms", self.address.as_u8(), ms);
        self.interface.delay_ms(ms);
    }

    /// Hibernating circuits silently drop configuration writes.
    fn warn_if_hibernating(&self, what: &'static str) {
        if self.power_state == Some(PowerState::Hibernating) {
            warn!("addr {:#x}: {} while the device is hibernating", self.address.as_u8(), what);
        }
    }

    // --- Device information ---

    /// Type code and firmware revision in one 2-byte read.
    pub fn get_device_info(&mut self) -> OemResult<DeviceInfo, IF> {
        let block = self.read_register(Field::DeviceType, 2)?;
        Ok(DeviceInfo {
            device_type: block[0],
            firmware: block[1],
        })
    }

    pub fn get_type(&mut self) -> OemResult<u8, IF> {
        self.read_u8(Field::DeviceType)
    }

    pub fn get_firmware(&mut self) -> OemResult<u8, IF> {
        self.read_u8(Field::DeviceFirmware)
    }

    // --- Readings ---

    pub fn get_new_reading_available(&mut self) -> OemResult<bool, IF> {
        Ok(self.read_u8(Field::DeviceNewReading)? != 0)
    }

    /// Clears the new-reading flag.
    pub fn acknowledge_new_reading(&mut self) -> OemResult<(), IF> {
        self.write_u8(Field::DeviceNewReading, 0x00)
    }

    /// Waits the long timeout, then reads the primary measurement
    /// (µS/cm for EC, pH units for pH).
    pub fn get_measurement(&mut self) -> OemResult<f64, IF> {
        self.warn_if_hibernating("measurement read");
        self.settle_long();
        let variant = self.variant;
        self.read_scaled(variant.measurement_field(), variant.measurement_scale())
    }

    /// Compensation temperature in °C currently stored on the device.
    pub fn get_compensation_temperature(&mut self) -> OemResult<f64, IF> {
        self.read_scaled(Field::TemperatureCompMsb, TEMPERATURE_SCALE)
    }

    /// Temperature in °C the device confirms it is compensating with.
    pub fn get_temperature_confirmation(&mut self) -> OemResult<f64, IF> {
        self.read_scaled(Field::TemperatureConfirmMsb, TEMPERATURE_SCALE)
    }

    /// Wakes the device, writes the compensation temperature in °C, and puts it back to sleep.
    pub fn set_compensation_temperature(&mut self, celsius: f64) -> OemResult<(), IF> {
        // Rejected before the device is woken
        let bytes = encode_fixed_point(celsius, TEMPERATURE_SCALE, Field::TemperatureCompMsb.width())?;
        self.wake()?;
        self.settle_long();
        self.settle_short();
        self.write_register(Field::TemperatureCompMsb, &bytes)?;
        self.hibernate()
    }

    // --- Power, LED, interrupt ---

    pub fn get_power_state(&mut self) -> OemResult<PowerState, IF> {
        let state = PowerState::from_u8(self.read_u8(Field::DeviceSleep)?);
        self.power_state = Some(state);
        Ok(state)
    }

    pub fn set_power_state(&mut self, state: PowerState) -> OemResult<(), IF> {
        self.write_u8(Field::DeviceSleep, state.as_u8())?;
        self.power_state = Some(state);
        Ok(())
    }

    pub fn wake(&mut self) -> OemResult<(), IF> {
        self.set_power_state(PowerState::Awake)
    }

    pub fn hibernate(&mut self) -> OemResult<(), IF> {
        self.set_power_state(PowerState::Hibernating)
    }

    pub fn get_led(&mut self) -> OemResult<bool, IF> {
        Ok(self.read_u8(Field::DeviceLed)? != 0)
    }

    pub fn set_led(&mut self, on: bool) -> OemResult<(), IF> {
        self.write_u8(Field::DeviceLed, u8::from(on))
    }

    pub fn get_interrupt_mode(&mut self) -> OemResult<InterruptMode, IF> {
        Ok(InterruptMode::from_u8(self.read_u8(Field::DeviceIntr)?))
    }

    pub fn set_interrupt_mode(&mut self, mode: InterruptMode) -> OemResult<(), IF> {
        self.write_u8(Field::DeviceIntr, mode.as_u8())
    }

    // --- Diagnostics ---

    /// Reads every register from 0x00 to the variant's highest offset, one byte at a time.
    pub fn dump_registers(&mut self) -> OemResult<RegisterDump, IF> {
        let address = self.address.as_u8();
        let last = self.variant.registers().max_offset();
        let mut dump = RegisterDump::new();
        for offset in 0..=last {
            let value = self
                .interface
                .read_byte(address, offset)
                .map_err(OemError::Transport)?;
            if self.config.debug {
                debug!("register {:#x} = {:#x}", offset, value);
            }
            if dump.push(RegisterValue { offset, value }).is_err() {
                break;
            }
        }
        Ok(dump)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::mock::{Event, MockBusError, MockInterface};
    use super::*;
    use crate::common::error::CodecError;

    extern crate std;
    use std::vec;

    fn session(variant: Variant) -> OemSession<MockInterface> {
        let address = match variant {
            Variant::Ec => OemAddr::EC,
            Variant::Ph => OemAddr::PH,
        };
        OemSession::new(MockInterface::new(), address, variant, OemConfig::default())
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        libm::fabs(a - b) < 1e-4
    }

    #[test]
    fn test_open_validates_inputs() {
        let s = OemSession::open(MockInterface::new(), 100, "ec", OemConfig::default()).unwrap();
        assert_eq!(s.address(), OemAddr::EC);
        assert_eq!(s.variant(), Variant::Ec);

        let err = OemSession::open(MockInterface::new(), 0x42, "EC", OemConfig::default()).unwrap_err();
        assert!(matches!(err, OemError::Config(ConfigError::InvalidAddress(0x42))));

        let err = OemSession::open(MockInterface::new(), 0x66, "ORP", OemConfig::default()).unwrap_err();
        assert!(matches!(err, OemError::Config(ConfigError::UnsupportedVariant)));
    }

    #[test]
    fn test_ec_measurement_waits_then_reads_block() {
        let mut s = session(Variant::Ec);
        s.interface.stage_read(&[0x00, 0x00, 0x05, 0x85]);
        let value = s.get_measurement().unwrap();
        assert!(approx_eq(value, 14.13));
        assert_eq!(
            s.interface.events,
            vec![Event::Delay(1500), Event::ReadBlock { register: 0x18, len: 4 }]
        );
        assert_eq!(s.interface.addresses, vec![0x64]);
    }

    #[test]
    fn test_adjacent_high_ec_readings_stay_distinct() {
        let mut s = session(Variant::Ec);
        s.interface.stage_read(&[0x01, 0x31, 0x2D, 0x01]).stage_read(&[0x01, 0x31, 0x2D, 0x02]);
        assert_eq!(s.get_measurement().unwrap(), 200000.01);
        assert_eq!(s.get_measurement().unwrap(), 200000.02);
    }

    #[test]
    fn test_ph_measurement_uses_thousandths() {
        let mut s = session(Variant::Ph);
        s.interface.stage_read(&[0x00, 0x00, 0x18, 0x56]); // 6230
        let value = s.get_measurement().unwrap();
        assert!(approx_eq(value, 6.23));
        assert_eq!(s.interface.bus_events(), vec![Event::ReadBlock { register: 0x16, len: 4 }]);
    }

    #[test]
    fn test_measurement_honours_custom_timeouts() {
        let mut s = session(Variant::Ph);
        s.set_timeouts(Timeouts::new(
            core::time::Duration::from_millis(5),
            core::time::Duration::from_millis(50),
        ));
        s.interface.stage_read(&[0, 0, 0, 0]);
        s.get_measurement().unwrap();
        assert_eq!(s.interface.total_delay_ms(), 50);
    }

    #[test]
    fn test_device_info_single_read() {
        let mut s = session(Variant::Ec);
        s.interface.stage_read(&[0x04, 0x05]);
        let info = s.get_device_info().unwrap();
        assert_eq!(info, DeviceInfo { device_type: 4, firmware: 5 });
        assert_eq!(info.variant(), Some(Variant::Ec));
        assert_eq!(s.interface.events, vec![Event::ReadBlock { register: 0x00, len: 2 }]);
    }

    #[test]
    fn test_type_and_firmware_are_byte_reads() {
        let mut s = session(Variant::Ph);
        s.interface.stage_read(&[0x01]).stage_read(&[0x05]);
        assert_eq!(s.get_type().unwrap(), 1);
        assert_eq!(s.get_firmware().unwrap(), 5);
        assert_eq!(
            s.interface.events,
            vec![Event::ReadByte { register: 0x00 }, Event::ReadByte { register: 0x01 }]
        );
    }

    #[test]
    fn test_new_reading_flag() {
        let mut s = session(Variant::Ec);
        s.interface.stage_read(&[0x01]).stage_read(&[0x00]);
        assert!(s.get_new_reading_available().unwrap());
        assert!(!s.get_new_reading_available().unwrap());
        s.acknowledge_new_reading().unwrap();
        assert_eq!(
            s.interface.events.last(),
            Some(&Event::WriteByte { register: 0x07, byte: 0x00 })
        );
    }

    #[test]
    fn test_compensation_temperature_read() {
        let mut s = session(Variant::Ph);
        s.interface.stage_read(&[0x00, 0x00, 0x09, 0xC4]);
        assert!(approx_eq(s.get_compensation_temperature().unwrap(), 25.0));
        assert_eq!(s.interface.events, vec![Event::ReadBlock { register: 0x0E, len: 4 }]);

        let mut s = session(Variant::Ec);
        s.interface.stage_read(&[0x00, 0x00, 0x08, 0x98]); // 2200
        assert!(approx_eq(s.get_temperature_confirmation().unwrap(), 22.0));
        assert_eq!(s.interface.events, vec![Event::ReadBlock { register: 0x14, len: 4 }]);
    }

    #[test]
    fn test_set_temperature_wakes_writes_and_sleeps() {
        let mut s = session(Variant::Ph);
        s.set_compensation_temperature(25.0).unwrap();
        assert_eq!(
            s.interface.events,
            vec![
                Event::WriteByte { register: 0x06, byte: 0x01 },
                Event::Delay(1500),
                Event::Delay(300),
                Event::WriteBlock { register: 0x0E, bytes: vec![0x00, 0x00, 0x09, 0xC4] },
                Event::WriteByte { register: 0x06, byte: 0x00 },
            ]
        );
        assert_eq!(s.power_state(), Some(PowerState::Hibernating));
    }

    #[test]
    fn test_set_temperature_overflow_touches_nothing() {
        let mut s = session(Variant::Ec);
        let err = s.set_compensation_temperature(-5.0).unwrap_err();
        assert!(matches!(err, OemError::Codec(CodecError::EncodingOverflow { width: 4 })));
        assert!(s.interface.events.is_empty());
        assert_eq!(s.power_state(), None);
    }

    #[test]
    fn test_transport_error_propagates_immediately() {
        let mut s = session(Variant::Ph);
        s.interface.fail_on_call(0);
        let err = s.set_compensation_temperature(25.0).unwrap_err();
        assert!(matches!(err, OemError::Transport(MockBusError)));
        // No retry, no settle delays after the failed wake
        assert_eq!(s.interface.events, vec![Event::WriteByte { register: 0x06, byte: 0x01 }]);
        assert_eq!(s.power_state(), None);
    }

    #[test]
    fn test_read_register_byte_counts() {
        let mut s = session(Variant::Ec);
        s.interface.stage_read(&[0x01, 0x02, 0x03]);
        let block = s.read_register(Field::EcMsb, 3).unwrap();
        assert_eq!(block.as_slice(), &[0x01, 0x02, 0x03]);

        assert!(matches!(
            s.read_register(Field::EcMsb, 0),
            Err(OemError::Config(ConfigError::InvalidByteCount(0)))
        ));
        assert!(matches!(
            s.read_register(Field::EcMsb, 5),
            Err(OemError::Config(ConfigError::InvalidByteCount(5)))
        ));
        assert_eq!(s.interface.bus_events().len(), 1);
    }

    #[test]
    fn test_field_from_other_variant_rejected_before_io() {
        let mut s = session(Variant::Ph);
        let err = s.read_register(Field::EcMsb, 4).unwrap_err();
        assert!(matches!(
            err,
            OemError::Config(ConfigError::FieldNotInMap { field: Field::EcMsb, variant: Variant::Ph })
        ));
        assert!(s.write_register(Field::ProbeTypeMsb, &[0x00, 0x64]).is_err());
        assert!(s.interface.events.is_empty());
    }

    #[test]
    fn test_write_register_dispatch() {
        let mut s = session(Variant::Ec);
        s.write_register(Field::DeviceLed, &[0x01]).unwrap();
        s.write_register(Field::ProbeTypeMsb, &[0x00, 0x64]).unwrap();
        assert!(s.write_register(Field::DeviceLed, &[]).unwrap_err().is_config());
        assert_eq!(
            s.interface.events,
            vec![
                Event::WriteByte { register: 0x05, byte: 0x01 },
                Event::WriteBlock { register: 0x08, bytes: vec![0x00, 0x64] },
            ]
        );
    }

    #[test]
    fn test_power_state_tracking() {
        let mut s = session(Variant::Ec);
        assert_eq!(s.power_state(), None);
        s.interface.stage_read(&[0x01]);
        assert_eq!(s.get_power_state().unwrap(), PowerState::Awake);
        assert_eq!(s.power_state(), Some(PowerState::Awake));
        s.hibernate().unwrap();
        assert_eq!(s.power_state(), Some(PowerState::Hibernating));
        s.wake().unwrap();
        assert_eq!(s.power_state(), Some(PowerState::Awake));
    }

    #[test]
    fn test_led_and_interrupt_registers() {
        let mut s = session(Variant::Ph);
        s.set_led(false).unwrap();
        s.set_interrupt_mode(InterruptMode::ChangeOnReading).unwrap();
        s.interface.stage_read(&[0x01]).stage_read(&[0x04]);
        assert!(s.get_led().unwrap());
        assert_eq!(s.get_interrupt_mode().unwrap(), InterruptMode::LowOnReading);
        assert_eq!(
            s.interface.events,
            vec![
                Event::WriteByte { register: 0x05, byte: 0x00 },
                Event::WriteByte { register: 0x04, byte: 0x08 },
                Event::ReadByte { register: 0x05 },
                Event::ReadByte { register: 0x04 },
            ]
        );
    }

    #[test]
    fn test_dump_registers_covers_map() {
        let mut s = session(Variant::Ph);
        for offset in 0..=0x19u8 {
            s.interface.stage_read(&[offset ^ 0xA5]);
        }
        let dump = s.dump_registers().unwrap();
        assert_eq!(dump.len(), 26);
        assert_eq!(dump[0], RegisterValue { offset: 0x00, value: 0xA5 });
        assert_eq!(dump[0x19], RegisterValue { offset: 0x19, value: 0x19 ^ 0xA5 });
    }

    #[test]
    fn test_release_returns_interface() {
        let mut s = session(Variant::Ec);
        s.acknowledge_new_reading().unwrap();
        let interface = s.release();
        assert_eq!(interface.events.len(), 1);
    }
}
