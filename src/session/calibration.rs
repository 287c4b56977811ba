// src/session/calibration.rs

use super::{OemResult, OemSession};
use crate::common::{
    calibration::{CalibrationPoint, CalibrationState, CalibrationStatus, CLEAR_CALIBRATION_CODE},
    codec::encode_fixed_point,
    error::OemError,
    hal_traits::{OemBus, OemTimer},
    registers::Field,
};

impl<IF> OemSession<IF>
where
    IF: OemBus + OemTimer,
{
    /// Writes the calibration solution value (µS for EC, pH units for pH).
    ///
    /// Has no effect on the stored calibration until a point is requested
    /// with [`apply_calibration`](Self::apply_calibration).
    pub fn stage_calibration_value(&mut self, value: f64) -> OemResult<(), IF> {
        let field = Field::CalibrationMsb;
        let bytes = encode_fixed_point(value, self.variant.measurement_scale(), field.width())?;
        self.warn_if_hibernating("calibration value write");
        self.write_register(field, &bytes)?;
        self.calibration_state = CalibrationState::ValueStaged;
        Ok(())
    }

    /// Stages `value`, requests `point`, and checks that the device processed it.
    ///
    /// Returns the confirmation code (always 0 on success). A non-zero code is
    /// reported as [`OemError::CalibrationNotConfirmed`] and never retried.
    pub fn apply_calibration(&mut self, value: f64, point: CalibrationPoint) -> OemResult<u8, IF> {
        // Both checks happen before the first bus write
        let code = point.request_code(self.variant)?;
        encode_fixed_point(value, self.variant.measurement_scale(), Field::CalibrationMsb.width())?;

        self.stage_calibration_value(value)?;
        self.settle_long();
        self.write_u8(Field::CalibrationRequest, code)?;
        self.calibration_state = CalibrationState::RequestSent;
        self.settle_short();
        self.confirm_calibration()
    }

    /// [`apply_calibration`](Self::apply_calibration) with the point given by name
    /// (`"dry"`, `"single"`, `"low"`, `"mid"` or `"high"`).
    pub fn apply_calibration_named(&mut self, value: f64, point: &str) -> OemResult<u8, IF> {
        let point = point.parse::<CalibrationPoint>()?;
        self.apply_calibration(value, point)
    }

    /// Wipes every stored calibration point and returns the confirmation code.
    ///
    /// A non-zero code comes back unmodified as
    /// `Err(OemError::CalibrationNotConfirmed(code))`.
    pub fn clear_calibration(&mut self) -> OemResult<u8, IF> {
        self.write_u8(Field::CalibrationRequest, CLEAR_CALIBRATION_CODE)?;
        self.calibration_state = CalibrationState::RequestSent;
        self.settle_short();
        self.confirm_calibration()
    }

    /// Which calibration points the device currently holds.
    pub fn get_calibration_status(&mut self) -> OemResult<CalibrationStatus, IF> {
        let bits = self.read_u8(Field::CalibrationConfirm)?;
        let status = CalibrationStatus::from_bits(self.variant, bits)
            .ok_or(OemError::UnknownCalibrationBitmask(bits))?;
        if self.config.debug {
            debug!("calibration status {:#x}: {}", bits, status.description());
        }
        Ok(status)
    }

    // The device resets the request register to 0 once it has processed a request.
    fn confirm_calibration(&mut self) -> OemResult<u8, IF> {
        let code = self.read_u8(Field::CalibrationRequest)?;
        if code == 0 {
            self.calibration_state = CalibrationState::Confirmed;
            Ok(code)
        } else {
            warn!("addr {:#x}: calibration request not confirmed, code {:#x}", self.address.as_u8(), code);
            self.calibration_state = CalibrationState::Failed(code);
            Err(OemError::CalibrationNotConfirmed(code))
        }
    }
}
