//! MPU-6050 accelerometer
//!
//! Only the accelerometer is used. The tilt angle is the angle between the
//! measured gravity vector and the device Z axis:
//!
//! ```text
//! angle = atan2(sqrt(x² + y²), z)    in degrees, 0..=180
//! ```
//!
//! The magnitude form has no sign: leaning forward and leaning back by the
//! same amount give the same angle.

mod driver;
pub mod registers;

use core::fmt;

use tiltguard_core::config::AccelRange;
use tiltguard_hal::BusError;

pub use driver::{Mpu6050, PING_ATTEMPTS, PING_RETRY_DELAY_MS};

/// Why a sample could not be turned into an angle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadFailure {
    /// Burst read failed on the bus
    Bus(BusError),
    /// All three axes read zero; no gravity direction to measure against
    DegenerateSample,
}

impl fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadFailure::Bus(e) => write!(f, "bus: {}", e),
            ReadFailure::DegenerateSample => f.write_str("all axes zero"),
        }
    }
}

/// MPU-6050 driver error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// No acknowledgement after every ping attempt
    DeviceNotResponding,
    /// A bring-up register write failed
    RegisterWriteFailed { register: u8, cause: BusError },
    /// A sample read failed
    ReadFailed(ReadFailure),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::DeviceNotResponding => f.write_str("device not responding"),
            DriverError::RegisterWriteFailed { register, cause } => {
                write!(f, "write to register 0x{:02X} failed: {}", register, cause)
            }
            DriverError::ReadFailed(cause) => write!(f, "read failed: {}", cause),
        }
    }
}

impl From<ReadFailure> for DriverError {
    fn from(e: ReadFailure) -> Self {
        DriverError::ReadFailed(e)
    }
}

/// One accelerometer sample in raw counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawAxes {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl RawAxes {
    /// Decode the six bytes starting at ACCEL_XOUT_H
    pub fn from_be_bytes(buf: &[u8; registers::ACCEL_SAMPLE_LEN]) -> Self {
        Self {
            x: i16::from_be_bytes([buf[0], buf[1]]),
            y: i16::from_be_bytes([buf[2], buf[3]]),
            z: i16::from_be_bytes([buf[4], buf[5]]),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0 && self.z == 0
    }

    /// Convert to g using the sensitivity of `range`
    pub fn to_g(&self, range: AccelRange) -> [f32; 3] {
        let lsb = range.lsb_per_g();
        [
            self.x as f32 / lsb,
            self.y as f32 / lsb,
            self.z as f32 / lsb,
        ]
    }
}

/// Tilt from vertical in degrees
///
/// Fails only for an all-zero sample, which would otherwise come out as a
/// confident 0°.
pub fn tilt_from_raw(raw: RawAxes, range: AccelRange) -> Result<f32, ReadFailure> {
    if raw.is_zero() {
        return Err(ReadFailure::DegenerateSample);
    }

    let [x, y, z] = raw.to_g(range);
    let horizontal = libm::sqrtf(x * x + y * y);
    let angle = libm::atan2f(horizontal, z).to_degrees();

    // f32 pi rounds up; keep the documented range
    Ok(angle.clamp(0.0, 180.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RANGES: [AccelRange; 4] = [AccelRange::G2, AccelRange::G4, AccelRange::G8, AccelRange::G16];

    fn raw(x: i16, y: i16, z: i16) -> RawAxes {
        RawAxes { x, y, z }
    }

    fn close(a: f64, b: f64) -> bool {
        let d = a - b;
        d > -1e-3 && d < 1e-3
    }

    #[test]
    fn test_decode_big_endian() {
        let buf = [0x01, 0x02, 0xFF, 0xFE, 0x40, 0x00];
        assert_eq!(RawAxes::from_be_bytes(&buf), raw(0x0102, -2, 16384));
    }

    #[test]
    fn test_upright_and_inverted() {
        let up = tilt_from_raw(raw(0, 0, 16384), AccelRange::G2).unwrap();
        let down = tilt_from_raw(raw(0, 0, -16384), AccelRange::G2).unwrap();

        assert!(close(up as f64, 0.0));
        assert!(close(down as f64, 180.0));
    }

    #[test]
    fn test_horizontal_is_ninety() {
        let angle = tilt_from_raw(raw(16384, 0, 0), AccelRange::G2).unwrap();
        assert!(close(angle as f64, 90.0));

        let angle = tilt_from_raw(raw(0, -8192, 0), AccelRange::G4).unwrap();
        assert!(close(angle as f64, 90.0));
    }

    #[test]
    fn test_forty_five_degrees() {
        let angle = tilt_from_raw(raw(0, 10000, 10000), AccelRange::G2).unwrap();
        assert!(close(angle as f64, 45.0));
    }

    #[test]
    fn test_degenerate_sample_rejected() {
        for range in RANGES {
            assert_eq!(tilt_from_raw(raw(0, 0, 0), range), Err(ReadFailure::DegenerateSample));
        }
    }

    #[test]
    fn test_scale_follows_range() {
        let sample = raw(2048, 0, -4096);

        assert_eq!(sample.to_g(AccelRange::G2), [0.125, 0.0, -0.25]);
        assert_eq!(sample.to_g(AccelRange::G16), [1.0, 0.0, -2.0]);
    }

    #[test]
    fn test_error_display() {
        use core::fmt::Write;

        let mut s: heapless::String<64> = heapless::String::new();
        write!(
            s,
            "{}",
            DriverError::RegisterWriteFailed {
                register: registers::ACCEL_CONFIG,
                cause: BusError::NoAck,
            }
        )
        .unwrap();
        assert_eq!(s.as_str(), "write to register 0x1C failed: device did not acknowledge");
    }

    proptest! {
        #[test]
        fn prop_angle_in_range(x: i16, y: i16, z: i16, idx in 0usize..4) {
            prop_assume!(x != 0 || y != 0 || z != 0);
            let angle = tilt_from_raw(raw(x, y, z), RANGES[idx]).unwrap();
            prop_assert!(angle.is_finite());
            prop_assert!((0.0..=180.0).contains(&angle));
        }

        #[test]
        fn prop_matches_reference_formula(x: i16, y: i16, z: i16) {
            prop_assume!(x != 0 || y != 0 || z != 0);
            let angle = tilt_from_raw(raw(x, y, z), AccelRange::G2).unwrap() as f64;

            let (xg, yg, zg) = (x as f64 / 16384.0, y as f64 / 16384.0, z as f64 / 16384.0);
            let expected = libm::atan2(libm::sqrt(xg * xg + yg * yg), zg).to_degrees();
            prop_assert!(close(angle, expected));
        }

        #[test]
        fn prop_angle_independent_of_range(x: i16, y: i16, z: i16) {
            prop_assume!(x != 0 || y != 0 || z != 0);
            let a = tilt_from_raw(raw(x, y, z), AccelRange::G2).unwrap();
            let b = tilt_from_raw(raw(x, y, z), AccelRange::G16).unwrap();
            prop_assert!(close(a as f64, b as f64));
        }
    }
}
