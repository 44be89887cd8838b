//! Tilt sensor trait

use core::future::Future;

/// Source of tilt angles
///
/// Implementations handle the specific device (MPU-6050 today) and
/// return the angle between the measured gravity vector and the device
/// Z axis, in degrees.
pub trait TiltSensor {
    /// Error returned by reads and recovery attempts
    type Error;

    /// Read one tilt angle in degrees
    ///
    /// A successful read is always finite and within [0, 180].
    fn read_tilt(&mut self) -> impl Future<Output = Result<f32, Self::Error>>;

    /// Re-run device bring-up after a run of failed reads
    ///
    /// Must reuse the full-scale configuration of the original bring-up so
    /// the conversion factor keeps matching the device registers.
    fn reinitialize(&mut self) -> impl Future<Output = Result<(), Self::Error>>;
}
