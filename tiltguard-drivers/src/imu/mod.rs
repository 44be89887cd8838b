//! Inertial measurement unit drivers

pub mod mpu6050;

pub use mpu6050::{tilt_from_raw, DriverError, Mpu6050, RawAxes, ReadFailure};
