//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in tiltguard-core:
//!
//! - IMU drivers (MPU-6050 accelerometer over I2C)
//! - Actuator outputs (GPIO vibration motor)

#![no_std]
#![deny(unsafe_code)]

pub mod actuator;
pub mod imu;
