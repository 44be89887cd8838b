//! RP2040-specific HAL for the Tiltguard firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `tiltguard-hal` traits, plus RP2040-specific functionality:
//!
//! - I2C pin/clock validation and controller selection
//! - Peripheral claim tracking (bus controllers and GPIO lines)
//! - Timeout-bounded async I2C adapter (implements `tiltguard_hal::I2cBus`)
//! - GPIO output adapter (implements `tiltguard_hal::OutputPin`)

#![no_std]

pub mod claims;
#[cfg(feature = "embassy")]
pub mod gpio;
pub mod i2c;

pub use claims::PeripheralClaims;
pub use i2c::{configure, I2cController};
#[cfg(feature = "embassy")]
pub use i2c::TimedI2c;

// Re-export shared traits from tiltguard-hal for convenience
pub use tiltguard_hal::{BusError, I2cBus, I2cConfig, OutputPin};
