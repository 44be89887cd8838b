//! Tiltguard Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs. The sensor driver and the posture monitor only
//! ever see these traits, so both can be exercised on the host against
//! scripted mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (tiltguard-firmware)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tiltguard-drivers / tiltguard-core     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tiltguard-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ tiltguard-hal-  │
//!            │     rp2040      │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - Addressed register transactions on a two-wire bus
//! - [`gpio::OutputPin`] - Digital output driving the actuator

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use i2c::{BusError, I2cBus, I2cConfig};
