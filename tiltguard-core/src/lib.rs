//! Board-agnostic core logic for the posture sentinel firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Sensor and actuator traits
//! - Posture monitor (debounce counter, angle snapshot, recovery policy)
//! - Report types handed to the status and network collaborators
//! - Configuration type definitions and the config file parser

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod monitor;
pub mod report;
pub mod traits;
