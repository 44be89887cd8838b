//! Hardware abstraction traits
//!
//! These traits define the interface between the posture logic
//! and the sensor/actuator implementations.

pub mod actuator;
pub mod sensor;

pub use actuator::Actuator;
pub use sensor::TiltSensor;
