//! GPIO actuator output
//!
//! Vibration motor or buzzer switched through a transistor on one GPIO.

use tiltguard_core::config::PinConfig;
use tiltguard_core::traits::Actuator;
use tiltguard_hal::OutputPin;

/// Actuator on a single output line
///
/// Active-high by default; active-low wiring (P-channel switch, some
/// driver boards) is selected with `inverted`.
pub struct GpioActuator<P> {
    pin: P,
    /// Engaged = pin LOW
    inverted: bool,
    engaged: bool,
}

impl<P: OutputPin> GpioActuator<P> {
    /// Wrap a pin and drive it to the released level
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut actuator = Self {
            pin,
            inverted,
            engaged: false,
        };
        actuator.set_engaged(false);
        actuator
    }

    /// Use the polarity from a pin config
    pub fn from_config(pin: P, config: &PinConfig) -> Self {
        Self::new(pin, config.inverted)
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }
}

impl<P: OutputPin> Actuator for GpioActuator<P> {
    fn set_engaged(&mut self, engaged: bool) {
        self.engaged = engaged;
        self.pin.set_state(engaged != self.inverted);
    }

    fn is_engaged(&self) -> bool {
        self.engaged
    }
}
