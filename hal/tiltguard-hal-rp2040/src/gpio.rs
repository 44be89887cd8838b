//! GPIO output adapter
//!
//! Wraps an embassy-rp output so the actuator driver can stay generic
//! over `tiltguard_hal::OutputPin`.

use embassy_rp::gpio::Output;
use tiltguard_hal::OutputPin;

/// Push-pull output pin
pub struct RpOutput<'d> {
    pin: Output<'d>,
}

impl<'d> RpOutput<'d> {
    /// Wrap an already configured output
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
