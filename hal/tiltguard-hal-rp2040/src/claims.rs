//! Peripheral claim tracking
//!
//! Tracks which I2C controllers and GPIO lines are owned so that a second
//! bring-up of the same peripheral fails instead of silently sharing it.

use heapless::FnvIndexSet;

use crate::i2c::I2cController;

/// Maximum number of GPIO pins on RP2040
pub const GPIO_COUNT: usize = 30;

/// Claims held for the lifetime of the process
pub struct PeripheralClaims {
    /// Set of claimed GPIO pins
    pins: FnvIndexSet<u8, 32>,
    /// Bitmask of claimed I2C controllers
    controllers: u8,
}

impl Default for PeripheralClaims {
    fn default() -> Self {
        Self::new()
    }
}

impl PeripheralClaims {
    /// Create an empty claim table
    pub fn new() -> Self {
        Self {
            pins: FnvIndexSet::new(),
            controllers: 0,
        }
    }

    /// Claim a GPIO pin
    ///
    /// Returns `Err(())` if the pin does not exist or is already in use.
    #[allow(clippy::result_unit_err)]
    pub fn claim_pin(&mut self, pin: u8) -> Result<(), ()> {
        if pin >= GPIO_COUNT as u8 || self.pins.contains(&pin) {
            return Err(());
        }
        self.pins.insert(pin).map_err(|_| ())?;
        Ok(())
    }

    /// Claim an I2C controller
    ///
    /// Returns `Err(())` if the controller is already owned.
    #[allow(clippy::result_unit_err)]
    pub fn claim_controller(&mut self, controller: I2cController) -> Result<(), ()> {
        let bit = controller.bit();
        if self.controllers & bit != 0 {
            return Err(());
        }
        self.controllers |= bit;
        Ok(())
    }

    /// Check if a pin is claimed
    pub fn is_pin_claimed(&self, pin: u8) -> bool {
        self.pins.contains(&pin)
    }

    /// Check if a controller is claimed
    pub fn is_controller_claimed(&self, controller: I2cController) -> bool {
        self.controllers & controller.bit() != 0
    }
}
