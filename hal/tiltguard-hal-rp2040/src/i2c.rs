//! I2C bring-up for RP2040
//!
//! Every GPIO on the RP2040 can carry one I2C line. The function repeats
//! every four pins: `4n` is I2C0 SDA, `4n+1` I2C0 SCL, `4n+2` I2C1 SDA and
//! `4n+3` I2C1 SCL. [`configure`] checks that a requested pin pair lands on
//! one controller with the right roles before any peripheral is touched.

use tiltguard_hal::{BusError, I2cConfig};

use crate::claims::{PeripheralClaims, GPIO_COUNT};

/// Highest clock the RP2040 I2C block supports (Fast-mode Plus)
pub const MAX_FREQUENCY_HZ: u32 = 1_000_000;

/// RP2040 I2C controller instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cController {
    I2c0,
    I2c1,
}

impl I2cController {
    pub(crate) fn bit(self) -> u8 {
        match self {
            I2cController::I2c0 => 0b01,
            I2cController::I2c1 => 0b10,
        }
    }
}

/// Role a GPIO takes when muxed to I2C
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cLine {
    Sda,
    Scl,
}

/// Look up the I2C function of a GPIO
pub fn pin_function(pin: u8) -> Option<(I2cController, I2cLine)> {
    if pin >= GPIO_COUNT as u8 {
        return None;
    }

    let controller = if (pin / 2) % 2 == 0 {
        I2cController::I2c0
    } else {
        I2cController::I2c1
    };
    let line = if pin % 2 == 0 {
        I2cLine::Sda
    } else {
        I2cLine::Scl
    };

    Some((controller, line))
}

/// Validate a bus request and claim its controller and pins
///
/// Fails with [`BusError::ConfigError`] if the pins are not an SDA/SCL pair
/// on one controller or the clock is out of range, and with
/// [`BusError::DriverInstallError`] if the controller or either pin is
/// already owned. Nothing is claimed on failure.
pub fn configure(
    sda: u8,
    scl: u8,
    config: &I2cConfig,
    claims: &mut PeripheralClaims,
) -> Result<I2cController, BusError> {
    if config.frequency == 0 || config.frequency > MAX_FREQUENCY_HZ || config.timeout_ms == 0 {
        return Err(BusError::ConfigError);
    }

    let controller = match (pin_function(sda), pin_function(scl)) {
        (Some((sda_ctrl, I2cLine::Sda)), Some((scl_ctrl, I2cLine::Scl))) if sda_ctrl == scl_ctrl => {
            sda_ctrl
        }
        _ => return Err(BusError::ConfigError),
    };

    if claims.is_controller_claimed(controller)
        || claims.is_pin_claimed(sda)
        || claims.is_pin_claimed(scl)
    {
        return Err(BusError::DriverInstallError);
    }

    claims
        .claim_controller(controller)
        .and_then(|_| claims.claim_pin(sda))
        .and_then(|_| claims.claim_pin(scl))
        .map_err(|_| BusError::DriverInstallError)?;

    Ok(controller)
}

#[cfg(feature = "embassy")]
pub use timed::TimedI2c;

#[cfg(feature = "embassy")]
mod timed {
    use embassy_time::{with_timeout, Duration};
    use embedded_hal::i2c::ErrorKind;
    use tiltguard_hal::{BusError, I2cBus, I2cConfig};

    /// Async I2C master with a bounded wait per transaction
    ///
    /// Wraps any `embedded-hal-async` bus (embassy-rp's async I2C in the
    /// firmware) and turns a stuck transaction into [`BusError::Timeout`].
    pub struct TimedI2c<I> {
        inner: I,
        timeout: Duration,
    }

    impl<I> TimedI2c<I> {
        /// Wrap a bus using the timeout from `config`
        pub fn new(inner: I, config: &I2cConfig) -> Self {
            Self {
                inner,
                timeout: Duration::from_millis(config.timeout_ms as u64),
            }
        }
    }

    fn map_error<E: embedded_hal::i2c::Error>(e: E) -> BusError {
        match e.kind() {
            ErrorKind::NoAcknowledge(_) => BusError::NoAck,
            _ => BusError::Bus,
        }
    }

    impl<I: embedded_hal_async::i2c::I2c> I2cBus for TimedI2c<I> {
        async fn write(&mut self, address: u8, data: &[u8]) -> Result<(), BusError> {
            match with_timeout(self.timeout, self.inner.write(address, data)).await {
                Ok(result) => result.map_err(map_error),
                Err(_) => Err(BusError::Timeout),
            }
        }

        async fn write_read(
            &mut self,
            address: u8,
            write_data: &[u8],
            read_buf: &mut [u8],
        ) -> Result<(), BusError> {
            match with_timeout(
                self.timeout,
                self.inner.write_read(address, write_data, read_buf),
            )
            .await
            {
                Ok(result) => result.map_err(map_error),
                Err(_) => Err(BusError::Timeout),
            }
        }
    }
}
