//! I2C bus abstractions
//!
//! Provides the addressed read/write operations the sensor driver needs.
//! Implementations own the peripheral exclusively; nothing here arbitrates
//! between multiple bus users.

use core::fmt;
use core::future::Future;

/// Errors from bus configuration and transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Addressed device did not acknowledge
    NoAck,
    /// Transaction exceeded the per-attempt wait
    Timeout,
    /// Pins or clock are not valid for the platform
    ConfigError,
    /// Peripheral could not be claimed (already owned)
    DriverInstallError,
    /// Arbitration loss, overrun or another controller fault
    Bus,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            BusError::NoAck => "device did not acknowledge",
            BusError::Timeout => "bus transaction timed out",
            BusError::ConfigError => "invalid bus pins or clock",
            BusError::DriverInstallError => "bus peripheral already claimed",
            BusError::Bus => "bus fault",
        };
        f.write_str(msg)
    }
}

/// I2C bus master
///
/// Provides the two transaction shapes used against register-addressed
/// devices. Each call is one bounded attempt; retry policy belongs to the
/// device driver.
pub trait I2cBus {
    /// Write data to a device at the given address
    ///
    /// An empty `data` slice is a valid address-only probe.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> impl Future<Output = Result<(), BusError>>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// Sets the register pointer and burst-reads without releasing the bus,
    /// so no other transaction can interleave.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> impl Future<Output = Result<(), BusError>>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    fn write(&mut self, address: u8, data: &[u8]) -> impl Future<Output = Result<(), BusError>> {
        (**self).write(address, data)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> impl Future<Output = Result<(), BusError>> {
        (**self).write_read(address, write_data, read_buf)
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Upper bound on a single transaction in milliseconds
    pub timeout_ms: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::FAST
    }
}

impl I2cConfig {
    /// Default per-attempt transaction bound
    pub const DEFAULT_TIMEOUT_MS: u32 = 100;

    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self {
        frequency: 100_000,
        timeout_ms: Self::DEFAULT_TIMEOUT_MS,
    };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self {
        frequency: 400_000,
        timeout_ms: Self::DEFAULT_TIMEOUT_MS,
    };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
        timeout_ms: Self::DEFAULT_TIMEOUT_MS,
    };
}
