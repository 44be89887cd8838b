//! MPU-6050 bring-up and sampling
//!
//! Bring-up is linear: the caller hands over a configured bus, the device
//! is pinged until it acknowledges, then the full-scale ranges are written
//! and the device is woken. A handle only exists once all of that worked.

use embedded_hal_async::delay::DelayNs;
use tiltguard_core::config::FullScaleConfig;
use tiltguard_core::traits::TiltSensor;
use tiltguard_hal::I2cBus;

use super::registers::{
    ACCEL_CONFIG, ACCEL_SAMPLE_LEN, ACCEL_XOUT_H, ADDRESS, GYRO_CONFIG, PWR_MGMT_1, USER_CTRL,
    WHO_AM_I,
};
use super::{tilt_from_raw, DriverError, RawAxes, ReadFailure};

/// Ping attempts before giving up on the device
pub const PING_ATTEMPTS: u8 = 5;

/// Pause between ping attempts (not after the last)
pub const PING_RETRY_DELAY_MS: u32 = 100;

/// MPU-6050 in the ready state
pub struct Mpu6050<B, D> {
    bus: B,
    delay: D,
    /// Ranges actually written to the device
    full_scale: FullScaleConfig,
}

impl<B: I2cBus, D: DelayNs> Mpu6050<B, D> {
    /// Ping and configure the device
    ///
    /// # Errors
    /// - [`DriverError::DeviceNotResponding`] if no ping was acknowledged;
    ///   no register has been written in that case
    /// - [`DriverError::RegisterWriteFailed`] for the first failed register
    ///   write; later writes are not attempted
    pub async fn initialize(bus: B, delay: D, full_scale: FullScaleConfig) -> Result<Self, DriverError> {
        let mut device = Self {
            bus,
            delay,
            full_scale,
        };
        device.bring_up().await?;
        Ok(device)
    }

    /// Run the bring-up sequence again with the original ranges
    pub async fn reinitialize(&mut self) -> Result<(), DriverError> {
        self.bring_up().await
    }

    async fn bring_up(&mut self) -> Result<(), DriverError> {
        self.ping().await?;

        let sequence = [
            (GYRO_CONFIG, self.full_scale.gyro.selector()),
            (ACCEL_CONFIG, self.full_scale.accel.selector()),
            // Clears SLEEP
            (PWR_MGMT_1, 0x00),
            (USER_CTRL, 0x00),
        ];
        for (register, value) in sequence {
            self.write_register(register, value).await?;
        }

        Ok(())
    }

    /// Address the device with the power register pointer and no payload
    async fn ping(&mut self) -> Result<(), DriverError> {
        for attempt in 1..=PING_ATTEMPTS {
            if self.bus.write(ADDRESS, &[PWR_MGMT_1]).await.is_ok() {
                return Ok(());
            }
            if attempt < PING_ATTEMPTS {
                self.delay.delay_ms(PING_RETRY_DELAY_MS).await;
            }
        }

        Err(DriverError::DeviceNotResponding)
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), DriverError> {
        self.bus
            .write(ADDRESS, &[register, value])
            .await
            .map_err(|cause| DriverError::RegisterWriteFailed { register, cause })
    }

    /// Burst-read one accelerometer sample
    pub async fn read_raw(&mut self) -> Result<RawAxes, DriverError> {
        let mut buf = [0u8; ACCEL_SAMPLE_LEN];
        self.bus
            .write_read(ADDRESS, &[ACCEL_XOUT_H], &mut buf)
            .await
            .map_err(ReadFailure::Bus)?;

        Ok(RawAxes::from_be_bytes(&buf))
    }

    /// Read one sample and convert it to a tilt angle in degrees
    pub async fn read_tilt(&mut self) -> Result<f32, DriverError> {
        let raw = self.read_raw().await?;
        Ok(tilt_from_raw(raw, self.full_scale.accel)?)
    }

    /// Read the identity register
    ///
    /// Clones answer with other values but are register-compatible, so the
    /// result is informational.
    pub async fn who_am_i(&mut self) -> Result<u8, DriverError> {
        let mut buf = [0u8; 1];
        self.bus
            .write_read(ADDRESS, &[WHO_AM_I], &mut buf)
            .await
            .map_err(ReadFailure::Bus)?;
        Ok(buf[0])
    }

    pub fn full_scale(&self) -> FullScaleConfig {
        self.full_scale
    }

    /// Give back the bus and delay
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }
}

impl<B: I2cBus, D: DelayNs> TiltSensor for Mpu6050<B, D> {
    type Error = DriverError;

    async fn read_tilt(&mut self) -> Result<f32, DriverError> {
        Mpu6050::read_tilt(self).await
    }

    async fn reinitialize(&mut self) -> Result<(), DriverError> {
        Mpu6050::reinitialize(self).await
    }
}
