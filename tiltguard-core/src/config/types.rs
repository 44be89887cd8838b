//! Configuration type definitions
//!
//! Defaults reproduce the reference device: 20° threshold, 50 consecutive
//! bad samples, one sample per second, accelerometer at ±2 g.

use core::fmt;

use tiltguard_hal::I2cConfig;

/// Gyroscope full-scale range
///
/// Gyro data is not used for tilt, but the range is written during
/// bring-up so the device state is fully determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroRange {
    /// ±250 °/s
    #[default]
    Dps250,
    /// ±500 °/s
    Dps500,
    /// ±1000 °/s
    Dps1000,
    /// ±2000 °/s
    Dps2000,
}

impl GyroRange {
    /// Value for the FS_SEL field of the gyro config register
    pub const fn selector(self) -> u8 {
        match self {
            GyroRange::Dps250 => 0x00,
            GyroRange::Dps500 => 0x08,
            GyroRange::Dps1000 => 0x10,
            GyroRange::Dps2000 => 0x18,
        }
    }
}

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelRange {
    /// ±2 g
    #[default]
    G2,
    /// ±4 g
    G4,
    /// ±8 g
    G8,
    /// ±16 g
    G16,
}

impl AccelRange {
    /// Value for the AFS_SEL field of the accel config register
    pub const fn selector(self) -> u8 {
        match self {
            AccelRange::G2 => 0x00,
            AccelRange::G4 => 0x08,
            AccelRange::G8 => 0x10,
            AccelRange::G16 => 0x18,
        }
    }

    /// Sensitivity in LSB per g
    pub const fn lsb_per_g(self) -> f32 {
        match self {
            AccelRange::G2 => 16384.0,
            AccelRange::G4 => 8192.0,
            AccelRange::G8 => 4096.0,
            AccelRange::G16 => 2048.0,
        }
    }
}

/// Full-scale selection written once at bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FullScaleConfig {
    pub gyro: GyroRange,
    pub accel: AccelRange,
}

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }
}

/// Sensor bus wiring and timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Data line GPIO
    pub sda: u8,
    /// Clock line GPIO
    pub scl: u8,
    /// Clock and per-transaction timeout
    pub i2c: I2cConfig,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            sda: 4,
            scl: 5,
            i2c: I2cConfig::FAST,
        }
    }
}

/// Device re-initialization policy for a sensor that stops answering
///
/// Counted in monitor ticks so the policy needs no clock of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecoveryPolicy {
    /// Consecutive failed reads before the first re-init (0 = never)
    pub failure_threshold: u32,
    /// Upper bound on ticks skipped between failed re-init attempts
    pub max_backoff_ticks: u32,
}

impl RecoveryPolicy {
    /// Never re-initialize; failed reads are skipped forever
    pub const DISABLED: Self = Self {
        failure_threshold: 0,
        max_backoff_ticks: 0,
    };

    pub fn is_enabled(&self) -> bool {
        self.failure_threshold > 0
    }
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self {
            failure_threshold: 10,
            max_backoff_ticks: 64,
        }
    }
}

/// Complete posture sentinel configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PostureConfig {
    /// Tilt above which a sample counts as bad (degrees)
    pub threshold_deg: f32,
    /// Consecutive bad samples before the actuator engages
    pub max_count: u32,
    /// Control loop period in milliseconds
    pub tick_period_ms: u32,
    /// Full-scale ranges written to the sensor
    pub full_scale: FullScaleConfig,
    /// Sensor bus wiring
    pub bus: BusConfig,
    /// Actuator output line
    pub actuator: PinConfig,
    /// Sensor re-initialization policy
    pub recovery: RecoveryPolicy,
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            threshold_deg: 20.0,
            max_count: 50,
            tick_period_ms: 1000,
            full_scale: FullScaleConfig::default(),
            bus: BusConfig::default(),
            actuator: PinConfig::new(17),
            recovery: RecoveryPolicy::default(),
        }
    }
}

/// Reasons a configuration is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Threshold is not a finite angle in [0, 180]
    InvalidThreshold,
    /// Actuator could never engage
    ZeroMaxCount,
    /// Control loop would spin without delay
    ZeroTickPeriod,
    /// Bus transactions could never complete
    ZeroBusTimeout,
    /// Recovery enabled without any backoff room
    ZeroBackoff,
    /// Actuator shares a pin with the sensor bus
    PinConflict,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::InvalidThreshold => "threshold_deg must be within 0..=180",
            ConfigError::ZeroMaxCount => "max_count must be at least 1",
            ConfigError::ZeroTickPeriod => "tick_period_ms must be at least 1",
            ConfigError::ZeroBusTimeout => "timeout_ms must be at least 1",
            ConfigError::ZeroBackoff => "max_backoff_ticks must be at least 1 when recovery is enabled",
            ConfigError::PinConflict => "actuator pin overlaps the sensor bus pins",
        };
        f.write_str(msg)
    }
}

impl PostureConfig {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold_deg.is_finite() || !(0.0..=180.0).contains(&self.threshold_deg) {
            return Err(ConfigError::InvalidThreshold);
        }
        if self.max_count == 0 {
            return Err(ConfigError::ZeroMaxCount);
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.bus.i2c.timeout_ms == 0 {
            return Err(ConfigError::ZeroBusTimeout);
        }
        if self.recovery.is_enabled() && self.recovery.max_backoff_ticks == 0 {
            return Err(ConfigError::ZeroBackoff);
        }
        if self.actuator.pin == self.bus.sda || self.actuator.pin == self.bus.scl {
            return Err(ConfigError::PinConflict);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_device() {
        let config = PostureConfig::default();
        assert_eq!(config.threshold_deg, 20.0);
        assert_eq!(config.max_count, 50);
        assert_eq!(config.tick_period_ms, 1000);
        assert_eq!(config.full_scale.accel, AccelRange::G2);
        assert_eq!(config.full_scale.accel.lsb_per_g(), 16384.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_selectors() {
        let accel = [AccelRange::G2, AccelRange::G4, AccelRange::G8, AccelRange::G16];
        let gyro = [
            GyroRange::Dps250,
            GyroRange::Dps500,
            GyroRange::Dps1000,
            GyroRange::Dps2000,
        ];
        let expected = [0x00, 0x08, 0x10, 0x18];

        for i in 0..4 {
            assert_eq!(accel[i].selector(), expected[i]);
            assert_eq!(gyro[i].selector(), expected[i]);
        }
    }

    #[test]
    fn test_accel_scale_halves_per_step() {
        assert_eq!(AccelRange::G4.lsb_per_g() * 2.0, AccelRange::G2.lsb_per_g());
        assert_eq!(AccelRange::G16.lsb_per_g() * 8.0, AccelRange::G2.lsb_per_g());
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = PostureConfig::default();
        config.max_count = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxCount));

        let mut config = PostureConfig::default();
        config.threshold_deg = f32::NAN;
        assert_eq!(config.validate(), Err(ConfigError::InvalidThreshold));

        let mut config = PostureConfig::default();
        config.threshold_deg = 181.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidThreshold));

        let mut config = PostureConfig::default();
        config.tick_period_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickPeriod));

        let mut config = PostureConfig::default();
        config.bus.i2c.timeout_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBusTimeout));

        let mut config = PostureConfig::default();
        config.recovery.max_backoff_ticks = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBackoff));

        let mut config = PostureConfig::default();
        config.actuator = PinConfig::new(config.bus.scl);
        assert_eq!(config.validate(), Err(ConfigError::PinConflict));

        // Polarity does not hide an overlap
        let mut config = PostureConfig::default();
        config.actuator = PinConfig::inverted(config.bus.sda);
        assert_eq!(config.validate(), Err(ConfigError::PinConflict));
    }

    #[test]
    fn test_disabled_recovery_needs_no_backoff() {
        let config = PostureConfig {
            recovery: RecoveryPolicy::DISABLED,
            ..PostureConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
