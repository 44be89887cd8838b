//! Simple TOML parser for the sentinel configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `tiltguard.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float)
//! - [section] headers
//! - Comments (# ...)
//!
//! Every key starts from [`PostureConfig::default`], so a file only needs
//! the values it changes. Unknown sections and keys are rejected rather
//! than ignored so that a typo cannot silently fall back to a default.

use core::fmt;

use super::types::{AccelRange, BusConfig, ConfigError, GyroRange, PinConfig, PostureConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not recognised in the current section
    UnknownKey,
    /// Line is neither a header, a comment nor `key = value`
    Syntax,
    /// Invalid value type
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
    /// Values parsed but the combination is not usable
    Invalid(ConfigError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidSection => f.write_str("unknown section"),
            ParseError::UnknownKey => f.write_str("unknown key"),
            ParseError::Syntax => f.write_str("expected `key = value`"),
            ParseError::InvalidValue => f.write_str("invalid value"),
            ParseError::InvalidPin => f.write_str("invalid pin, expected \"gpioN\" or \"!gpioN\""),
            ParseError::Invalid(e) => write!(f, "invalid configuration: {}", e),
        }
    }
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Invalid(e)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Posture,
    Sensor,
    Bus,
    Actuator,
    Recovery,
}

/// Parse TOML configuration into PostureConfig
///
/// The result has passed [`PostureConfig::validate`].
pub fn parse_config(input: &str) -> Result<PostureConfig, ParseError> {
    let mut config = PostureConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Check for section header
        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::Syntax)?;
        apply_value(section, key, value, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

/// Parse section header like "[posture]", allowing a trailing comment
fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let line = strip_comment(line);
    let name = line
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?;

    match name.trim() {
        "posture" => Ok(Section::Posture),
        "sensor" => Ok(Section::Sensor),
        "bus" => Ok(Section::Bus),
        "actuator" => Ok(Section::Actuator),
        "recovery" => Ok(Section::Recovery),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Drop a trailing `# comment` unless the `#` sits inside a string
fn strip_comment(value: &str) -> &str {
    match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value.trim(),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(&line[eq_pos + 1..]);

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut PostureConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => Err(ParseError::UnknownKey),
        Section::Posture => match key {
            "threshold_deg" => {
                config.threshold_deg = parse_float(value)?;
                Ok(())
            }
            "max_count" => {
                config.max_count = parse_int(value)?;
                Ok(())
            }
            "tick_period_ms" => {
                config.tick_period_ms = parse_int(value)?;
                Ok(())
            }
            _ => Err(ParseError::UnknownKey),
        },
        Section::Sensor => match key {
            "accel_range" => {
                config.full_scale.accel = parse_accel_range(value)?;
                Ok(())
            }
            "gyro_range" => {
                config.full_scale.gyro = parse_gyro_range(value)?;
                Ok(())
            }
            _ => Err(ParseError::UnknownKey),
        },
        Section::Bus => apply_bus_value(key, value, &mut config.bus),
        Section::Actuator => match key {
            "pin" => {
                config.actuator = parse_pin(value)?;
                Ok(())
            }
            _ => Err(ParseError::UnknownKey),
        },
        Section::Recovery => match key {
            "failure_threshold" => {
                config.recovery.failure_threshold = parse_int(value)?;
                Ok(())
            }
            "max_backoff_ticks" => {
                config.recovery.max_backoff_ticks = parse_int(value)?;
                Ok(())
            }
            _ => Err(ParseError::UnknownKey),
        },
    }
}

fn apply_bus_value(key: &str, value: &str, bus: &mut BusConfig) -> Result<(), ParseError> {
    match key {
        "sda" => bus.sda = parse_plain_pin(value)?,
        "scl" => bus.scl = parse_plain_pin(value)?,
        "frequency" => bus.i2c.frequency = parse_int(value)?,
        "timeout_ms" => bus.i2c.timeout_ms = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Parse a string value (quoted or unquoted)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value, allowing `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: heapless::String<24> = heapless::String::new();
    for c in value.chars().filter(|c| *c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a float value (integers are accepted)
fn parse_float(value: &str) -> Result<f32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_accel_range(value: &str) -> Result<AccelRange, ParseError> {
    match parse_string(value) {
        "2g" => Ok(AccelRange::G2),
        "4g" => Ok(AccelRange::G4),
        "8g" => Ok(AccelRange::G8),
        "16g" => Ok(AccelRange::G16),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_gyro_range(value: &str) -> Result<GyroRange, ParseError> {
    match parse_string(value) {
        "250dps" => Ok(GyroRange::Dps250),
        "500dps" => Ok(GyroRange::Dps500),
        "1000dps" => Ok(GyroRange::Dps1000),
        "2000dps" => Ok(GyroRange::Dps2000),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a pin string like "gpio17" or "!gpio17"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let value = parse_string(value);
    match value.strip_prefix('!') {
        Some(rest) => Ok(PinConfig::inverted(parse_gpio_number(rest)?)),
        None => Ok(PinConfig::new(parse_gpio_number(value)?)),
    }
}

/// Parse a pin that cannot be inverted (bus lines)
fn parse_plain_pin(value: &str) -> Result<u8, ParseError> {
    parse_gpio_number(parse_string(value))
}

fn parse_gpio_number(s: &str) -> Result<u8, ParseError> {
    let num = s.strip_prefix("gpio").ok_or(ParseError::InvalidPin)?;
    let pin: u8 = num.parse().map_err(|_| ParseError::InvalidPin)?;

    // RP2040 exposes GPIO0-GPIO29
    if pin >= 30 {
        return Err(ParseError::InvalidPin);
    }

    Ok(pin)
}
