//! Build script for tiltguard-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates tiltguard.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted in each section, with the value type each must have
const SCHEMA: &[(&str, &[(&str, Kind)])] = &[
    (
        "posture",
        &[
            ("threshold_deg", Kind::Number),
            ("max_count", Kind::Integer),
            ("tick_period_ms", Kind::Integer),
        ],
    ),
    (
        "sensor",
        &[("accel_range", Kind::String), ("gyro_range", Kind::String)],
    ),
    (
        "bus",
        &[
            ("sda", Kind::String),
            ("scl", Kind::String),
            ("frequency", Kind::Integer),
            ("timeout_ms", Kind::Integer),
        ],
    ),
    ("actuator", &[("pin", Kind::String)]),
    (
        "recovery",
        &[
            ("failure_threshold", Kind::Integer),
            ("max_backoff_ticks", Kind::Integer),
        ],
    ),
];

#[derive(Clone, Copy)]
enum Kind {
    Integer,
    Number,
    String,
}

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate tiltguard.toml so a broken file fails the build instead of
/// falling back to defaults on the device
fn validate_config() {
    println!("cargo:rerun-if-changed=tiltguard.toml");

    let config_path = Path::new("tiltguard.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read tiltguard.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in tiltguard.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let errors = check_schema(&config);
    if !errors.is_empty() {
        fail("Invalid configuration in tiltguard.toml", &errors);
    }

    println!("cargo:warning=tiltguard.toml validated successfully");
}

fn check_schema(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let root = match config.as_table() {
        Some(t) => t,
        None => return vec!["top level must be a table".to_string()],
    };

    for (section, value) in root {
        let keys = match SCHEMA.iter().find(|(name, _)| name == section) {
            Some((_, keys)) => *keys,
            None => {
                errors.push(format!("unknown section [{}]", section));
                continue;
            }
        };
        let table = match value.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("[{}] must be a table", section));
                continue;
            }
        };

        for (key, value) in table {
            match keys.iter().find(|(name, _)| name == key) {
                Some((_, kind)) => {
                    if let Some(e) = check_value(section, key, value, *kind) {
                        errors.push(e);
                    }
                }
                None => errors.push(format!("[{}] unknown key '{}'", section, key)),
            }
        }
    }

    errors.extend(check_ranges(config));
    errors
}

fn check_value(section: &str, key: &str, value: &toml::Value, kind: Kind) -> Option<String> {
    let ok = match kind {
        Kind::Integer => value.as_integer().is_some_and(|v| v >= 0),
        Kind::Number => value.as_integer().is_some() || value.as_float().is_some(),
        Kind::String => value.as_str().is_some(),
    };
    if ok {
        return None;
    }

    let expected = match kind {
        Kind::Integer => "a non-negative integer",
        Kind::Number => "a number",
        Kind::String => "a string",
    };
    Some(format!("[{}] {} must be {}", section, key, expected))
}

fn check_ranges(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();
    let get = |section: &str, key: &str| config.get(section).and_then(|s| s.get(key));

    if let Some(threshold) = get("posture", "threshold_deg")
        .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
    {
        if !(0.0..=180.0).contains(&threshold) {
            errors.push("[posture] threshold_deg must be 0-180".to_string());
        }
    }

    for key in ["max_count", "tick_period_ms"] {
        if get("posture", key).and_then(|v| v.as_integer()) == Some(0) {
            errors.push(format!("[posture] {} must be at least 1", key));
        }
    }

    if let Some(range) = get("sensor", "accel_range").and_then(|v| v.as_str()) {
        if !["2g", "4g", "8g", "16g"].contains(&range) {
            errors.push("[sensor] accel_range must be 2g, 4g, 8g or 16g".to_string());
        }
    }
    if let Some(range) = get("sensor", "gyro_range").and_then(|v| v.as_str()) {
        if !["250dps", "500dps", "1000dps", "2000dps"].contains(&range) {
            errors.push("[sensor] gyro_range must be 250dps, 500dps, 1000dps or 2000dps".to_string());
        }
    }

    for (section, key) in [("bus", "sda"), ("bus", "scl"), ("actuator", "pin")] {
        if let Some(pin) = get(section, key).and_then(|v| v.as_str()) {
            let number = pin.trim_start_matches('!').strip_prefix("gpio");
            let valid = number.and_then(|n| n.parse::<u8>().ok()).is_some_and(|n| n < 30);
            if !valid || (section == "bus" && pin.starts_with('!')) {
                errors.push(format!("[{}] {} '{}' is not a valid pin", section, key, pin));
            }
        }
    }

    if let Some(freq) = get("bus", "frequency").and_then(|v| v.as_integer()) {
        if freq == 0 || freq > 1_000_000 {
            errors.push("[bus] frequency must be 1-1000000 Hz".to_string());
        }
    }
    if get("bus", "timeout_ms").and_then(|v| v.as_integer()) == Some(0) {
        errors.push("[bus] timeout_ms must be at least 1".to_string());
    }

    // Missing keys take the firmware defaults, as the runtime parser does
    let integer = |section: &str, key: &str, default: i64| {
        get(section, key).and_then(|v| v.as_integer()).unwrap_or(default)
    };
    if integer("recovery", "failure_threshold", 10) > 0
        && integer("recovery", "max_backoff_ticks", 64) == 0
    {
        errors.push("[recovery] max_backoff_ticks must be at least 1 when recovery is enabled".to_string());
    }

    let pin = |section: &str, key: &str, default: u8| {
        get(section, key)
            .and_then(|v| v.as_str())
            .and_then(|p| p.trim_start_matches('!').strip_prefix("gpio"))
            .and_then(|n| n.parse::<u8>().ok())
            .unwrap_or(default)
    };
    let actuator = pin("actuator", "pin", 17);
    if actuator == pin("bus", "sda", 4) || actuator == pin("bus", "scl", 5) {
        errors.push(format!("[actuator] pin gpio{} overlaps the sensor bus pins", actuator));
    }

    errors
}

fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<57}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(lines)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
