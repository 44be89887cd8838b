//! Tiltguard - Posture Sentinel Firmware
//!
//! Main firmware binary for RP2040-based posture clips. An MPU-6050 on I2C0
//! is sampled once per tick; a vibration motor buzzes once the wearer has
//! leaned past the threshold for `max_count` consecutive samples.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use tiltguard_core::config::{parse_config, PostureConfig};
use tiltguard_core::monitor::{AngleSnapshot, PostureMonitor};
use tiltguard_drivers::actuator::GpioActuator;
use tiltguard_drivers::imu::mpu6050::registers::WHO_AM_I_VALUE;
use tiltguard_drivers::imu::Mpu6050;
use tiltguard_hal_rp2040::gpio::RpOutput;
use tiltguard_hal_rp2040::{configure, I2cController, PeripheralClaims, TimedI2c};

mod channels;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit tiltguard.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../tiltguard.toml");

// Board wiring (reference clip: MPU-6050 on GPIO4/5, motor driver on GPIO17)
const BOARD_SDA: u8 = 4;
const BOARD_SCL: u8 = 5;
const BOARD_ACTUATOR: u8 = 17;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Latest angle, written by the posture task and read by the report task
static SNAPSHOT: AngleSnapshot = AngleSnapshot::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tiltguard firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Config: threshold={} deg, max_count={}, period={} ms",
        config.threshold_deg, config.max_count, config.tick_period_ms
    );

    // Validate and claim the bus before touching the peripheral
    let mut claims = PeripheralClaims::new();
    let controller = match configure(config.bus.sda, config.bus.scl, &config.bus.i2c, &mut claims) {
        Ok(controller) => controller,
        Err(e) => {
            error!("I2C bring-up failed: {}", e);
            defmt::panic!("sensor bus unavailable");
        }
    };
    if controller != I2cController::I2c0
        || config.bus.sda != BOARD_SDA
        || config.bus.scl != BOARD_SCL
    {
        error!(
            "Configured bus gpio{}/gpio{} does not match board wiring gpio{}/gpio{}",
            config.bus.sda, config.bus.scl, BOARD_SDA, BOARD_SCL
        );
        defmt::panic!("bus pins do not match board");
    }
    if config.actuator.pin != BOARD_ACTUATOR || claims.claim_pin(config.actuator.pin).is_err() {
        error!(
            "Actuator gpio{} unavailable (board wiring gpio{})",
            config.actuator.pin, BOARD_ACTUATOR
        );
        defmt::panic!("actuator pin unavailable");
    }

    // Actuator first so the motor is held off during sensor bring-up
    let motor = Output::new(p.PIN_17, Level::Low);
    let actuator = GpioActuator::from_config(RpOutput::new(motor), &config.actuator);
    info!(
        "Actuator on gpio{} (active-{})",
        config.actuator.pin,
        if config.actuator.inverted { "low" } else { "high" }
    );

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = config.bus.i2c.frequency;
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);
    let bus = TimedI2c::new(i2c, &config.bus.i2c);
    info!(
        "I2C0 at {} Hz, {} ms timeout",
        config.bus.i2c.frequency, config.bus.i2c.timeout_ms
    );

    let mut sensor = match Mpu6050::initialize(bus, Delay, config.full_scale).await {
        Ok(sensor) => sensor,
        Err(e) => {
            error!("MPU-6050 initialization failed: {}", e);
            defmt::panic!("sensor initialization failed");
        }
    };
    match sensor.who_am_i().await {
        Ok(WHO_AM_I_VALUE) => info!("MPU-6050 ready"),
        Ok(id) => warn!("WHO_AM_I = {=u8:#x}, expected {=u8:#x}; continuing", id, WHO_AM_I_VALUE),
        Err(e) => warn!("WHO_AM_I read failed: {}", e),
    }

    let monitor = PostureMonitor::new(sensor, actuator, &config, &SNAPSHOT);

    spawner.must_spawn(tasks::posture_task(monitor, config.tick_period_ms));
    spawner.must_spawn(tasks::report_task(SNAPSHOT.reader()));

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded configuration
///
/// build.rs already validated the file, so failure here means the runtime
/// parser and the build-time check disagree; fall back to defaults.
fn load_config() -> PostureConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            error!("Using default configuration");
            PostureConfig::default()
        }
    }
}
