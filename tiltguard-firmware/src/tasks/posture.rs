//! Posture sampling task
//!
//! Owns the sensor bus, the MPU-6050 and the motor. One tick per period:
//! sample, debounce, drive the motor, hand the report to the uplink.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::channel::TrySendError;
use embassy_time::{Delay, Duration, Ticker};

use tiltguard_core::monitor::{PostureMonitor, RecoveryOutcome, TickOutcome};
use tiltguard_drivers::actuator::GpioActuator;
use tiltguard_drivers::imu::Mpu6050;
use tiltguard_hal_rp2040::gpio::RpOutput;
use tiltguard_hal_rp2040::TimedI2c;

use crate::channels::REPORT_CHANNEL;

/// Sensor on the board's I2C0
pub type BoardSensor = Mpu6050<TimedI2c<I2c<'static, I2C0, Async>>, Delay>;

/// Motor on a plain GPIO
pub type BoardActuator = GpioActuator<RpOutput<'static>>;

pub type BoardMonitor = PostureMonitor<'static, BoardSensor, BoardActuator>;

#[embassy_executor::task]
pub async fn posture_task(mut monitor: BoardMonitor, tick_period_ms: u32) {
    info!("Posture task started ({} ms period)", tick_period_ms);

    let mut ticker = Ticker::every(Duration::from_millis(tick_period_ms as u64));

    loop {
        ticker.next().await;

        match monitor.tick().await {
            TickOutcome::Sampled(tick) => {
                info!(
                    "angle={} status={} counter={} motor={}",
                    tick.report.angle, tick.report.status, tick.counter, tick.engaged
                );
                if tick.changed {
                    if tick.engaged {
                        warn!("Bad posture for {} samples, motor on", tick.counter);
                    } else {
                        warn!("Posture recovered, motor off");
                    }
                }

                if let Err(TrySendError::Full(_)) = REPORT_CHANNEL.try_send(tick.report) {
                    warn!("Report channel full, dropping sample");
                }
            }
            TickOutcome::ReadFailed { error, recovery } => {
                warn!("Sensor read failed: {}", error);
                match recovery {
                    RecoveryOutcome::NotAttempted => continue,
                    RecoveryOutcome::Recovered => info!("Sensor re-initialized"),
                    RecoveryOutcome::Failed(e) => error!("Sensor re-initialization failed: {}", e),
                }
                // A re-init can outlast several periods; don't replay the missed ticks
                ticker.reset();
            }
        }
    }
}
