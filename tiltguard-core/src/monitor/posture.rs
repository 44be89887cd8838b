//! Posture monitor control loop step
//!
//! One call to [`PostureMonitor::tick`] per control period. The caller owns
//! the timing (an embassy `Ticker` in the firmware); the monitor owns the
//! sensor, the actuator, the debounce state and the write side of the
//! angle snapshot.

use crate::config::PostureConfig;
use crate::report::PostureReport;
use crate::traits::{Actuator, TiltSensor};

use super::debounce::DebounceState;
use super::recovery::RecoveryTracker;
use super::snapshot::{AngleReader, AngleSnapshot};

/// Result of one successful sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Angle and per-sample classification for the uplink
    pub report: PostureReport,
    /// Consecutive bad samples including this one
    pub counter: u32,
    /// Actuator state after this tick
    pub engaged: bool,
    /// Actuator state differs from the previous tick
    pub changed: bool,
}

/// What happened to the sensor after a failed read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecoveryOutcome<E> {
    /// Policy disabled, threshold not reached, or backing off
    NotAttempted,
    /// Re-initialization succeeded
    Recovered,
    /// Re-initialization failed
    Failed(E),
}

/// Outcome of one control loop tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome<E> {
    /// A sample was read and applied
    Sampled(TickReport),
    /// The read failed; debounce state and actuator are unchanged
    ReadFailed {
        error: E,
        recovery: RecoveryOutcome<E>,
    },
}

/// Debounced posture monitor
///
/// The actuator engages once `max_count` consecutive samples exceed
/// `threshold_deg` and releases on the first sample at or under it. A
/// failed read counts as neither good nor bad.
pub struct PostureMonitor<'a, S, A> {
    sensor: S,
    actuator: A,
    threshold_deg: f32,
    max_count: u32,
    state: DebounceState,
    recovery: RecoveryTracker,
    snapshot: &'a AngleSnapshot,
}

impl<'a, S: TiltSensor, A: Actuator> PostureMonitor<'a, S, A> {
    /// Create a monitor; the actuator is forced off
    pub fn new(sensor: S, mut actuator: A, config: &PostureConfig, snapshot: &'a AngleSnapshot) -> Self {
        actuator.set_engaged(false);

        Self {
            sensor,
            actuator,
            threshold_deg: config.threshold_deg,
            max_count: config.max_count,
            state: DebounceState::new(),
            recovery: RecoveryTracker::new(config.recovery),
            snapshot,
        }
    }

    /// Run one control loop step
    pub async fn tick(&mut self) -> TickOutcome<S::Error> {
        match self.sensor.read_tilt().await {
            Ok(angle) => {
                self.recovery.record_success();
                TickOutcome::Sampled(self.apply_sample(angle))
            }
            Err(error) => {
                let recovery = if self.recovery.record_failure() {
                    match self.sensor.reinitialize().await {
                        Ok(()) => {
                            self.recovery.record_attempt(true);
                            RecoveryOutcome::Recovered
                        }
                        Err(e) => {
                            self.recovery.record_attempt(false);
                            RecoveryOutcome::Failed(e)
                        }
                    }
                } else {
                    RecoveryOutcome::NotAttempted
                };

                TickOutcome::ReadFailed { error, recovery }
            }
        }
    }

    /// Apply one angle to the debounce state and the actuator
    pub fn apply_sample(&mut self, angle: f32) -> TickReport {
        self.snapshot.publish(angle);

        let status = self.state.update(angle, self.threshold_deg);
        let engaged = self.state.is_triggered(self.max_count);
        let changed = engaged != self.actuator.is_engaged();
        self.actuator.set_engaged(engaged);

        TickReport {
            report: PostureReport { angle, status },
            counter: self.state.counter(),
            engaged,
            changed,
        }
    }

    /// Read-only access to the latest angle
    pub fn reader(&self) -> AngleReader<'a> {
        self.snapshot.reader()
    }

    pub fn state(&self) -> &DebounceState {
        &self.state
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.recovery.consecutive_failures()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecoveryPolicy;
    use crate::report::PostureStatus;
    use embassy_futures::block_on;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Glitch;

    /// Sensor that replays a script of results
    struct ScriptedSensor {
        script: heapless::Vec<Result<f32, Glitch>, 64>,
        next: usize,
        reinit_results: heapless::Vec<Result<(), Glitch>, 8>,
        reinit_calls: usize,
    }

    impl ScriptedSensor {
        fn new(script: &[Result<f32, Glitch>]) -> Self {
            Self {
                script: heapless::Vec::from_slice(script).unwrap(),
                next: 0,
                reinit_results: heapless::Vec::new(),
                reinit_calls: 0,
            }
        }

        fn angles(angles: &[f32]) -> Self {
            let mut sensor = Self::new(&[]);
            for &a in angles {
                sensor.script.push(Ok(a)).unwrap();
            }
            sensor
        }
    }

    impl TiltSensor for ScriptedSensor {
        type Error = Glitch;

        async fn read_tilt(&mut self) -> Result<f32, Glitch> {
            let result = self.script.get(self.next).copied().unwrap_or(Err(Glitch));
            self.next += 1;
            result
        }

        async fn reinitialize(&mut self) -> Result<(), Glitch> {
            let result = self
                .reinit_results
                .get(self.reinit_calls)
                .copied()
                .unwrap_or(Err(Glitch));
            self.reinit_calls += 1;
            result
        }
    }

    struct MockMotor {
        on: bool,
        writes: usize,
    }

    impl MockMotor {
        fn new(on: bool) -> Self {
            Self { on, writes: 0 }
        }
    }

    impl Actuator for MockMotor {
        fn set_engaged(&mut self, engaged: bool) {
            self.on = engaged;
            self.writes += 1;
        }

        fn is_engaged(&self) -> bool {
            self.on
        }
    }

    fn config(threshold_deg: f32, max_count: u32) -> PostureConfig {
        PostureConfig {
            threshold_deg,
            max_count,
            recovery: RecoveryPolicy::DISABLED,
            ..PostureConfig::default()
        }
    }

    fn sampled(outcome: TickOutcome<Glitch>) -> TickReport {
        match outcome {
            TickOutcome::Sampled(report) => report,
            other => panic!("expected a sample, got {:?}", other),
        }
    }

    #[test]
    fn test_actuator_forced_off_at_start() {
        let snapshot = AngleSnapshot::new();
        let monitor = PostureMonitor::new(
            ScriptedSensor::angles(&[]),
            MockMotor::new(true),
            &config(20.0, 3),
            &snapshot,
        );
        assert!(!monitor.actuator().is_engaged());
    }

    #[test]
    fn test_end_to_end_scenario() {
        let snapshot = AngleSnapshot::new();
        let sensor = ScriptedSensor::angles(&[25.0, 30.0, 5.0, 25.0, 25.0, 25.0]);
        let mut monitor =
            PostureMonitor::new(sensor, MockMotor::new(false), &config(20.0, 3), &snapshot);

        let mut counters = [0u32; 6];
        let mut engaged = [false; 6];
        for i in 0..6 {
            let report = sampled(block_on(monitor.tick()));
            counters[i] = report.counter;
            engaged[i] = report.engaged;
        }

        assert_eq!(counters, [1, 2, 0, 1, 2, 3]);
        assert_eq!(engaged, [false, false, false, false, false, true]);
        assert!(monitor.actuator().is_engaged());
        assert_eq!(monitor.reader().angle(), Some(25.0));
    }

    #[test]
    fn test_long_streak_then_single_good_sample() {
        let snapshot = AngleSnapshot::new();
        let mut monitor = PostureMonitor::new(
            ScriptedSensor::angles(&[]),
            MockMotor::new(false),
            &config(20.0, 50),
            &snapshot,
        );

        for n in 1..=60u32 {
            let report = monitor.apply_sample(45.0);
            assert_eq!(report.counter, n);
            assert_eq!(report.engaged, n >= 50);
            assert_eq!(report.changed, n == 50);
            assert_eq!(report.report.status, PostureStatus::Bad);
        }

        let report = monitor.apply_sample(3.0);
        assert_eq!(report.counter, 0);
        assert!(!report.engaged);
        assert!(report.changed);
        assert_eq!(report.report.status, PostureStatus::Good);
        assert!(!monitor.actuator().is_engaged());
    }

    #[test]
    fn test_read_failure_leaves_counter_alone() {
        let snapshot = AngleSnapshot::new();
        let sensor = ScriptedSensor::new(&[Ok(30.0), Ok(30.0), Err(Glitch), Err(Glitch), Ok(30.0)]);
        let mut monitor =
            PostureMonitor::new(sensor, MockMotor::new(false), &config(20.0, 3), &snapshot);

        assert_eq!(sampled(block_on(monitor.tick())).counter, 1);
        assert_eq!(sampled(block_on(monitor.tick())).counter, 2);

        for _ in 0..2 {
            let outcome = block_on(monitor.tick());
            assert_eq!(
                outcome,
                TickOutcome::ReadFailed {
                    error: Glitch,
                    recovery: RecoveryOutcome::NotAttempted,
                }
            );
            assert_eq!(monitor.state().counter(), 2);
            assert_eq!(monitor.reader().angle(), Some(30.0));
        }

        // Next bad sample continues the streak instead of restarting it
        let report = sampled(block_on(monitor.tick()));
        assert_eq!(report.counter, 3);
        assert!(report.engaged);
    }

    #[test]
    fn test_read_failure_keeps_actuator_engaged() {
        let snapshot = AngleSnapshot::new();
        let sensor = ScriptedSensor::new(&[Ok(30.0), Err(Glitch)]);
        let mut monitor =
            PostureMonitor::new(sensor, MockMotor::new(false), &config(20.0, 1), &snapshot);

        assert!(sampled(block_on(monitor.tick())).engaged);
        let writes = monitor.actuator().writes;

        block_on(monitor.tick());
        assert!(monitor.actuator().is_engaged());
        assert_eq!(monitor.actuator().writes, writes);
    }

    #[test]
    fn test_snapshot_only_on_success() {
        let snapshot = AngleSnapshot::new();
        let reader = snapshot.reader();
        let sensor = ScriptedSensor::new(&[Err(Glitch), Ok(12.0)]);
        let mut monitor =
            PostureMonitor::new(sensor, MockMotor::new(false), &config(20.0, 3), &snapshot);

        block_on(monitor.tick());
        assert_eq!(reader.angle(), None);

        block_on(monitor.tick());
        assert_eq!(reader.angle(), Some(12.0));
    }

    #[test]
    fn test_recovery_after_threshold() {
        let snapshot = AngleSnapshot::new();
        let mut sensor = ScriptedSensor::new(&[Ok(30.0), Err(Glitch), Err(Glitch), Err(Glitch), Ok(30.0)]);
        sensor.reinit_results.push(Ok(())).unwrap();

        let cfg = PostureConfig {
            recovery: RecoveryPolicy {
                failure_threshold: 3,
                max_backoff_ticks: 8,
            },
            ..config(20.0, 10)
        };
        let mut monitor = PostureMonitor::new(sensor, MockMotor::new(false), &cfg, &snapshot);

        assert_eq!(sampled(block_on(monitor.tick())).counter, 1);

        let mut recoveries = heapless::Vec::<RecoveryOutcome<Glitch>, 3>::new();
        for _ in 0..3 {
            match block_on(monitor.tick()) {
                TickOutcome::ReadFailed { recovery, .. } => recoveries.push(recovery).unwrap(),
                other => panic!("expected failure, got {:?}", other),
            }
        }
        assert_eq!(
            recoveries.as_slice(),
            &[
                RecoveryOutcome::NotAttempted,
                RecoveryOutcome::NotAttempted,
                RecoveryOutcome::Recovered,
            ]
        );

        // Recovery does not touch the debounce counter
        assert_eq!(sampled(block_on(monitor.tick())).counter, 2);
        assert_eq!(monitor.consecutive_failures(), 0);
    }

    #[test]
    fn test_failed_recovery_reports_error() {
        let snapshot = AngleSnapshot::new();
        let sensor = ScriptedSensor::new(&[]);
        let cfg = PostureConfig {
            recovery: RecoveryPolicy {
                failure_threshold: 1,
                max_backoff_ticks: 4,
            },
            ..config(20.0, 10)
        };
        let mut monitor = PostureMonitor::new(sensor, MockMotor::new(false), &cfg, &snapshot);

        assert_eq!(
            block_on(monitor.tick()),
            TickOutcome::ReadFailed {
                error: Glitch,
                recovery: RecoveryOutcome::Failed(Glitch),
            }
        );
        // Backing off for one tick
        assert_eq!(
            block_on(monitor.tick()),
            TickOutcome::ReadFailed {
                error: Glitch,
                recovery: RecoveryOutcome::NotAttempted,
            }
        );
        assert_eq!(monitor.sensor.reinit_calls, 1);
    }
}
