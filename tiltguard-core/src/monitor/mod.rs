//! Posture monitoring
//!
//! Turns a noisy stream of tilt angles into an actuator decision and keeps
//! the latest angle available to the reporting side.

pub mod debounce;
pub mod posture;
pub mod recovery;
pub mod snapshot;

pub use debounce::DebounceState;
pub use posture::{PostureMonitor, RecoveryOutcome, TickOutcome, TickReport};
pub use recovery::RecoveryTracker;
pub use snapshot::{AngleReader, AngleSnapshot};
