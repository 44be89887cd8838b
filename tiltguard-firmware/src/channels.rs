//! Inter-task communication channels
//!
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use tiltguard_core::report::PostureReport;

/// Channel capacity for per-sample reports
const REPORT_CHANNEL_SIZE: usize = 4;

/// Per-sample reports from the posture task to the uplink
///
/// The posture task only ever uses `try_send`; when the uplink falls
/// behind, new reports are dropped and sampling carries on.
pub static REPORT_CHANNEL: Channel<CriticalSectionRawMutex, PostureReport, REPORT_CHANNEL_SIZE> =
    Channel::new();
