//! Values handed to the reporting collaborators
//!
//! The status endpoint serves [`StatusReport`] as `{"angle": <number>}`.
//! The uplink forwards one [`PostureReport`] per successful sample, either
//! serialized or rendered as the `angle=..&status=..` query string the
//! posture API accepts.

use core::fmt::{self, Write};

use heapless::String;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Capacity of a rendered query string
pub const QUERY_CAPACITY: usize = 32;

/// Classification of a single sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PostureStatus {
    /// At or under the threshold
    Good,
    /// Over the threshold
    Bad,
}

impl PostureStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            PostureStatus::Good => "good",
            PostureStatus::Bad => "bad",
        }
    }

    pub const fn is_bad(self) -> bool {
        matches!(self, PostureStatus::Bad)
    }
}

impl fmt::Display for PostureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-tick report for the uplink
///
/// `status` classifies this one sample; it is not the debounced actuator
/// state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PostureReport {
    /// Tilt from vertical in degrees
    pub angle: f32,
    pub status: PostureStatus,
}

impl PostureReport {
    /// Render as `angle=<one decimal>&status=<good|bad>`
    ///
    /// The angle is clamped to [0, 180] first, so the output never exceeds
    /// "angle=180.0&status=good".
    pub fn to_query(&self) -> String<QUERY_CAPACITY> {
        let mut query = String::new();
        let angle = self.angle.clamp(0.0, 180.0);
        // Cannot overflow: bounded angle, fixed-width status
        let _ = write!(query, "angle={:.1}&status={}", angle, self.status);
        query
    }
}

/// Status endpoint payload
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StatusReport {
    /// Last good angle, `None` until the first successful sample
    pub angle: Option<f32>,
}
