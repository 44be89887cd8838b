//! Latest-angle snapshot shared with the status endpoint
//!
//! One `f32` in one atomic word: the writer does a single store, readers a
//! single load, so a reader can never observe half of an update.

use portable_atomic::{AtomicF32, Ordering};

use crate::report::StatusReport;

/// Atomic cell holding the last successfully computed angle
///
/// Only the posture monitor writes to it. Other tasks get an
/// [`AngleReader`].
pub struct AngleSnapshot {
    // NaN until the first sample
    angle: AtomicF32,
}

impl Default for AngleSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl AngleSnapshot {
    pub const fn new() -> Self {
        Self {
            angle: AtomicF32::new(f32::NAN),
        }
    }

    pub(crate) fn publish(&self, angle: f32) {
        self.angle.store(angle, Ordering::Release);
    }

    /// Read-only handle for the reporting side
    pub fn reader(&self) -> AngleReader<'_> {
        AngleReader { cell: self }
    }

    fn load(&self) -> Option<f32> {
        let angle = self.angle.load(Ordering::Acquire);
        if angle.is_nan() {
            None
        } else {
            Some(angle)
        }
    }
}

/// Read-only view of an [`AngleSnapshot`]
#[derive(Clone, Copy)]
pub struct AngleReader<'a> {
    cell: &'a AngleSnapshot,
}

impl AngleReader<'_> {
    /// Last good angle in degrees, `None` before the first sample
    pub fn angle(&self) -> Option<f32> {
        self.cell.load()
    }

    /// Payload for the status endpoint
    pub fn status(&self) -> StatusReport {
        StatusReport {
            angle: self.angle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_until_published() {
        let snapshot = AngleSnapshot::new();
        let reader = snapshot.reader();
        assert_eq!(reader.angle(), None);

        snapshot.publish(42.5);
        assert_eq!(reader.angle(), Some(42.5));
        assert_eq!(reader.status(), StatusReport { angle: Some(42.5) });
    }

    #[test]
    fn test_usable_as_static() {
        static SNAPSHOT: AngleSnapshot = AngleSnapshot::new();
        SNAPSHOT.publish(0.0);
        assert_eq!(SNAPSHOT.reader().angle(), Some(0.0));
    }
}
