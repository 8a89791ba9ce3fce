//! Time interval value object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error constructing or combining time ranges.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimeRangeError {
    #[error("range end ({end:.3}) must be greater than start ({start:.3})")]
    Empty { start: f64, end: f64 },

    #[error("cannot merge non-overlapping ranges")]
    Disjoint,

    #[error("split point {0:.3} is outside the range")]
    SplitOutOfRange(f64),
}

/// Immutable half-open interval `[start, end)` in seconds.
///
/// Negative starts are clamped to zero; empty or inverted intervals are
/// rejected at construction, so a `TimeRange` always has positive duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    /// Create a range, clamping a negative start to zero.
    pub fn new(start: f64, end: f64) -> Result<Self, TimeRangeError> {
        let start = start.max(0.0);
        if !end.is_finite() || !start.is_finite() || end <= start {
            return Err(TimeRangeError::Empty { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start of the interval in seconds.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End of the interval in seconds.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Length of the interval in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Central timestamp of the interval.
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Whether two ranges share any time.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `timestamp` lies within the range (inclusive of both edges).
    pub fn contains(&self, timestamp: f64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// Union of two overlapping ranges.
    pub fn merge(&self, other: &TimeRange) -> Result<TimeRange, TimeRangeError> {
        if !self.overlaps(other) {
            return Err(TimeRangeError::Disjoint);
        }
        TimeRange::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Grow the range by `before` and `after` seconds (negative amounts are
    /// ignored); the start is floored at zero.
    pub fn extend(&self, before: f64, after: f64) -> Result<TimeRange, TimeRangeError> {
        TimeRange::new(self.start - before.max(0.0), self.end + after.max(0.0))
    }

    /// Split the range at an interior timestamp.
    pub fn split(&self, at: f64) -> Result<(TimeRange, TimeRange), TimeRangeError> {
        if !self.contains(at) {
            return Err(TimeRangeError::SplitOutOfRange(at));
        }
        Ok((TimeRange::new(self.start, at)?, TimeRange::new(at, self.end)?))
    }

    /// Intersect with `[0, limit]`, if anything remains.
    pub fn clamp_to(&self, limit: f64) -> Option<TimeRange> {
        TimeRange::new(self.start, self.end.min(limit)).ok()
    }
}
