use serde::{Deserialize, Serialize};

/// A time interval with a per-unit-of-power energy cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Zero-based position in the horizon.
    pub index: usize,
    /// Start time (inclusive).
    pub start: i64,
    /// End time (exclusive).
    pub end: i64,
    /// Cost of one unit of power drawn during the interval.
    pub energy_cost: i64,
}

impl Interval {
    /// Creates an interval.
    pub fn new(index: usize, start: i64, end: i64, energy_cost: i64) -> Self {
        Self {
            index,
            start,
            end,
            energy_cost,
        }
    }

    /// Length of the interval.
    pub fn length(&self) -> i64 {
        self.end - self.start
    }
}
