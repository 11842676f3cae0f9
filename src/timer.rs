//! Wall-clock budget shared by the algorithms.

use std::time::{Duration, Instant};

/// A started stopwatch with an optional time limit.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_energysched::Timer;
///
/// let timer = Timer::new(Some(Duration::from_secs(60)));
/// assert!(!timer.limit_reached());
/// assert!(timer.remaining().unwrap() <= Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    started: Instant,
    limit: Option<Duration>,
}

impl Timer {
    /// Starts a timer. `None` means unlimited.
    pub fn new(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// Starts an unlimited timer.
    pub fn unlimited() -> Self {
        Self::new(None)
    }

    /// Time elapsed since the timer started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// The configured limit.
    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    /// Remaining budget, saturating at zero. `None` when unlimited.
    pub fn remaining(&self) -> Option<Duration> {
        self.limit
            .map(|limit| limit.saturating_sub(self.started.elapsed()))
    }

    /// Whether the budget is exhausted.
    pub fn limit_reached(&self) -> bool {
        match self.limit {
            Some(limit) => self.started.elapsed() >= limit,
            None => false,
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::unlimited()
    }
}
