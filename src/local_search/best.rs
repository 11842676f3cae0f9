//! Best-so-far bookkeeping.

use std::time::{Duration, Instant};

use crate::fixed_order::FixedOrderSolution;
use crate::model::{Job, StartTimes};

/// An evaluated job order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub order: Vec<Job>,
    pub start_times: StartTimes,
    pub objective: i64,
}

impl Candidate {
    /// `None` unless the evaluation produced a schedule.
    pub fn from_solution(order: Vec<Job>, solution: FixedOrderSolution) -> Option<Self> {
        if !solution.status.is_feasible_solution() {
            return None;
        }
        Some(Self {
            order,
            start_times: solution.start_times?,
            objective: solution.objective?,
        })
    }
}

/// Keeps the best candidate and when it was found.
#[derive(Debug)]
pub(crate) struct BestTracker {
    started: Instant,
    best: Option<Candidate>,
    time_to_best: Option<Duration>,
}

impl BestTracker {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            best: None,
            time_to_best: None,
        }
    }

    /// Stores `candidate` if it is strictly better; returns whether it was.
    pub fn offer(&mut self, candidate: &Candidate) -> bool {
        if self
            .best
            .as_ref()
            .is_some_and(|best| best.objective <= candidate.objective)
        {
            return false;
        }
        self.best = Some(candidate.clone());
        self.time_to_best = Some(self.started.elapsed());
        true
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    pub fn best_objective(&self) -> Option<i64> {
        self.best.as_ref().map(|best| best.objective)
    }

    pub fn time_to_best(&self) -> Option<Duration> {
        self.time_to_best
    }

    pub fn into_best(self) -> Option<Candidate> {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(objective: i64) -> Candidate {
        Candidate {
            order: Vec::new(),
            start_times: StartTimes::new(),
            objective,
        }
    }

    #[test]
    fn test_only_strict_improvements() {
        let mut tracker = BestTracker::new();
        assert!(tracker.best().is_none());
        assert!(tracker.offer(&candidate(10)));
        let first = tracker.time_to_best();
        assert!(!tracker.offer(&candidate(10)), "ties keep the first best");
        assert_eq!(tracker.time_to_best(), first);
        assert!(!tracker.offer(&candidate(12)));
        assert!(tracker.offer(&candidate(7)));
        assert_eq!(tracker.best_objective(), Some(7));
        assert!(tracker.time_to_best() >= first);
    }
}
