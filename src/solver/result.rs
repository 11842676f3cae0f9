//! Solver result record.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{IndexedStartTime, Instance, StartTimes};
use crate::status::Status;

/// Outcome of a solver run, exchanged as PascalCase JSON.
///
/// Durations are stored in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SolverResult {
    pub status: Status,
    pub time_limit_reached: bool,
    #[serde(rename = "RunningTime")]
    pub running_time_ms: u64,
    /// Start times by job index; empty without a schedule.
    #[serde(default)]
    pub start_times: Vec<IndexedStartTime>,
    #[serde(default)]
    pub lower_bound: Option<i64>,
    #[serde(default)]
    pub objective: Option<i64>,
    #[serde(rename = "TimeToBest", default)]
    pub time_to_best_ms: Option<u64>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Solver-specific statistics.
    #[serde(default)]
    pub additional_info: serde_json::Map<String, serde_json::Value>,
}

impl SolverResult {
    /// A result without a schedule.
    pub fn no_solution(time_limit_reached: bool, running_time: Duration) -> Self {
        Self {
            status: Status::NoSolution,
            time_limit_reached,
            running_time_ms: millis(running_time),
            start_times: Vec::new(),
            lower_bound: None,
            objective: None,
            time_to_best_ms: None,
            metadata: None,
            additional_info: serde_json::Map::new(),
        }
    }

    /// Whether the result carries a schedule.
    pub fn has_solution(&self) -> bool {
        self.status.is_feasible_solution()
    }

    /// Resolves the start times against `instance`.
    pub fn start_times(&self, instance: &Instance) -> Result<StartTimes> {
        StartTimes::from_indexed(instance, &self.start_times)
    }

    pub fn running_time(&self) -> Duration {
        Duration::from_millis(self.running_time_ms)
    }

    pub fn time_to_best(&self) -> Option<Duration> {
        self.time_to_best_ms.map(Duration::from_millis)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the record to a JSON file.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reads a record from a JSON file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
