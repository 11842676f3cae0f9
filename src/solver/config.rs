//! Solver configuration surface.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::IndexedStartTime;

/// How much preprocessing a solver may do before searching.
///
/// Advisory: solvers without a presolve phase ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresolveLevel {
    #[default]
    Auto,
    Off,
    Conservative,
    Aggressive,
}

/// Settings shared by every solver.
///
/// Solver-specific settings travel in [`specialized`](Self::specialized)
/// and are decoded by the solver itself.
///
/// # Examples
///
/// ```
/// use u_energysched::solver::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit_ms(5_000)
///     .with_seed(3)
///     .with_specialized("max_iterations", 100.into());
/// assert!(config.validate().is_ok());
///
/// let json = serde_json::to_string(&config).unwrap();
/// assert!(json.contains("\"TimeLimit\":5000"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SolverConfig {
    /// Wall-clock budget in milliseconds.
    #[serde(rename = "TimeLimit")]
    pub time_limit_ms: Option<u64>,
    /// Worker threads (0 = available parallelism).
    pub num_workers: usize,
    /// Random seed.
    pub seed: u64,
    /// Warm-start schedule.
    pub init_start_times: Option<Vec<IndexedStartTime>>,
    pub presolve: PresolveLevel,
    /// Stop at the first schedule found.
    pub stop_on_feasible: bool,
    /// Solver-specific settings.
    pub specialized: serde_json::Map<String, serde_json::Value>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: None,
            num_workers: 0,
            seed: 0,
            init_start_times: None,
            presolve: PresolveLevel::Auto,
            stop_on_feasible: false,
            specialized: serde_json::Map::new(),
        }
    }
}

impl SolverConfig {
    /// Sets the time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the number of worker threads.
    pub fn with_num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the warm-start schedule.
    pub fn with_init_start_times(mut self, starts: Vec<IndexedStartTime>) -> Self {
        self.init_start_times = Some(starts);
        self
    }

    /// Sets the presolve level.
    pub fn with_presolve(mut self, level: PresolveLevel) -> Self {
        self.presolve = level;
        self
    }

    /// Stops at the first schedule found.
    pub fn with_stop_on_feasible(mut self, stop: bool) -> Self {
        self.stop_on_feasible = stop;
        self
    }

    /// Adds one solver-specific setting.
    pub fn with_specialized(mut self, key: &str, value: serde_json::Value) -> Self {
        self.specialized.insert(key.to_owned(), value);
        self
    }

    /// The time limit as a duration.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// Validates the shared settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit_ms == Some(0) {
            return Err("time limit must be positive or None".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert!(config.time_limit().is_none());
        assert_eq!(config.presolve, PresolveLevel::Auto);
        assert!(config.specialized.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_time_limit_rejected() {
        assert!(SolverConfig::default().with_time_limit_ms(0).validate().is_err());
    }

    #[test]
    fn test_pascal_case_json() {
        let json = r#"{
            "TimeLimit": 250,
            "NumWorkers": 2,
            "Presolve": "Aggressive",
            "InitStartTimes": [{"JobIndex": 1, "StartTime": 4}],
            "Specialized": {"num_swaps": 5}
        }"#;
        let config: SolverConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.time_limit(), Some(Duration::from_millis(250)));
        assert_eq!(config.num_workers, 2);
        assert_eq!(config.presolve, PresolveLevel::Aggressive);
        assert_eq!(config.init_start_times.unwrap()[0].start_time, 4);
        assert_eq!(config.specialized["num_swaps"], 5);
        assert!(!config.stop_on_feasible);
    }
}
