//! Local search configuration.

use serde::{Deserialize, Serialize};

/// Configuration parameters for the order-based local search.
///
/// Deserializes from a partial JSON object; missing fields take their
/// default values.
///
/// # Examples
///
/// ```
/// use u_energysched::local_search::LocalSearchConfig;
///
/// let config = LocalSearchConfig::default()
///     .with_num_swaps(10)
///     .with_max_iterations(200)
///     .with_seed(7);
/// assert_eq!(config.num_swaps, 10);
/// assert_eq!(config.num_insertions, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSearchConfig {
    /// Random swap neighbors generated per iteration.
    pub num_swaps: usize,
    /// Random insertion neighbors generated per iteration.
    pub num_insertions: usize,
    /// Iterations per restart (`None` = until the time limit).
    pub max_iterations: Option<usize>,
    /// Number of restarts (`None` = until the time limit).
    pub max_restarts: Option<usize>,
    /// Worker threads for neighbor evaluation (0 = available parallelism).
    pub num_workers: usize,
    /// Random seed.
    pub seed: u64,
    /// Wall-clock budget in milliseconds.
    pub time_limit_ms: Option<u64>,
    /// Job ids in the order used by the first restart.
    pub init_ordered_jobs: Option<Vec<u32>>,
    /// Stop as soon as any schedule is found.
    pub stop_on_feasible: bool,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            num_swaps: 20,
            num_insertions: 20,
            max_iterations: None,
            max_restarts: Some(1),
            num_workers: 0,
            seed: 0,
            time_limit_ms: None,
            init_ordered_jobs: None,
            stop_on_feasible: false,
        }
    }
}

impl LocalSearchConfig {
    /// Sets the number of swap neighbors per iteration.
    pub fn with_num_swaps(mut self, n: usize) -> Self {
        self.num_swaps = n;
        self
    }

    /// Sets the number of insertion neighbors per iteration.
    pub fn with_num_insertions(mut self, n: usize) -> Self {
        self.num_insertions = n;
        self
    }

    /// Bounds the iterations of each restart.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Sets the restart bound (`None` = until the time limit).
    pub fn with_max_restarts(mut self, n: Option<usize>) -> Self {
        self.max_restarts = n;
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

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the job order of the first restart.
    pub fn with_init_ordered_jobs(mut self, ids: Vec<u32>) -> Self {
        self.init_ordered_jobs = Some(ids);
        self
    }

    /// Stops the run at the first schedule found.
    pub fn with_stop_on_feasible(mut self, stop: bool) -> Self {
        self.stop_on_feasible = stop;
        self
    }

    /// Validates the configuration.
    ///
    /// Without a time limit both the iteration and the restart counts must
    /// be bounded.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit_ms == Some(0) {
            return Err("time_limit_ms must be positive or None".into());
        }
        if self.max_restarts == Some(0) {
            return Err("max_restarts must be at least 1 or None".into());
        }
        if self.time_limit_ms.is_none() {
            if self.max_iterations.is_none() {
                return Err("max_iterations is required without a time limit".into());
            }
            if self.max_restarts.is_none() {
                return Err("max_restarts is required without a time limit".into());
            }
        }
        Ok(())
    }
}
