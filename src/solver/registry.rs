//! Solver registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::SolverConfig;
use super::result::{millis, SolverResult};
use crate::error::{Error, Result};
use crate::extended::ExtendedInstance;
use crate::feasibility;
use crate::fixed_order::FixedOrderEvaluator;
use crate::local_search::{LocalSearchConfig, LocalSearchRunner};
use crate::model::{Instance, Job, StartTimes};
use crate::status::Status;
use crate::timer::Timer;

/// A scheduling solver.
pub trait Solver {
    /// Solves `instance` and returns the result record.
    fn solve(&self, config: &SolverConfig, instance: &Instance) -> Result<SolverResult>;
}

/// The solvers of this crate.
///
/// # Examples
///
/// ```
/// use u_energysched::model::{Instance, StateDiagram};
/// use u_energysched::solver::{Solver, SolverConfig, SolverKind};
/// use u_energysched::Status;
///
/// let instance = Instance::single_machine(&[1, 2], &[1, 2, 3, 2, 1, 2, 3, 1], StateDiagram::aghelinejad2017a());
/// let solver = SolverKind::from_name("LocalSearch").unwrap();
/// let config = SolverConfig::default()
///     .with_seed(1)
///     .with_specialized("max_iterations", 10.into());
/// let result = solver.solve(&config, &instance).unwrap();
/// assert_eq!(result.status, Status::Heuristic);
/// assert_eq!(result.objective, Some(48));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverKind {
    /// Order-based local search; specialized settings are a
    /// [`LocalSearchConfig`].
    LocalSearch,
    /// Optimal timing of one order: the order induced by the warm start, or
    /// the instance's job order.
    FixedOrder,
}

impl SolverKind {
    pub const ALL: [SolverKind; 2] = [SolverKind::LocalSearch, SolverKind::FixedOrder];

    /// Looks a solver up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownSolver(name.to_owned()))
    }

    pub fn name(self) -> &'static str {
        match self {
            SolverKind::LocalSearch => "LocalSearch",
            SolverKind::FixedOrder => "FixedOrder",
        }
    }

    /// Tables the solver needs, derived within the time budget.
    fn prepare(self, extended: &mut ExtendedInstance, timer: &Timer) -> Status {
        match self {
            SolverKind::LocalSearch => extended.compute_gaps_lower_bounds_within(timer.remaining()),
            SolverKind::FixedOrder => {
                extended.compute_optimal_switching_costs_within(timer.remaining())
            }
        }
    }

    fn run(
        self,
        config: &SolverConfig,
        extended: &ExtendedInstance,
        timer: &Timer,
    ) -> Result<SolverResult> {
        let init = config
            .init_start_times
            .as_deref()
            .map(|indexed| StartTimes::from_indexed(extended.instance(), indexed))
            .transpose()?;

        match self {
            SolverKind::LocalSearch => {
                let mut ls_config: LocalSearchConfig =
                    serde_json::from_value(serde_json::Value::Object(config.specialized.clone()))?;
                ls_config.num_workers = config.num_workers;
                ls_config.seed = config.seed;
                ls_config.time_limit_ms = timer.remaining().map(|left| millis(left).max(1));
                ls_config.stop_on_feasible |= config.stop_on_feasible;

                let outcome =
                    LocalSearchRunner::run_with_cancel(extended, &ls_config, init.as_ref(), None)?;
                let mut result = SolverResult::no_solution(
                    outcome.time_limit_reached || timer.limit_reached(),
                    timer.elapsed(),
                );
                result.status = outcome.status;
                result.objective = outcome.objective;
                result.start_times = outcome
                    .start_times
                    .map(|starts| starts.to_indexed())
                    .unwrap_or_default();
                result.time_to_best_ms = outcome.time_to_best.map(millis);
                result
                    .additional_info
                    .insert("Restarts".into(), outcome.restarts.into());
                result
                    .additional_info
                    .insert("Iterations".into(), outcome.iterations.into());
                Ok(result)
            }
            SolverKind::FixedOrder => {
                let order: Vec<Job> = match &init {
                    Some(starts) => {
                        if let Some(job) = extended.jobs().iter().find(|job| !starts.contains(job)) {
                            return Err(Error::MissingStartTime { job: job.id });
                        }
                        starts.ordered_jobs()
                    }
                    None => extended.jobs().to_vec(),
                };
                let solution = FixedOrderEvaluator::new(extended)?.evaluate(&order, timer.remaining());
                let mut result = SolverResult::no_solution(solution.time_limit_reached, timer.elapsed());
                if solution.status.is_feasible_solution() {
                    result.status = Status::Heuristic;
                    result.objective = solution.objective;
                    result.start_times = solution
                        .start_times
                        .map(|starts| starts.to_indexed())
                        .unwrap_or_default();
                    result.time_to_best_ms = Some(result.running_time_ms);
                }
                Ok(result)
            }
        }
    }
}

impl Solver for SolverKind {
    /// Validates the inputs, derives the tables the solver needs and runs
    /// it. In debug builds every schedule returned is checked by the
    /// feasibility oracle and a violation panics.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedInstance`] for multi-machine instances,
    /// [`Error::InvalidInstance`] and [`Error::InvalidConfig`] for invalid
    /// inputs.
    fn solve(&self, config: &SolverConfig, instance: &Instance) -> Result<SolverResult> {
        let timer = Timer::new(config.time_limit());
        config.validate().map_err(Error::InvalidConfig)?;
        if instance.machines_count != 1 {
            return Err(Error::UnsupportedInstance(format!(
                "{} handles single-machine instances only, got {} machines",
                self.name(),
                instance.machines_count
            )));
        }

        let mut extended = ExtendedInstance::load(instance.clone())?;
        if !self.prepare(&mut extended, &timer).is_feasible_solution() {
            info!(solver = self.name(), "time limit reached while deriving tables");
            return Ok(SolverResult::no_solution(true, timer.elapsed()));
        }

        let mut result = self.run(config, &extended, &timer)?;
        result.metadata = instance.metadata.clone();
        result.running_time_ms = millis(timer.elapsed());
        info!(
            solver = self.name(),
            status = ?result.status,
            objective = ?result.objective,
            running_time_ms = result.running_time_ms,
            "solver finished"
        );

        if cfg!(debug_assertions) && result.has_solution() {
            let starts = result.start_times(instance)?;
            let report = feasibility::check(&extended, &starts, result.objective)?;
            assert!(
                report.is_feasible(),
                "{} returned an infeasible schedule: {report:?}",
                self.name()
            );
        }
        Ok(result)
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::from_name(name)
    }
}

/// Solves with the solver registered under `name`.
pub fn solve_with(name: &str, config: &SolverConfig, instance: &Instance) -> Result<SolverResult> {
    SolverKind::from_name(name)?.solve(config, instance)
}
