//! Local search execution engine.
//!
//! # Algorithm
//!
//! 1. Each restart starts from the initial order (first restart, when one
//!    is given) or from a random shuffle of the jobs
//! 2. At each iteration:
//!    a. Draw random swap and insertion neighbors of the incumbent order
//!    b. Evaluate all neighbors in parallel with the fixed-order evaluator
//!    c. Move to the best neighbor unless it is worse than the incumbent
//!    d. Update the global best on strict improvement
//! 3. Terminate on the time limit, cancellation, or the iteration and
//!    restart bounds

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::debug;

use super::best::{BestTracker, Candidate};
use super::config::LocalSearchConfig;
use super::moves::{random_insertions, random_swaps};
use crate::error::{Error, Result};
use crate::extended::ExtendedInstance;
use crate::fixed_order::FixedOrderEvaluator;
use crate::model::{Job, StartTimes};
use crate::status::Status;
use crate::timer::Timer;

/// Result of a local search run.
#[derive(Debug, Clone)]
pub struct LocalSearchResult {
    /// [`Status::Heuristic`] if any schedule was found, else
    /// [`Status::NoSolution`].
    pub status: Status,
    /// Best job order found.
    pub best_order: Option<Vec<Job>>,
    /// Start times of the best order.
    pub start_times: Option<StartTimes>,
    /// Total energy cost of the best schedule.
    pub objective: Option<i64>,
    /// Time from the start of the run until the best schedule was found.
    pub time_to_best: Option<Duration>,
    /// Restarts executed.
    pub restarts: usize,
    /// Iterations executed over all restarts.
    pub iterations: usize,
    /// Best objective after each iteration that had one.
    pub cost_history: Vec<i64>,
    /// Whether the run stopped on the time limit.
    pub time_limit_reached: bool,
    /// Whether the run was cancelled externally.
    pub cancelled: bool,
}

/// Local search runner.
///
/// # Examples
///
/// ```
/// use u_energysched::extended::ExtendedInstance;
/// use u_energysched::local_search::{LocalSearchConfig, LocalSearchRunner};
/// use u_energysched::model::{Instance, StateDiagram};
/// use u_energysched::Status;
///
/// let instance = Instance::single_machine(
///     &[2, 1, 2],
///     &[3, 6, 4, 5, 7, 4, 5, 4, 5, 2],
///     StateDiagram::aghelinejad2017a(),
/// );
/// let mut ext = ExtendedInstance::new(instance).unwrap();
/// ext.generate_full();
///
/// let config = LocalSearchConfig::default().with_max_iterations(20).with_seed(1);
/// let result = LocalSearchRunner::run(&ext, &config).unwrap();
/// assert_eq!(result.status, Status::Heuristic);
/// assert_eq!(result.objective, Some(155));
/// ```
pub struct LocalSearchRunner;

impl LocalSearchRunner {
    /// Runs the local search.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] for an invalid configuration or initial
    /// order, [`Error::SwitchingCostsNotComputed`] if the switching costs
    /// are absent.
    pub fn run(instance: &ExtendedInstance, config: &LocalSearchConfig) -> Result<LocalSearchResult> {
        Self::run_with_cancel(instance, config, None, None)
    }

    /// Runs the local search with an optional warm start and cancellation
    /// token.
    ///
    /// The first restart begins from `config.init_ordered_jobs` if set,
    /// otherwise from the order induced by `init_start_times`. When the
    /// `cancel` flag is set the run stops after the current iteration and
    /// returns the best schedule found so far.
    pub fn run_with_cancel(
        instance: &ExtendedInstance,
        config: &LocalSearchConfig,
        init_start_times: Option<&StartTimes>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<LocalSearchResult> {
        config.validate().map_err(Error::InvalidConfig)?;
        let timer = Timer::new(config.time_limit_ms.map(Duration::from_millis));
        let template = FixedOrderEvaluator::new(instance)?;
        let init_order = initial_order(instance, config, init_start_times)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_workers)
            .build()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut evaluator = template.clone();
        let mut tracker = BestTracker::new();
        let mut cost_history = Vec::new();
        let mut iterations = 0;
        let mut restart = 0;

        let cancelled = || cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed));
        let stopped = |tracker: &BestTracker| {
            timer.limit_reached()
                || cancelled()
                || (config.stop_on_feasible && tracker.best().is_some())
        };

        while !stopped(&tracker) && config.max_restarts.map_or(true, |max| restart < max) {
            let mut order = match (&init_order, restart) {
                (Some(init), 0) => init.clone(),
                _ => {
                    let mut shuffled = instance.jobs().to_vec();
                    shuffled.shuffle(&mut rng);
                    shuffled
                }
            };

            let solution = evaluator.evaluate(&order, timer.remaining());
            let mut incumbent = Candidate::from_solution(order.clone(), solution);
            if let Some(candidate) = &incumbent {
                tracker.offer(candidate);
            }
            debug!(
                restart,
                objective = ?incumbent.as_ref().map(|c| c.objective),
                "local search restart"
            );

            let mut iteration = 0;
            while !stopped(&tracker) && config.max_iterations.map_or(true, |max| iteration < max) {
                let mut moves = random_swaps(&order, config.num_swaps, &mut rng);
                moves.extend(random_insertions(&order, config.num_insertions, &mut rng));

                let best_neighbor = pool.install(|| {
                    moves
                        .par_iter()
                        .enumerate()
                        .map_init(
                            || template.clone(),
                            |evaluator, (index, mv)| {
                                let neighbor = mv.apply(&order);
                                let solution = evaluator.evaluate(&neighbor, timer.remaining());
                                Candidate::from_solution(neighbor, solution)
                                    .map(|candidate| (index, candidate))
                            },
                        )
                        .flatten()
                        .min_by_key(|(index, candidate)| (candidate.objective, *index))
                });

                if let Some((_, neighbor)) = best_neighbor {
                    let accept = incumbent
                        .as_ref()
                        .map_or(true, |current| neighbor.objective <= current.objective);
                    if accept {
                        if tracker.offer(&neighbor) {
                            debug!(
                                restart,
                                iteration,
                                objective = neighbor.objective,
                                "local search improved best"
                            );
                        }
                        order = neighbor.order.clone();
                        incumbent = Some(neighbor);
                    }
                }

                if let Some(best) = tracker.best_objective() {
                    cost_history.push(best);
                }
                iteration += 1;
                iterations += 1;
            }
            restart += 1;
        }

        let time_limit_reached = timer.limit_reached();
        let cancelled = cancelled();
        let time_to_best = tracker.time_to_best();
        let best = tracker.into_best();
        Ok(LocalSearchResult {
            status: if best.is_some() {
                Status::Heuristic
            } else {
                Status::NoSolution
            },
            objective: best.as_ref().map(|b| b.objective),
            start_times: best.as_ref().map(|b| b.start_times.clone()),
            best_order: best.map(|b| b.order),
            time_to_best,
            restarts: restart,
            iterations,
            cost_history,
            time_limit_reached,
            cancelled,
        })
    }
}

/// Order of the first restart: explicit job ids take priority over the
/// order induced by warm-start times.
fn initial_order(
    instance: &ExtendedInstance,
    config: &LocalSearchConfig,
    init_start_times: Option<&StartTimes>,
) -> Result<Option<Vec<Job>>> {
    let jobs = instance.jobs();
    let order = if let Some(ids) = &config.init_ordered_jobs {
        ids.iter()
            .map(|&id| {
                instance
                    .instance()
                    .job_by_id(id)
                    .copied()
                    .ok_or_else(|| Error::InvalidConfig(format!("unknown job id {id} in init order")))
            })
            .collect::<Result<Vec<_>>>()?
    } else if let Some(starts) = init_start_times {
        if let Some(job) = jobs.iter().find(|job| !starts.contains(job)) {
            return Err(Error::MissingStartTime { job: job.id });
        }
        starts.ordered_jobs()
    } else {
        return Ok(None);
    };

    let mut seen: Vec<u32> = order.iter().map(|job| job.id).collect();
    seen.sort_unstable();
    seen.dedup();
    if order.len() != jobs.len() || seen.len() != jobs.len() {
        return Err(Error::InvalidConfig(
            "initial order must contain every job exactly once".into(),
        ));
    }
    Ok(Some(order))
}
