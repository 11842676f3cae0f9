use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};
use crate::extended::{DenseTable, ExtendedInstance};
use crate::graph::{LayeredGraph, ShortestPathConfig, ShortestPaths};
use crate::model::{Job, StartTimes};
use crate::status::Status;
use crate::timer::Timer;

/// Outcome of one [`FixedOrderEvaluator::evaluate`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedOrderSolution {
    /// [`Status::Optimal`] when a schedule exists for the order,
    /// [`Status::NoSolution`] when none exists or the budget ran out.
    pub status: Status,
    /// Total energy cost of the schedule.
    pub objective: Option<i64>,
    /// Start time of every job of the order.
    pub start_times: Option<StartTimes>,
    /// Whether the time budget ran out.
    pub time_limit_reached: bool,
}

impl FixedOrderSolution {
    fn no_solution(time_limit_reached: bool) -> Self {
        Self {
            status: Status::NoSolution,
            objective: None,
            start_times: None,
            time_limit_reached,
        }
    }
}

/// Reusable evaluator of job orders on one extended instance.
///
/// The layered graph is kept between calls and only its edges are rebuilt.
/// Cloning gives an independent evaluator for another thread.
///
/// # Examples
///
/// ```
/// use u_energysched::extended::ExtendedInstance;
/// use u_energysched::fixed_order::FixedOrderEvaluator;
/// use u_energysched::model::{Instance, StateDiagram};
///
/// let instance = Instance::single_machine(&[1], &[1, 2, 3, 4, 5, 6], StateDiagram::aghelinejad2017a());
/// let mut ext = ExtendedInstance::new(instance).unwrap();
/// ext.compute_optimal_switching_costs();
///
/// let order = ext.jobs().to_vec();
/// let mut evaluator = FixedOrderEvaluator::new(&ext).unwrap();
/// let solution = evaluator.evaluate(&order, None);
/// assert_eq!(solution.objective, Some(46));
/// assert_eq!(solution.start_times.unwrap().get(&order[0]), Some(3));
/// ```
#[derive(Debug, Clone)]
pub struct FixedOrderEvaluator<'a> {
    instance: &'a ExtendedInstance,
    switching: &'a DenseTable<Option<i64>>,
    graph: LayeredGraph,
}

impl<'a> FixedOrderEvaluator<'a> {
    /// Creates an evaluator sized for all jobs of the instance.
    ///
    /// # Errors
    ///
    /// [`Error::SwitchingCostsNotComputed`] if the optimal switching costs
    /// are absent.
    pub fn new(instance: &'a ExtendedInstance) -> Result<Self> {
        let switching = instance
            .optimal_switching_costs()
            .ok_or(Error::SwitchingCostsNotComputed)?;
        let graph = LayeredGraph::new(instance.intervals_count(), 2 * instance.jobs().len());
        Ok(Self {
            instance,
            switching,
            graph,
        })
    }

    /// The instance this evaluator works on.
    pub fn instance(&self) -> &'a ExtendedInstance {
        self.instance
    }

    /// Finds the cheapest start times that process `order` in sequence.
    pub fn evaluate(&mut self, order: &[Job], limit: Option<Duration>) -> FixedOrderSolution {
        let timer = Timer::new(limit);
        let n = self.instance.intervals_count();

        if order.is_empty() {
            return match self.switching.value(0, n) {
                Some(cost) => FixedOrderSolution {
                    status: Status::Optimal,
                    objective: Some(cost),
                    start_times: Some(StartTimes::new()),
                    time_limit_reached: false,
                },
                None => FixedOrderSolution::no_solution(false),
            };
        }

        if !self.build(order, &timer) {
            debug!(jobs = order.len(), "fixed-order evaluation ran out of time");
            return FixedOrderSolution::no_solution(true);
        }

        let config = ShortestPathConfig::default()
            .with_topological_order(true)
            .with_time_limit(timer.remaining());
        let paths = ShortestPaths::solve(&self.graph, &config);
        if paths.time_limit_reached || timer.limit_reached() {
            debug!(jobs = order.len(), "fixed-order evaluation ran out of time");
            return FixedOrderSolution::no_solution(true);
        }

        let (Some(path), Some(weight)) = (paths.path, paths.path_weight) else {
            return FixedOrderSolution::no_solution(false);
        };
        let start_times = order
            .iter()
            .enumerate()
            .map(|(position, job)| (*job, self.graph.node_col(path[1 + 2 * position]) as i64))
            .collect();

        FixedOrderSolution {
            status: paths.status,
            objective: Some(weight),
            start_times: Some(start_times),
            time_limit_reached: false,
        }
    }

    /// Rebuilds the graph edges for `order`; `false` if the budget ran out.
    fn build(&mut self, order: &[Job], timer: &Timer) -> bool {
        let n = self.instance.intervals_count();
        if self.graph.rows_count() != 2 * order.len() {
            self.graph = LayeredGraph::new(n, 2 * order.len());
        } else {
            self.graph.remove_edges();
        }

        for start in 1..n {
            if let Some(cost) = self.switching.value(0, start) {
                self.graph.add_edge_from_source(0, start, cost);
            }
        }

        let latest_on = self.instance.latest_on_interval();
        let on_power = self.instance.on_power();
        let mut remaining: i64 = order.iter().map(|job| job.processing_time).sum();

        for (position, job) in order.iter().enumerate() {
            if timer.limit_reached() {
                return false;
            }
            let start_layer = 2 * position;
            let completion_layer = start_layer + 1;

            for start in 0..n {
                if !self.graph.has_incoming_edge(start_layer, start) {
                    continue;
                }
                if start as i64 + remaining - 1 > latest_on {
                    break;
                }
                let completion = start + job.processing_time as usize;
                if completion > n - 1 {
                    continue;
                }
                let weight = self.instance.total_energy_cost(start, completion, on_power);
                self.graph
                    .add_edge(start_layer, start, completion_layer, completion, weight);
            }
            remaining -= job.processing_time;

            let last = position + 1 == order.len();
            for completion in 0..n {
                if !self.graph.has_incoming_edge(completion_layer, completion) {
                    continue;
                }
                if last {
                    if let Some(cost) = self.switching.value(completion, n) {
                        self.graph.add_edge_to_sink(completion_layer, completion, cost);
                    }
                    continue;
                }
                for next_start in completion..n {
                    if let Some(cost) = self.switching.value(completion, next_start) {
                        self.graph.add_edge(
                            completion_layer,
                            completion,
                            completion_layer + 1,
                            next_start,
                            cost,
                        );
                    }
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Instance, StateDiagram};
    use crate::test_support::{aghelinejad2019a_tab1, fullhorizon};
    use proptest::prelude::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn by_ids(ext: &ExtendedInstance, ids: &[u32]) -> Vec<Job> {
        ids.iter()
            .map(|&id| *ext.instance().job_by_id(id).unwrap())
            .collect()
    }

    fn starts(solution: &FixedOrderSolution, order: &[Job]) -> Vec<i64> {
        let start_times = solution.start_times.as_ref().unwrap();
        order.iter().map(|job| start_times.get(job).unwrap()).collect()
    }

    #[test]
    fn test_tab1_orders() {
        let ext = aghelinejad2019a_tab1();
        let mut evaluator = FixedOrderEvaluator::new(&ext).unwrap();

        let order = by_ids(&ext, &[0, 1, 2]);
        let solution = evaluator.evaluate(&order, None);
        assert_eq!(solution.status, Status::Optimal);
        assert_eq!(solution.objective, Some(155));
        assert_eq!(starts(&solution, &order), vec![3, 5, 6]);

        let order = by_ids(&ext, &[1, 2, 0]);
        let solution = evaluator.evaluate(&order, None);
        assert_eq!(solution.objective, Some(155));
        assert_eq!(starts(&solution, &order), vec![3, 4, 6]);
    }

    #[test]
    fn test_fullhorizon_orders() {
        let ext = fullhorizon();
        let mut evaluator = FixedOrderEvaluator::new(&ext).unwrap();

        let order = by_ids(&ext, &[0, 1]);
        let solution = evaluator.evaluate(&order, None);
        assert_eq!(solution.objective, Some(48));
        assert_eq!(starts(&solution, &order), vec![3, 4]);

        let order = by_ids(&ext, &[1, 0]);
        let solution = evaluator.evaluate(&order, None);
        assert_eq!(solution.objective, Some(48));
        assert_eq!(starts(&solution, &order), vec![3, 5]);
    }

    #[test]
    fn test_requires_switching_costs() {
        let instance = Instance::single_machine(&[1], &[1; 6], StateDiagram::aghelinejad2017a());
        let ext = ExtendedInstance::new(instance).unwrap();
        assert!(matches!(
            FixedOrderEvaluator::new(&ext),
            Err(Error::SwitchingCostsNotComputed)
        ));
    }

    #[test]
    fn test_horizon_too_short_has_no_solution() {
        // Earliest on interval 3, latest 2.
        let instance = Instance::single_machine(&[1], &[1; 5], StateDiagram::aghelinejad2017a());
        let mut ext = ExtendedInstance::new(instance).unwrap();
        ext.compute_optimal_switching_costs();
        assert!(ext.switching_cost(0, 5).is_none(), "no room left for the job");
        let full = ext.full_optimal_switching_costs().unwrap();
        assert!(full.value(0, 5).is_some(), "staying off is always possible");

        let order = ext.jobs().to_vec();
        let solution = FixedOrderEvaluator::new(&ext).unwrap().evaluate(&order, None);
        assert_eq!(solution.status, Status::NoSolution);
        assert!(!solution.time_limit_reached);
        assert_eq!(solution.objective, None);
    }

    #[test]
    fn test_single_job_by_hand() {
        let instance =
            Instance::single_machine(&[1], &[1, 2, 3, 4, 5, 6], StateDiagram::aghelinejad2017a());
        let mut ext = ExtendedInstance::new(instance).unwrap();
        ext.compute_optimal_switching_costs();
        let order = ext.jobs().to_vec();
        let solution = FixedOrderEvaluator::new(&ext).unwrap().evaluate(&order, None);
        // 25 to switch on, 4 * 4 processing, 5 to switch off.
        assert_eq!(solution.objective, Some(46));
        assert_eq!(starts(&solution, &order), vec![3]);
    }

    #[test]
    fn test_empty_order_leaves_jobs_unscheduled() {
        let ext = fullhorizon();
        let n = ext.intervals_count();
        assert!(ext.switching_cost(0, n).is_none());
        assert!(ext.full_optimal_switching_costs().unwrap().value(0, n).is_some());

        let solution = FixedOrderEvaluator::new(&ext).unwrap().evaluate(&[], None);
        assert_eq!(solution.status, Status::NoSolution);
        assert!(!solution.time_limit_reached);
        assert_eq!(solution.objective, None);
    }

    #[test]
    fn test_empty_order_stays_off_without_jobs() {
        let instance =
            Instance::single_machine(&[], &[1, 2, 3, 4, 5, 6, 7], StateDiagram::aghelinejad2017a());
        let mut ext = ExtendedInstance::new(instance).unwrap();
        ext.compute_optimal_switching_costs();

        let solution = FixedOrderEvaluator::new(&ext).unwrap().evaluate(&[], None);
        assert_eq!(solution.status, Status::Optimal);
        assert_eq!(solution.objective, Some(0));
        assert!(solution.start_times.unwrap().is_empty());
    }

    #[test]
    fn test_exhausted_budget() {
        let ext = aghelinejad2019a_tab1();
        let order = ext.jobs().to_vec();
        let solution = FixedOrderEvaluator::new(&ext)
            .unwrap()
            .evaluate(&order, Some(Duration::ZERO));
        assert_eq!(solution.status, Status::NoSolution);
        assert!(solution.time_limit_reached);
    }

    #[test]
    fn test_reuse_with_shorter_order() {
        let ext = aghelinejad2019a_tab1();
        let mut evaluator = FixedOrderEvaluator::new(&ext).unwrap();
        let full = evaluator.evaluate(&by_ids(&ext, &[0, 1, 2]), None);
        let partial = evaluator.evaluate(&by_ids(&ext, &[1]), None);
        assert!(full.status.is_feasible_solution());
        // Gaps that cannot hold every job are pruned from the table.
        assert_eq!(partial.status, Status::NoSolution);
        assert!(!partial.time_limit_reached);
        let again = evaluator.evaluate(&by_ids(&ext, &[0, 1, 2]), None);
        assert_eq!(again, full);
    }

    #[test]
    fn test_reuse_on_table_without_jobs() {
        let instance =
            Instance::single_machine(&[], &[1, 2, 3, 4, 5, 6, 7], StateDiagram::aghelinejad2017a());
        let mut ext = ExtendedInstance::new(instance).unwrap();
        ext.compute_optimal_switching_costs();
        let a = Job::new(0, 0, 0, 1);
        let b = Job::new(1, 1, 0, 1);
        let mut evaluator = FixedOrderEvaluator::new(&ext).unwrap();

        // 25 to switch on, 4 * 4 + 4 * 5 processing, 6 to switch off.
        let pair = evaluator.evaluate(&[a, b], None);
        assert_eq!(pair.status, Status::Optimal);
        assert_eq!(pair.objective, Some(67));
        assert_eq!(starts(&pair, &[a, b]), vec![3, 4]);

        // 25 to switch on, 4 * 4 processing, 5 to switch off.
        let single = evaluator.evaluate(&[b], None);
        assert_eq!(single.status, Status::Optimal);
        assert_eq!(single.objective, Some(46));
        assert_eq!(starts(&single, &[b]), vec![3]);

        let empty = evaluator.evaluate(&[], None);
        assert_eq!(empty.objective, Some(0));

        assert_eq!(evaluator.evaluate(&[a, b], None), pair);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_objective_matches_start_times_cost(
            processing in prop::collection::vec(1i64..4, 1..5),
            costs in prop::collection::vec(0i64..10, 10..18),
            seed in any::<u64>(),
        ) {
            let instance =
                Instance::single_machine(&processing, &costs, StateDiagram::aghelinejad2017a());
            let mut ext = ExtendedInstance::new(instance).unwrap();
            ext.compute_optimal_switching_costs();
            let mut order = ext.jobs().to_vec();
            order.shuffle(&mut rand::rngs::StdRng::seed_from_u64(seed));

            let solution = FixedOrderEvaluator::new(&ext).unwrap().evaluate(&order, None);
            prop_assume!(solution.status.is_feasible_solution());
            let start_times = solution.start_times.unwrap();
            prop_assert_eq!(start_times.ordered_jobs(), order);
            prop_assert_eq!(start_times.total_energy_cost(&ext).unwrap(), solution.objective.unwrap());
        }
    }
}
