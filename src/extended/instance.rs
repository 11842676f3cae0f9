use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::table::DenseTable;
use super::{gaps, switching};
use crate::error::{Error, Result};
use crate::model::{check_instance, Instance, Interval, Job};
use crate::status::Status;
use crate::timer::Timer;

/// Kind of a power state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Off,
    On,
    Idle,
}

/// An [`Instance`] together with its derived state universe and tables.
///
/// States are indexed off variants first (base off is `0`), then on, then
/// idle. Switching costs and gap lower bounds are computed on demand, once;
/// repeated `compute_*` calls are no-ops.
///
/// # Examples
///
/// ```
/// use u_energysched::extended::ExtendedInstance;
/// use u_energysched::model::{Instance, StateDiagram};
///
/// let instance = Instance::single_machine(&[1], &[1, 2, 3, 4, 5, 6], StateDiagram::aghelinejad2017a());
/// let mut extended = ExtendedInstance::new(instance).unwrap();
/// assert_eq!(extended.earliest_on_interval(), 3);
/// assert_eq!(extended.latest_on_interval(), 3);
///
/// extended.generate_full();
/// assert_eq!(extended.switching_cost(0, 3), Some(25));
/// ```
#[derive(Debug, Clone)]
pub struct ExtendedInstance {
    pub(super) instance: Instance,
    machine_jobs: Vec<Vec<Job>>,
    states: Vec<StateKind>,
    on_state: usize,
    idle_state: usize,
    transition_time: DenseTable<Option<i64>>,
    transition_power: DenseTable<Option<i64>>,
    state_power: Vec<i64>,
    earliest_on_interval: i64,
    latest_on_interval: i64,
    pub(super) prefix_energy_cost: Vec<i64>,
    pub(super) optimal_switching_costs: Option<DenseTable<Option<i64>>>,
    pub(super) full_optimal_switching_costs: Option<DenseTable<Option<i64>>>,
    pub(super) gaps_lower_bounds: Option<DenseTable<Option<i64>>>,
}

impl ExtendedInstance {
    /// Index of the base off state.
    pub const BASE_OFF_STATE: usize = 0;

    /// Validates `instance` and derives the state universe.
    pub fn new(instance: Instance) -> Result<Self> {
        check_instance(&instance).into_result()?;
        instance
            .diagram
            .validate()
            .map_err(Error::InvalidStateDiagram)?;

        let diagram = &instance.diagram;
        let off_count = diagram.off_states_count();
        let on_state = off_count;
        let idle_state = on_state + 1;
        let states_count = off_count + 2;

        let mut states = vec![StateKind::Off; off_count];
        states.push(StateKind::On);
        states.push(StateKind::Idle);

        let mut time = DenseTable::new(states_count, states_count, None);
        let mut power = DenseTable::new(states_count, states_count, None);
        for off in 0..off_count {
            time[(off, on_state)] = Some(diagram.off_on_time[off]);
            time[(on_state, off)] = Some(diagram.on_off_time[off]);
            power[(off, on_state)] = Some(diagram.off_on_power[off]);
            power[(on_state, off)] = Some(diagram.on_off_power[off]);

            time[(off, idle_state)] = diagram.off_idle_time[off];
            time[(idle_state, off)] = diagram.idle_off_time[off];
            power[(off, idle_state)] = diagram.off_idle_power[off];
            power[(idle_state, off)] = diagram.idle_off_power[off];
        }
        for (a, b) in [(on_state, idle_state), (idle_state, on_state)] {
            time[(a, b)] = Some(0);
            power[(a, b)] = Some(0);
        }
        for state in 0..states_count {
            time[(state, state)] = Some(0);
            power[(state, state)] = Some(0);
        }

        let mut state_power = diagram.off_power.clone();
        state_power.push(diagram.on_power);
        state_power.push(diagram.idle_power);

        let intervals = instance.intervals.len() as i64;
        let base = Self::BASE_OFF_STATE;
        let earliest_on_interval = diagram.off_on_time[base].saturating_add(1);
        let latest_on_interval = intervals
            .saturating_sub(diagram.on_off_time[base].saturating_add(1))
            .saturating_sub(1);

        let mut prefix_energy_cost = Vec::with_capacity(instance.intervals.len() + 1);
        prefix_energy_cost.push(0);
        let mut running = 0;
        for interval in &instance.intervals {
            running += interval.energy_cost;
            prefix_energy_cost.push(running);
        }

        let mut machine_jobs = vec![Vec::new(); instance.machines_count];
        for job in &instance.jobs {
            machine_jobs[job.machine_idx as usize].push(*job);
        }

        Ok(Self {
            instance,
            machine_jobs,
            states,
            on_state,
            idle_state,
            transition_time: time,
            transition_power: power,
            state_power,
            earliest_on_interval,
            latest_on_interval,
            prefix_energy_cost,
            optimal_switching_costs: None,
            full_optimal_switching_costs: None,
            gaps_lower_bounds: None,
        })
    }

    /// Builds the extended instance, restoring cached tables when the
    /// instance carries a valid serialized cache.
    ///
    /// A cache that fails validation is ignored and the tables are left to be
    /// recomputed.
    pub fn load(instance: Instance) -> Result<Self> {
        if let Some(blob) = instance.serialized_extended_instance.clone() {
            match Self::from_cache_str(instance.clone(), &blob) {
                Ok(extended) => return Ok(extended),
                Err(err) => warn!(error = %err, "ignoring cached extended instance"),
            }
        }
        Self::new(instance)
    }

    /// The underlying instance.
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn jobs(&self) -> &[Job] {
        &self.instance.jobs
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.instance.intervals
    }

    pub fn intervals_count(&self) -> usize {
        self.instance.intervals.len()
    }

    /// Jobs partitioned by machine index.
    pub fn machine_jobs(&self) -> &[Vec<Job>] {
        &self.machine_jobs
    }

    /// Kind of every state, indexed by state.
    pub fn states(&self) -> &[StateKind] {
        &self.states
    }

    pub fn states_count(&self) -> usize {
        self.states.len()
    }

    pub fn base_off_state(&self) -> usize {
        Self::BASE_OFF_STATE
    }

    pub fn on_state(&self) -> usize {
        self.on_state
    }

    pub fn idle_state(&self) -> usize {
        self.idle_state
    }

    /// Indices of the off variants.
    pub fn off_states(&self) -> std::ops::Range<usize> {
        0..self.on_state
    }

    /// Transition time between two states, `None` if forbidden.
    pub fn transition_time(&self, from: usize, to: usize) -> Option<i64> {
        self.transition_time.value(from, to)
    }

    /// Transition power between two states, `None` if forbidden.
    pub fn transition_power(&self, from: usize, to: usize) -> Option<i64> {
        self.transition_power.value(from, to)
    }

    /// Power drawn while remaining in `state`.
    pub fn state_power(&self, state: usize) -> i64 {
        self.state_power[state]
    }

    pub fn on_power(&self) -> i64 {
        self.state_power[self.on_state]
    }

    /// Earliest interval in which the machine may be on.
    pub fn earliest_on_interval(&self) -> i64 {
        self.earliest_on_interval
    }

    /// Latest interval in which the machine may be on.
    pub fn latest_on_interval(&self) -> i64 {
        self.latest_on_interval
    }

    /// Sum of energy costs of intervals `from..=to`, zero if `to < from`.
    #[inline]
    pub fn cumulative_energy_cost(&self, from: usize, to: usize) -> i64 {
        if to < from {
            return 0;
        }
        self.prefix_energy_cost[to + 1] - self.prefix_energy_cost[from]
    }

    /// Energy cost of drawing `power` during intervals `from..to`.
    #[inline]
    pub fn total_energy_cost(&self, from: usize, to: usize, power: i64) -> i64 {
        if to <= from {
            return 0;
        }
        self.instance.length_interval * power * self.cumulative_energy_cost(from, to - 1)
    }

    /// Pruned switching-cost table, `(intervals + 1)^2`.
    pub fn optimal_switching_costs(&self) -> Option<&DenseTable<Option<i64>>> {
        self.optimal_switching_costs.as_ref()
    }

    /// Unpruned switching-cost table, `(intervals + 1)^2`.
    pub fn full_optimal_switching_costs(&self) -> Option<&DenseTable<Option<i64>>> {
        self.full_optimal_switching_costs.as_ref()
    }

    /// Gap lower bounds; infeasible gaps hold [`GAP_INFEASIBLE`](super::GAP_INFEASIBLE).
    pub fn gaps_lower_bounds(&self) -> Option<&DenseTable<Option<i64>>> {
        self.gaps_lower_bounds.as_ref()
    }

    /// Pruned switching cost of the gap `[begin, end)`.
    pub fn switching_cost(&self, begin: usize, end: usize) -> Option<i64> {
        self.optimal_switching_costs
            .as_ref()
            .and_then(|table| table.value(begin, end))
    }

    /// Lower bound of the gap `[begin, end)`.
    pub fn gap_lower_bound(&self, begin: usize, end: usize) -> Option<i64> {
        self.gaps_lower_bounds
            .as_ref()
            .and_then(|table| table.value(begin, end))
    }

    /// Computes the switching-cost tables if not present yet.
    pub fn compute_optimal_switching_costs(&mut self) {
        self.compute_optimal_switching_costs_within(None);
    }

    /// Budgeted variant of [`compute_optimal_switching_costs`](Self::compute_optimal_switching_costs).
    ///
    /// Returns [`Status::NoSolution`] and leaves the tables absent if the
    /// budget runs out.
    pub fn compute_optimal_switching_costs_within(&mut self, limit: Option<Duration>) -> Status {
        if self.optimal_switching_costs.is_some() {
            return Status::Optimal;
        }
        let timer = Timer::new(limit);
        match switching::compute(self, &timer) {
            Some(tables) => {
                info!(
                    intervals = self.intervals_count(),
                    states = self.states_count(),
                    elapsed_ms = timer.elapsed().as_millis() as u64,
                    "computed optimal switching costs"
                );
                self.optimal_switching_costs = Some(tables.optimal);
                self.full_optimal_switching_costs = Some(tables.full);
                Status::Optimal
            }
            None => Status::NoSolution,
        }
    }

    /// Computes the gap lower bounds if not present yet, computing the
    /// switching costs first when needed.
    pub fn compute_gaps_lower_bounds(&mut self) {
        self.compute_gaps_lower_bounds_within(None);
    }

    /// Budgeted variant of [`compute_gaps_lower_bounds`](Self::compute_gaps_lower_bounds).
    pub fn compute_gaps_lower_bounds_within(&mut self, limit: Option<Duration>) -> Status {
        if self.gaps_lower_bounds.is_some() {
            return Status::Optimal;
        }
        let timer = Timer::new(limit);
        if !self
            .compute_optimal_switching_costs_within(timer.remaining())
            .is_feasible_solution()
        {
            return Status::NoSolution;
        }
        match gaps::compute(self, &timer) {
            Some(table) => {
                info!(
                    intervals = self.intervals_count(),
                    elapsed_ms = timer.elapsed().as_millis() as u64,
                    "computed gap lower bounds"
                );
                self.gaps_lower_bounds = Some(table);
                Status::Optimal
            }
            None => Status::NoSolution,
        }
    }

    /// Computes every derived table.
    pub fn generate_full(&mut self) {
        self.compute_optimal_switching_costs();
        self.compute_gaps_lower_bounds();
    }
}
