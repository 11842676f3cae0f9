//! Optimal switching costs between interval boundaries.
//!
//! One state-transition graph is built over the whole horizon (rows are
//! intervals, columns are power states) and one shortest-path query is run
//! per begin interval. Entry `[b][e]` of the resulting tables is the cheapest
//! way to leave "on" right before interval `b` and be "on" again at interval
//! `e`; near the horizon ends the anchor state is base off instead, and
//! `e == intervals` means "reach the end of the horizon".

use rayon::prelude::*;

use super::instance::ExtendedInstance;
use super::table::DenseTable;
use crate::graph::{LayeredGraph, ShortestPathConfig, ShortestPaths, UNREACHED};
use crate::timer::Timer;

pub(crate) struct SwitchingTables {
    pub optimal: DenseTable<Option<i64>>,
    pub full: DenseTable<Option<i64>>,
}

type RowPair = (Vec<Option<i64>>, Vec<Option<i64>>);

/// Returns `None` if the time budget ran out.
pub(crate) fn compute(instance: &ExtendedInstance, timer: &Timer) -> Option<SwitchingTables> {
    let n = instance.intervals_count();
    if timer.limit_reached() {
        return None;
    }
    if n == 0 {
        return Some(SwitchingTables {
            optimal: DenseTable::new(1, 1, None),
            full: DenseTable::new(1, 1, None),
        });
    }

    let graph = build_state_graph(instance);
    let check = GapCheck::new(instance);

    let mut rows: Vec<RowPair> = (0..n)
        .into_par_iter()
        .map(|begin| row_from(instance, &graph, &check, begin, timer))
        .collect();

    if timer.limit_reached() {
        return None;
    }

    rows.push((vec![None; n + 1], vec![None; n + 1]));
    let (optimal, full): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
    Some(SwitchingTables {
        optimal: DenseTable::from_rows(optimal)?,
        full: DenseTable::from_rows(full)?,
    })
}

fn row_from(
    instance: &ExtendedInstance,
    graph: &LayeredGraph,
    check: &GapCheck,
    begin: usize,
    timer: &Timer,
) -> RowPair {
    let n = instance.intervals_count();
    let mut optimal = vec![None; n + 1];
    let mut full = vec![None; n + 1];
    if timer.limit_reached() {
        return (optimal, full);
    }

    let begin_state = if begin <= 1 {
        instance.base_off_state()
    } else {
        instance.on_state()
    };
    let config = ShortestPathConfig::default()
        .with_source(graph.node_index(begin, begin_state))
        .with_time_limit(timer.remaining());
    let paths = ShortestPaths::solve(graph, &config);
    if !paths.status.is_feasible_solution() {
        return (optimal, full);
    }

    for end in begin..=n {
        let end_state = if end + 1 >= n {
            instance.base_off_state()
        } else {
            instance.on_state()
        };
        let distance = if end == n {
            paths.distances[graph.sink()]
        } else {
            paths.distances[graph.node_index(end, end_state)]
        };

        full[end] = (distance != UNREACHED).then_some(distance);
        if check.admits(instance, begin, end, begin_state, end_state) {
            optimal[end] = full[end];
        }
    }
    (optimal, full)
}

/// Builds the horizon-wide state graph.
///
/// In row 0 the machine can only stay in base off. From every later row all
/// allowed transitions are added; remaining in a state advances one row at
/// the state's power, a transition advances by its duration at the
/// transition's power. Transitions that would leave the horizon are dropped.
pub(crate) fn build_state_graph(instance: &ExtendedInstance) -> LayeredGraph {
    let n = instance.intervals_count();
    let states = instance.states_count();
    let base_off = instance.base_off_state();
    let mut graph = LayeredGraph::new(states, n);

    for row in 0..n {
        if row == 0 {
            add_transition(instance, &mut graph, row, base_off, base_off);
            continue;
        }
        for from in 0..states {
            for to in 0..states {
                add_transition(instance, &mut graph, row, from, to);
            }
        }
    }

    if let Some(last) = instance.intervals().last() {
        graph.add_edge_to_sink(
            n - 1,
            base_off,
            last.energy_cost * instance.state_power(base_off),
        );
    }
    graph
}

fn add_transition(
    instance: &ExtendedInstance,
    graph: &mut LayeredGraph,
    row: usize,
    from: usize,
    to: usize,
) {
    let Some(time) = instance.transition_time(from, to) else {
        return;
    };
    let (duration, power) = if from == to {
        (1, instance.state_power(from))
    } else {
        match (usize::try_from(time), instance.transition_power(from, to)) {
            (Ok(time), Some(power)) => (time, power),
            _ => return,
        }
    };

    let Some(to_row) = row.checked_add(duration) else {
        return;
    };
    if to_row >= graph.rows_count() {
        return;
    }
    let weight = instance.total_energy_cost(row, to_row, power);
    graph.add_edge(row, from, to_row, to, weight);
}

/// Necessary condition for fitting every job outside a gap.
struct GapCheck {
    total_processing_time: i64,
    longest_processing_time: Option<i64>,
}

impl GapCheck {
    fn new(instance: &ExtendedInstance) -> Self {
        Self {
            total_processing_time: instance.instance().total_processing_time(),
            longest_processing_time: instance.instance().longest_processing_time(),
        }
    }

    /// Whether all jobs can possibly be scheduled outside `[begin, end)`.
    fn admits(
        &self,
        instance: &ExtendedInstance,
        begin: usize,
        end: usize,
        begin_state: usize,
        end_state: usize,
    ) -> bool {
        let left = (begin as i64 - instance.earliest_on_interval()).max(0);
        if begin_state == instance.on_state() && left == 0 {
            return false;
        }

        let right = (instance.latest_on_interval() + 1 - end as i64).max(0);
        if end_state == instance.on_state() && right == 0 {
            return false;
        }

        if let Some(longest) = self.longest_processing_time {
            if longest > left && longest > right {
                return false;
            }
        }

        left + right >= self.total_processing_time
    }
}
