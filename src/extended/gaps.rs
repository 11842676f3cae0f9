//! Lower bounds on schedules that keep the machine off during a gap.
//!
//! The bound for gap `[b, e)` is its switching cost plus the on-state cost of
//! the shortest job placed right before `b` and right after `e`, plus the
//! remaining work processed preemptively in the cheapest intervals left
//! outside the gap.

use rayon::prelude::*;

use super::instance::ExtendedInstance;
use super::table::DenseTable;
use crate::timer::Timer;

/// Bound of a gap that no feasible schedule can contain.
pub const GAP_INFEASIBLE: i64 = i64::MAX;

/// Returns `None` if the time budget ran out.
pub(crate) fn compute(instance: &ExtendedInstance, timer: &Timer) -> Option<DenseTable<Option<i64>>> {
    let switching = instance.optimal_switching_costs()?;
    let bounds = GapBounds::new(instance, switching);
    let n = instance.intervals_count();

    let rows: Vec<Vec<Option<i64>>> = (0..=n)
        .into_par_iter()
        .map(|begin| {
            let mut row = vec![None; n + 1];
            if timer.limit_reached() {
                return row;
            }
            for (end, cell) in row.iter_mut().enumerate().skip(begin) {
                *cell = Some(bounds.bound(begin, end));
            }
            row
        })
        .collect();

    if timer.limit_reached() {
        return None;
    }
    DenseTable::from_rows(rows)
}

struct GapBounds<'a> {
    instance: &'a ExtendedInstance,
    switching: &'a DenseTable<Option<i64>>,
    jobs_count: usize,
    shortest: i64,
    total: i64,
    /// Intervals inside the on window as `(index, cost)`, cheapest first.
    cheapest: Vec<(i64, i64)>,
}

impl<'a> GapBounds<'a> {
    fn new(instance: &'a ExtendedInstance, switching: &'a DenseTable<Option<i64>>) -> Self {
        let earliest = instance.earliest_on_interval();
        let latest = instance.latest_on_interval();
        let mut cheapest: Vec<(i64, i64)> = instance
            .intervals()
            .iter()
            .map(|interval| (interval.index as i64, interval.energy_cost))
            .filter(|&(index, _)| index >= earliest && index <= latest)
            .collect();
        cheapest.sort_by_key(|&(_, cost)| cost);

        Self {
            instance,
            switching,
            jobs_count: instance.jobs().len(),
            shortest: instance.instance().shortest_processing_time().unwrap_or(0),
            total: instance.instance().total_processing_time(),
            cheapest,
        }
    }

    fn bound(&self, begin: usize, end: usize) -> i64 {
        let Some(switching) = self.switching.value(begin, end) else {
            return GAP_INFEASIBLE;
        };
        if self.jobs_count < 2 {
            return switching;
        }

        let instance = self.instance;
        let (b, e) = (begin as i64, end as i64);
        let spt = self.shortest;
        let last = instance.intervals_count() as i64 - 1;

        let left_occupied = b - spt < instance.earliest_on_interval();
        let right_occupied = e + spt - 1 > instance.latest_on_interval();
        if (b == 1 && right_occupied)
            || (e == last && left_occupied)
            || (b > 1 && e < last && (left_occupied || right_occupied))
        {
            return GAP_INFEASIBLE;
        }

        let on_power = instance.on_power();
        let mut bound = switching;
        let mut remaining = self.total;

        if b > 1 {
            if b - spt < 0 {
                return GAP_INFEASIBLE;
            }
            bound += instance.total_energy_cost((b - spt) as usize, begin, on_power);
            remaining -= spt;
        }
        if e < last {
            if e + spt > last + 1 {
                return GAP_INFEASIBLE;
            }
            bound += instance.total_energy_cost(end, (e + spt) as usize, on_power);
            remaining -= spt;
        }

        let remaining = remaining.max(0) as usize;
        let mut available = self
            .cheapest
            .iter()
            .filter(|&&(index, _)| index < b - spt || index >= e + spt)
            .map(|&(_, cost)| cost);
        let mut packed = 0;
        for _ in 0..remaining {
            match available.next() {
                Some(cost) => packed += cost,
                None => return GAP_INFEASIBLE,
            }
        }

        bound + instance.instance().length_interval * on_power * packed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_order::FixedOrderEvaluator;
    use crate::model::{Instance, StateDiagram};
    use proptest::prelude::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn extended(processing: &[i64], costs: &[i64], diagram: StateDiagram) -> ExtendedInstance {
        let mut ext =
            ExtendedInstance::new(Instance::single_machine(processing, costs, diagram)).unwrap();
        ext.generate_full();
        ext
    }

    #[test]
    fn test_pruned_switching_gives_infeasible_bound() {
        let ext = extended(&[2, 2], &[1; 10], StateDiagram::aghelinejad2017a());
        assert_eq!(ext.switching_cost(5, 7), None);
        assert_eq!(ext.gap_lower_bound(5, 7), Some(GAP_INFEASIBLE));
    }

    #[test]
    fn test_single_job_bound_is_switching_cost() {
        let ext = extended(&[1], &[1, 2, 3, 4, 5, 6], StateDiagram::aghelinejad2017a());
        assert_eq!(ext.gap_lower_bound(0, 3), ext.switching_cost(0, 3));
        assert_eq!(ext.gap_lower_bound(4, 6), ext.switching_cost(4, 6));
    }

    #[test]
    fn test_lower_triangle_is_empty() {
        let ext = extended(&[1, 2], &[2; 9], StateDiagram::aghelinejad2017a());
        let table = ext.gaps_lower_bounds().unwrap();
        assert_eq!(table.rows(), 10);
        assert_eq!(table.value(4, 3), None);
        assert!(table.value(3, 4).is_some());
    }

    #[test]
    fn test_leading_gap_bound_by_hand() {
        // Jobs 1 and 2 on costs 1..=8; on window 3..=5.
        let ext = extended(&[1, 2], &[1, 2, 3, 2, 1, 2, 3, 1], StateDiagram::aghelinejad2017a());
        // switch(0, 3) = 5 * (2 + 3) = 25; shortest job right after: 4 * 2 = 8;
        // remaining 2 units in the cheapest of {4, 5}: 4 * (1 + 2) = 12.
        assert_eq!(ext.switching_cost(0, 3), Some(25));
        assert_eq!(ext.gap_lower_bound(0, 3), Some(45));
    }

    #[test]
    fn test_idempotent() {
        let mut ext = extended(&[1, 2, 1], &[4, 2, 5, 1, 3, 3, 2, 1, 6, 2], StateDiagram::aghelinejad2017a());
        let first = ext.gaps_lower_bounds().cloned();
        ext.compute_gaps_lower_bounds();
        assert_eq!(ext.gaps_lower_bounds().cloned(), first);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_bound_never_exceeds_schedule_cost(
            processing in prop::collection::vec(1i64..4, 2..5),
            costs in prop::collection::vec(0i64..10, 12..20),
            seed in any::<u64>(),
        ) {
            let ext = extended(&processing, &costs, StateDiagram::aghelinejad2017a());
            let mut order = ext.jobs().to_vec();
            order.shuffle(&mut rand::rngs::StdRng::seed_from_u64(seed));

            let mut evaluator = FixedOrderEvaluator::new(&ext).unwrap();
            let solution = evaluator.evaluate(&order, None);
            prop_assume!(solution.status.is_feasible_solution());
            let objective = solution.objective.unwrap();
            let starts = solution.start_times.unwrap();

            let n = ext.intervals_count();
            let mut gaps = Vec::new();
            let mut begin = 0usize;
            for job in &order {
                let start = starts.get(job).unwrap() as usize;
                gaps.push((begin, start));
                begin = start + job.processing_time as usize;
            }
            gaps.push((begin, n));

            for (b, e) in gaps {
                let bound = ext.gap_lower_bound(b, e).unwrap();
                prop_assert!(bound <= objective, "gap [{}, {}) bound {} > cost {}", b, e, bound, objective);
            }
        }
    }
}
