use serde::Serialize;

use super::diagram::StateDiagram;
use super::interval::Interval;
use super::job::Job;
use crate::error::Result;

/// Immutable scheduling instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// Number of machines (only `1` is supported).
    pub machines_count: usize,
    /// Jobs, `jobs[i].index == i`.
    pub jobs: Vec<Job>,
    /// Intervals ordered by index.
    pub intervals: Vec<Interval>,
    /// Common length of every interval.
    pub length_interval: i64,
    /// Power-state diagram of the machine.
    pub diagram: StateDiagram,
    /// Free-form metadata carried through from the instance file.
    pub metadata: Option<serde_json::Value>,
    /// Cached derived tables, see [`ExtendedInstance::load`](crate::extended::ExtendedInstance::load).
    pub serialized_extended_instance: Option<String>,
    /// How long deriving the cached tables took, in milliseconds.
    pub time_for_extended_instance: Option<u64>,
}

#[derive(Serialize)]
struct Definition<'a> {
    machines_count: usize,
    jobs: &'a [Job],
    intervals: &'a [Interval],
    length_interval: i64,
    diagram: &'a StateDiagram,
}

impl Instance {
    /// Creates an instance without metadata or cached tables.
    pub fn new(
        machines_count: usize,
        jobs: Vec<Job>,
        intervals: Vec<Interval>,
        length_interval: i64,
        diagram: StateDiagram,
    ) -> Self {
        Self {
            machines_count,
            jobs,
            intervals,
            length_interval,
            diagram,
            metadata: None,
            serialized_extended_instance: None,
            time_for_extended_instance: None,
        }
    }

    /// Single-machine instance with unit intervals; job `i` gets id `i`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_energysched::model::{Instance, StateDiagram};
    ///
    /// let instance = Instance::single_machine(&[2, 1], &[3, 1, 4, 1, 5, 9], StateDiagram::aghelinejad2017a());
    /// assert_eq!(instance.horizon(), 6);
    /// assert_eq!(instance.total_processing_time(), 3);
    /// ```
    pub fn single_machine(
        processing_times: &[i64],
        energy_costs: &[i64],
        diagram: StateDiagram,
    ) -> Self {
        let jobs = processing_times
            .iter()
            .enumerate()
            .map(|(i, &p)| Job::new(i as u32, i, 0, p))
            .collect();
        Self::new(1, jobs, unit_intervals(energy_costs, 1), 1, diagram)
    }

    /// End of the last interval.
    pub fn horizon(&self) -> i64 {
        self.intervals.last().map_or(0, |interval| interval.end)
    }

    /// Number of intervals.
    pub fn intervals_count(&self) -> usize {
        self.intervals.len()
    }

    /// Sum of all processing times.
    pub fn total_processing_time(&self) -> i64 {
        self.jobs.iter().map(|job| job.processing_time).sum()
    }

    /// Shortest processing time, `None` without jobs.
    pub fn shortest_processing_time(&self) -> Option<i64> {
        self.jobs.iter().map(|job| job.processing_time).min()
    }

    /// Longest processing time, `None` without jobs.
    pub fn longest_processing_time(&self) -> Option<i64> {
        self.jobs.iter().map(|job| job.processing_time).max()
    }

    /// Looks a job up by its id.
    pub fn job_by_id(&self, id: u32) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    /// Hex digest of the instance definition.
    ///
    /// Metadata and cached tables are excluded, so the digest identifies
    /// exactly the data derived tables depend on.
    pub fn digest(&self) -> Result<String> {
        let definition = Definition {
            machines_count: self.machines_count,
            jobs: &self.jobs,
            intervals: &self.intervals,
            length_interval: self.length_interval,
            diagram: &self.diagram,
        };
        let bytes = serde_json::to_vec(&definition)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}

/// Builds intervals `[i * length, (i + 1) * length)` from per-interval costs.
pub fn unit_intervals(energy_costs: &[i64], length_interval: i64) -> Vec<Interval> {
    energy_costs
        .iter()
        .enumerate()
        .map(|(i, &cost)| {
            let start = i as i64 * length_interval;
            Interval::new(i, start, start + length_interval, cost)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_machine_builder() {
        let instance =
            Instance::single_machine(&[3, 1, 2], &[1, 2, 3, 4], StateDiagram::aghelinejad2017a());
        assert_eq!(instance.machines_count, 1);
        assert_eq!(instance.jobs[2].id, 2);
        assert_eq!(instance.jobs[2].index, 2);
        assert_eq!(instance.intervals[3], Interval::new(3, 3, 4, 4));
        assert_eq!(instance.shortest_processing_time(), Some(1));
        assert_eq!(instance.longest_processing_time(), Some(3));
        assert_eq!(instance.job_by_id(1).map(|j| j.processing_time), Some(1));
    }

    #[test]
    fn test_digest_ignores_metadata() {
        let a = Instance::single_machine(&[1], &[1, 2, 3], StateDiagram::aghelinejad2017a());
        let mut b = a.clone();
        b.metadata = Some(serde_json::json!({"name": "x"}));
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());

        let mut c = a.clone();
        c.intervals[1].energy_cost = 7;
        assert_ne!(a.digest().unwrap(), c.digest().unwrap());
    }
}
