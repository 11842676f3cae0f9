//! Start-time assignments and their energy cost.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::instance::Instance;
use super::job::Job;
use super::validation::InstanceStatus;
use crate::error::{Error, Result};
use crate::extended::ExtendedInstance;

/// Start time of the job at position `job_index` of the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexedStartTime {
    pub job_index: usize,
    pub start_time: i64,
}

/// Mapping from jobs to absolute start times.
///
/// Construction may leave jobs out; a missing job is reported when the
/// assignment is costed or checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartTimes {
    starts: HashMap<Job, i64>,
}

impl StartTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves indexed start times against the jobs of `instance`.
    pub fn from_indexed(instance: &Instance, indexed: &[IndexedStartTime]) -> Result<Self> {
        let mut starts = Self::new();
        for entry in indexed {
            let job = instance
                .jobs
                .get(entry.job_index)
                .ok_or(Error::IndexOutOfRange {
                    what: "jobs",
                    index: entry.job_index,
                    len: instance.jobs.len(),
                })?;
            starts.insert(*job, entry.start_time);
        }
        Ok(starts)
    }

    /// Sets the start time of `job`, replacing any previous value.
    pub fn insert(&mut self, job: Job, start: i64) {
        self.starts.insert(job, start);
    }

    pub fn get(&self, job: &Job) -> Option<i64> {
        self.starts.get(job).copied()
    }

    pub fn contains(&self, job: &Job) -> bool {
        self.starts.contains_key(job)
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Job, &i64)> {
        self.starts.iter()
    }

    /// Assigned jobs sorted by start time (ties by job index).
    pub fn ordered_jobs(&self) -> Vec<Job> {
        let mut jobs: Vec<(i64, Job)> = self.starts.iter().map(|(j, &s)| (s, *j)).collect();
        jobs.sort_by_key(|&(start, job)| (start, job.index));
        jobs.into_iter().map(|(_, job)| job).collect()
    }

    /// Assigned jobs per machine, each sorted by start time.
    pub fn ordered_jobs_on_machines(&self, machines_count: usize) -> Vec<Vec<Job>> {
        let mut machines = vec![Vec::new(); machines_count];
        for job in self.ordered_jobs() {
            let Ok(machine) = usize::try_from(job.machine_idx) else {
                continue;
            };
            if let Some(jobs) = machines.get_mut(machine) {
                jobs.push(job);
            }
        }
        machines
    }

    /// Indexed form, sorted by job index.
    pub fn to_indexed(&self) -> Vec<IndexedStartTime> {
        let mut indexed: Vec<IndexedStartTime> = self
            .starts
            .iter()
            .map(|(job, &start)| IndexedStartTime {
                job_index: job.index,
                start_time: start,
            })
            .collect();
        indexed.sort_by_key(|entry| entry.job_index);
        indexed
    }

    fn start(&self, job: &Job) -> Result<i64> {
        self.get(job).ok_or(Error::MissingStartTime { job: job.id })
    }

    /// Interval in which `job` starts; a start on a boundary belongs to the
    /// later interval.
    pub fn start_interval(&self, job: &Job, instance: &Instance) -> Result<usize> {
        let start = self.start(job)?;
        let length = interval_length(instance)?;
        interval_at(instance, start.div_euclid(length))
    }

    /// Interval in which `job` completes; a completion on a boundary belongs
    /// to the earlier interval.
    pub fn completion_interval(&self, job: &Job, instance: &Instance) -> Result<usize> {
        let completion = self.start(job)? + job.processing_time;
        let length = interval_length(instance)?;
        let index = if completion.rem_euclid(length) == 0 {
            completion.div_euclid(length) - 1
        } else {
            completion.div_euclid(length)
        };
        interval_at(instance, index)
    }

    /// Total energy cost of the assignment.
    ///
    /// Switching before the first job, between consecutive jobs and after
    /// the last job is charged at the optimal switching cost; processing is
    /// charged at on-state power.
    ///
    /// # Errors
    ///
    /// [`Error::MissingStartTime`] if a job is unassigned,
    /// [`Error::TransitionNotFound`] if a switching table cell is empty, and
    /// [`Error::SwitchingCostsNotComputed`] if the table is absent.
    pub fn total_energy_cost(&self, instance: &ExtendedInstance) -> Result<i64> {
        let table = instance
            .optimal_switching_costs()
            .ok_or(Error::SwitchingCostsNotComputed)?;
        let base = instance.instance();
        let n = instance.intervals_count();
        let switching = |from: usize, to: usize| {
            table
                .value(from, to)
                .ok_or(Error::TransitionNotFound { from, to })
        };

        if let Some(job) = instance.jobs().iter().find(|job| !self.contains(job)) {
            return Err(Error::MissingStartTime { job: job.id });
        }

        let mut tec = 0;
        for jobs in self.ordered_jobs_on_machines(base.machines_count) {
            let (Some(first), Some(last)) = (jobs.first(), jobs.last()) else {
                tec += switching(0, n)?;
                continue;
            };

            tec += switching(0, self.start_interval(first, base)?)?;
            for pair in jobs.windows(2) {
                let completion = self.completion_interval(&pair[0], base)?;
                let start = self.start_interval(&pair[1], base)?;
                tec += switching(completion + 1, start)?;
            }
            tec += switching(self.completion_interval(last, base)? + 1, n)?;

            for job in &jobs {
                let start = self.start_interval(job, base)?;
                let completion = self.completion_interval(job, base)?;
                tec += instance.total_energy_cost(start, completion + 1, instance.on_power());
            }
        }
        Ok(tec)
    }
}

fn interval_length(instance: &Instance) -> Result<i64> {
    if instance.length_interval > 0 {
        Ok(instance.length_interval)
    } else {
        Err(Error::InvalidInstance {
            status: InstanceStatus::NonPositiveLengthInterval,
            job: None,
            interval: None,
        })
    }
}

fn interval_at(instance: &Instance, index: i64) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < instance.intervals.len())
        .ok_or(Error::IndexOutOfRange {
            what: "intervals",
            index: index.max(0) as usize,
            len: instance.intervals.len(),
        })
}

impl FromIterator<(Job, i64)> for StartTimes {
    fn from_iter<I: IntoIterator<Item = (Job, i64)>>(iter: I) -> Self {
        Self {
            starts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StateDiagram;
    use crate::test_support::{aghelinejad2019a_tab1, starts_for};

    #[test]
    fn test_interval_lookup_on_boundaries() {
        let mut instance =
            Instance::single_machine(&[2], &[1; 4], StateDiagram::aghelinejad2017a());
        instance.length_interval = 1;
        let job = instance.jobs[0];
        let starts: StartTimes = [(job, 1)].into_iter().collect();
        assert_eq!(starts.start_interval(&job, &instance).unwrap(), 1);
        assert_eq!(starts.completion_interval(&job, &instance).unwrap(), 2);
    }

    #[test]
    fn test_interval_lookup_rejects_zero_length() {
        let mut instance =
            Instance::single_machine(&[2], &[1; 4], StateDiagram::aghelinejad2017a());
        instance.length_interval = 0;
        let job = instance.jobs[0];
        let starts: StartTimes = [(job, 1)].into_iter().collect();
        for result in [
            starts.start_interval(&job, &instance),
            starts.completion_interval(&job, &instance),
        ] {
            assert!(matches!(
                result,
                Err(Error::InvalidInstance {
                    status: InstanceStatus::NonPositiveLengthInterval,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_ordered_jobs_and_indexed_form() {
        let instance =
            Instance::single_machine(&[1, 1, 1], &[1; 8], StateDiagram::aghelinejad2017a());
        let j = &instance.jobs;
        let starts: StartTimes = [(j[0], 5), (j[1], 3), (j[2], 4)].into_iter().collect();

        let order: Vec<u32> = starts.ordered_jobs().iter().map(|job| job.id).collect();
        assert_eq!(order, vec![1, 2, 0]);

        let indexed = starts.to_indexed();
        assert_eq!(indexed[0], IndexedStartTime { job_index: 0, start_time: 5 });
        let back = StartTimes::from_indexed(&instance, &indexed).unwrap();
        assert_eq!(back, starts);
    }

    #[test]
    fn test_from_indexed_rejects_unknown_job() {
        let instance = Instance::single_machine(&[1], &[1; 4], StateDiagram::aghelinejad2017a());
        let indexed = [IndexedStartTime { job_index: 3, start_time: 0 }];
        assert!(matches!(
            StartTimes::from_indexed(&instance, &indexed),
            Err(Error::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_total_energy_cost_by_hand() {
        let ext = aghelinejad2019a_tab1();
        let starts = starts_for(&ext, &[(0, 3), (1, 5), (2, 6)]);
        assert_eq!(starts.total_energy_cost(&ext).unwrap(), 155);

        let starts = starts_for(&ext, &[(1, 3), (2, 4), (0, 6)]);
        assert_eq!(starts.total_energy_cost(&ext).unwrap(), 155);
    }

    #[test]
    fn test_total_energy_cost_missing_job() {
        let ext = aghelinejad2019a_tab1();
        let starts = starts_for(&ext, &[(0, 3), (1, 5)]);
        assert!(matches!(
            starts.total_energy_cost(&ext),
            Err(Error::MissingStartTime { job: 2 })
        ));
    }

    #[test]
    fn test_total_energy_cost_pruned_transition() {
        let ext = aghelinejad2019a_tab1();
        // Leaves a one-interval hole inside a window with no slack.
        let starts = starts_for(&ext, &[(0, 3), (1, 5), (2, 7)]);
        assert!(matches!(
            starts.total_energy_cost(&ext),
            Err(Error::TransitionNotFound { .. })
        ));
    }

    #[test]
    fn test_total_energy_cost_requires_tables() {
        let instance = Instance::single_machine(&[1], &[1; 6], StateDiagram::aghelinejad2017a());
        let ext = ExtendedInstance::new(instance).unwrap();
        let starts: StartTimes = [(ext.jobs()[0], 3)].into_iter().collect();
        assert!(matches!(
            starts.total_energy_cost(&ext),
            Err(Error::SwitchingCostsNotComputed)
        ));
    }
}
