//! Feasibility oracle for start-time assignments.
//!
//! The oracle is the single authority on whether a schedule is valid for an
//! instance. Checks run in a fixed order and the first violation is
//! reported together with the offending jobs.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extended::ExtendedInstance;
use crate::model::{Instance, Job, StartTimes};

/// Outcome of a feasibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeasibilityStatus {
    Feasible,
    JobHasNoStartTime,
    OverlappingOperations,
    JobOutsideHorizon,
    TransitionsDoNotExist,
    ObjectiveNotCorrespondingWithStartTimes,
}

/// Status with the machine and jobs that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeasibilityReport {
    pub status: FeasibilityStatus,
    pub machine: Option<usize>,
    pub job: Option<Job>,
    pub next_job: Option<Job>,
}

impl FeasibilityReport {
    fn with(status: FeasibilityStatus) -> Self {
        Self {
            status,
            machine: None,
            job: None,
            next_job: None,
        }
    }

    fn for_job(status: FeasibilityStatus, job: Job) -> Self {
        Self {
            job: Some(job),
            ..Self::with(status)
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.status == FeasibilityStatus::Feasible
    }
}

/// Checks `start_times` against an extended instance with computed
/// switching costs.
///
/// An `objective` lower than the recomputed energy cost is inconsistent; a
/// higher one is accepted, since a solver need not switch optimally between
/// jobs.
///
/// # Errors
///
/// [`Error::SwitchingCostsNotComputed`] if the switching costs are absent.
///
/// # Examples
///
/// ```
/// use u_energysched::extended::ExtendedInstance;
/// use u_energysched::feasibility::{check, FeasibilityStatus};
/// use u_energysched::model::{Instance, StartTimes, StateDiagram};
///
/// let instance = Instance::single_machine(&[1], &[1, 2, 3, 4, 5, 6], StateDiagram::aghelinejad2017a());
/// let mut ext = ExtendedInstance::new(instance).unwrap();
/// ext.compute_optimal_switching_costs();
///
/// let mut starts = StartTimes::new();
/// starts.insert(ext.jobs()[0], 3);
/// assert!(check(&ext, &starts, Some(46)).unwrap().is_feasible());
///
/// let report = check(&ext, &starts, Some(45)).unwrap();
/// assert_eq!(report.status, FeasibilityStatus::ObjectiveNotCorrespondingWithStartTimes);
/// ```
pub fn check(
    instance: &ExtendedInstance,
    start_times: &StartTimes,
    objective: Option<i64>,
) -> Result<FeasibilityReport> {
    if instance.optimal_switching_costs().is_none() {
        return Err(Error::SwitchingCostsNotComputed);
    }

    if let Some(job) = instance.jobs().iter().find(|job| !start_times.contains(job)) {
        return Ok(FeasibilityReport::for_job(
            FeasibilityStatus::JobHasNoStartTime,
            *job,
        ));
    }

    let horizon = instance.instance().horizon();
    for job in instance.jobs() {
        let start = start_times.get(job).unwrap_or_default();
        if start < 0 || start + job.processing_time > horizon {
            return Ok(FeasibilityReport::for_job(
                FeasibilityStatus::JobOutsideHorizon,
                *job,
            ));
        }
    }

    for (machine, jobs) in instance.machine_jobs().iter().enumerate() {
        let mut ordered: Vec<(i64, Job)> = jobs
            .iter()
            .map(|job| (start_times.get(job).unwrap_or_default(), *job))
            .collect();
        ordered.sort_by_key(|&(start, job)| (start, job.index));
        for pair in ordered.windows(2) {
            let (start, job) = pair[0];
            let (next_start, next_job) = pair[1];
            if start + job.processing_time > next_start {
                return Ok(FeasibilityReport {
                    status: FeasibilityStatus::OverlappingOperations,
                    machine: Some(machine),
                    job: Some(job),
                    next_job: Some(next_job),
                });
            }
        }
    }

    let cost = match start_times.total_energy_cost(instance) {
        Ok(cost) => cost,
        Err(Error::TransitionNotFound { .. } | Error::IndexOutOfRange { .. }) => {
            return Ok(FeasibilityReport::with(
                FeasibilityStatus::TransitionsDoNotExist,
            ));
        }
        Err(err) => return Err(err),
    };

    if objective.is_some_and(|objective| objective < cost) {
        return Ok(FeasibilityReport::with(
            FeasibilityStatus::ObjectiveNotCorrespondingWithStartTimes,
        ));
    }
    Ok(FeasibilityReport::with(FeasibilityStatus::Feasible))
}

/// Like [`check`], deriving the extended instance (or restoring it from the
/// instance's cache) first.
pub fn check_instance(
    instance: &Instance,
    start_times: &StartTimes,
    objective: Option<i64>,
) -> Result<FeasibilityReport> {
    let mut extended = ExtendedInstance::load(instance.clone())?;
    extended.compute_optimal_switching_costs();
    check(&extended, start_times, objective)
}
