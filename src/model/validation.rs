//! Instance validity oracle.

use serde::{Deserialize, Serialize};

use super::instance::Instance;
use super::interval::Interval;
use super::job::Job;
use crate::error::{Error, Result};

/// Outcome of [`check_instance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstanceStatus {
    Ok,
    EnergyCostIsNegative,
    InvalidMachineIndexForJob,
    NonPositiveProcessingTime,
    NonUnitLengthInterval,
    MultipleOrNoMachines,
    NonPositiveLengthInterval,
    LengthIntervalMismatch,
}

/// Validity status with the offending job or interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceReport {
    pub status: InstanceStatus,
    pub job: Option<Job>,
    pub interval: Option<Interval>,
}

impl InstanceReport {
    fn ok() -> Self {
        Self::with(InstanceStatus::Ok)
    }

    fn with(status: InstanceStatus) -> Self {
        Self {
            status,
            job: None,
            interval: None,
        }
    }

    /// Whether the instance passed every check.
    pub fn is_ok(&self) -> bool {
        self.status == InstanceStatus::Ok
    }

    /// Converts a failed report into [`Error::InvalidInstance`].
    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(Error::InvalidInstance {
                status: self.status,
                job: self.job,
                interval: self.interval,
            })
        }
    }
}

/// Checks the structural invariants of an instance.
///
/// Checks run in a fixed order and stop at the first violation: machine
/// indices of jobs, single machine, positive processing times, non-negative
/// energy costs, unit interval length, positive declared interval length,
/// declared length matching every interval.
///
/// # Examples
///
/// ```
/// use u_energysched::model::{check_instance, Instance, InstanceStatus, StateDiagram};
///
/// let instance = Instance::single_machine(&[1, 0], &[1, 2, 3], StateDiagram::aghelinejad2017a());
/// let report = check_instance(&instance);
/// assert_eq!(report.status, InstanceStatus::NonPositiveProcessingTime);
/// assert_eq!(report.job.map(|j| j.id), Some(1));
/// ```
pub fn check_instance(instance: &Instance) -> InstanceReport {
    if let Some(job) = instance
        .jobs
        .iter()
        .find(|job| job.machine_idx < 0 || job.machine_idx >= instance.machines_count as i64)
    {
        return InstanceReport {
            job: Some(*job),
            ..InstanceReport::with(InstanceStatus::InvalidMachineIndexForJob)
        };
    }

    if instance.machines_count != 1 {
        return InstanceReport::with(InstanceStatus::MultipleOrNoMachines);
    }

    if let Some(job) = instance.jobs.iter().find(|job| job.processing_time <= 0) {
        return InstanceReport {
            job: Some(*job),
            ..InstanceReport::with(InstanceStatus::NonPositiveProcessingTime)
        };
    }

    if let Some(interval) = instance.intervals.iter().find(|i| i.energy_cost < 0) {
        return InstanceReport {
            interval: Some(*interval),
            ..InstanceReport::with(InstanceStatus::EnergyCostIsNegative)
        };
    }

    if let Some(interval) = instance.intervals.iter().find(|i| i.length() != 1) {
        return InstanceReport {
            interval: Some(*interval),
            ..InstanceReport::with(InstanceStatus::NonUnitLengthInterval)
        };
    }

    if instance.length_interval <= 0 {
        return InstanceReport::with(InstanceStatus::NonPositiveLengthInterval);
    }

    if let Some(interval) = instance
        .intervals
        .iter()
        .find(|i| i.length() != instance.length_interval)
    {
        return InstanceReport {
            interval: Some(*interval),
            ..InstanceReport::with(InstanceStatus::LengthIntervalMismatch)
        };
    }

    InstanceReport::ok()
}
