//! JSON instance files.
//!
//! Files use PascalCase keys. Intervals are not stored explicitly: interval
//! `i` spans `[i * LengthInterval, (i + 1) * LengthInterval)` and carries
//! `EnergyCosts[i]`. A job's index is its position in `Jobs`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::diagram::StateDiagram;
use super::instance::{unit_intervals, Instance};
use super::job::Job;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JobRecord {
    id: u32,
    machine_idx: i64,
    processing_time: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstanceFile {
    machines_count: usize,
    jobs: Vec<JobRecord>,
    energy_costs: Vec<i64>,
    length_interval: i64,
    off_on_time: Vec<i64>,
    on_off_time: Vec<i64>,
    off_on_power_consumption: Vec<i64>,
    on_off_power_consumption: Vec<i64>,
    off_idle_time: Vec<Option<i64>>,
    idle_off_time: Vec<Option<i64>>,
    off_idle_power_consumption: Vec<Option<i64>>,
    idle_off_power_consumption: Vec<Option<i64>>,
    on_power_consumption: i64,
    idle_power_consumption: i64,
    off_power_consumption: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    serialized_extended_instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_for_extended_instance: Option<u64>,
}

impl From<InstanceFile> for Instance {
    fn from(file: InstanceFile) -> Self {
        let jobs = file
            .jobs
            .iter()
            .enumerate()
            .map(|(index, r)| Job::new(r.id, index, r.machine_idx, r.processing_time))
            .collect();
        let diagram = StateDiagram {
            off_on_time: file.off_on_time,
            on_off_time: file.on_off_time,
            off_on_power: file.off_on_power_consumption,
            on_off_power: file.on_off_power_consumption,
            off_idle_time: file.off_idle_time,
            idle_off_time: file.idle_off_time,
            off_idle_power: file.off_idle_power_consumption,
            idle_off_power: file.idle_off_power_consumption,
            on_power: file.on_power_consumption,
            idle_power: file.idle_power_consumption,
            off_power: file.off_power_consumption,
        };
        Instance {
            machines_count: file.machines_count,
            jobs,
            intervals: unit_intervals(&file.energy_costs, file.length_interval),
            length_interval: file.length_interval,
            diagram,
            metadata: file.metadata,
            serialized_extended_instance: file.serialized_extended_instance,
            time_for_extended_instance: file.time_for_extended_instance,
        }
    }
}

impl From<&Instance> for InstanceFile {
    fn from(instance: &Instance) -> Self {
        let diagram = instance.diagram.clone();
        Self {
            machines_count: instance.machines_count,
            jobs: instance
                .jobs
                .iter()
                .map(|job| JobRecord {
                    id: job.id,
                    machine_idx: job.machine_idx,
                    processing_time: job.processing_time,
                })
                .collect(),
            energy_costs: instance.intervals.iter().map(|i| i.energy_cost).collect(),
            length_interval: instance.length_interval,
            off_on_time: diagram.off_on_time,
            on_off_time: diagram.on_off_time,
            off_on_power_consumption: diagram.off_on_power,
            on_off_power_consumption: diagram.on_off_power,
            off_idle_time: diagram.off_idle_time,
            idle_off_time: diagram.idle_off_time,
            off_idle_power_consumption: diagram.off_idle_power,
            idle_off_power_consumption: diagram.idle_off_power,
            on_power_consumption: diagram.on_power,
            idle_power_consumption: diagram.idle_power,
            off_power_consumption: diagram.off_power,
            metadata: instance.metadata.clone(),
            serialized_extended_instance: instance.serialized_extended_instance.clone(),
            time_for_extended_instance: instance.time_for_extended_instance,
        }
    }
}

/// Parses an instance from JSON text.
///
/// # Examples
///
/// ```
/// use u_energysched::model::parse_instance;
///
/// let json = r#"{
///     "MachinesCount": 1,
///     "Jobs": [{"Id": 7, "MachineIdx": 0, "ProcessingTime": 2}],
///     "EnergyCosts": [1, 1, 1, 1, 1, 1],
///     "LengthInterval": 1,
///     "OffOnTime": [2], "OnOffTime": [1],
///     "OffOnPowerConsumption": [5], "OnOffPowerConsumption": [1],
///     "OffIdleTime": [null], "IdleOffTime": [null],
///     "OffIdlePowerConsumption": [null], "IdleOffPowerConsumption": [null],
///     "OnPowerConsumption": 4, "IdlePowerConsumption": 2,
///     "OffPowerConsumption": [0]
/// }"#;
/// let instance = parse_instance(json).unwrap();
/// assert_eq!(instance.jobs[0].id, 7);
/// assert_eq!(instance.horizon(), 6);
/// ```
pub fn parse_instance(json: &str) -> Result<Instance> {
    let file: InstanceFile = serde_json::from_str(json)?;
    Ok(file.into())
}

/// Reads an instance file.
pub fn read_instance(path: impl AsRef<Path>) -> Result<Instance> {
    let text = fs::read_to_string(path)?;
    parse_instance(&text)
}

/// Serializes an instance to pretty-printed JSON.
pub fn instance_to_json(instance: &Instance) -> Result<String> {
    Ok(serde_json::to_string_pretty(&InstanceFile::from(instance))?)
}

/// Writes an instance file.
pub fn write_instance(instance: &Instance, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, instance_to_json(instance)?)?;
    Ok(())
}
