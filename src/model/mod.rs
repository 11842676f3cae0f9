//! Scheduling instance data model.
//!
//! An [`Instance`] holds the jobs, the horizon split into equal-length
//! [`Interval`]s with per-interval energy prices, and the machine's
//! [`StateDiagram`]. [`check_instance`] validates the structural invariants
//! and [`StartTimes`] represents a candidate schedule.
//!
//! Instances are exchanged as PascalCase JSON files, see [`parse_instance`].

mod diagram;
mod instance;
mod interval;
mod io;
mod job;
mod start_times;
mod validation;

pub use diagram::StateDiagram;
pub use instance::{unit_intervals, Instance};
pub use interval::Interval;
pub use io::{instance_to_json, parse_instance, read_instance, write_instance};
pub use job::Job;
pub use start_times::{IndexedStartTime, StartTimes};
pub use validation::{check_instance, InstanceReport, InstanceStatus};
