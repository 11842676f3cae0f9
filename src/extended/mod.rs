//! Extended instance: derived state universe and precomputed cost tables.
//!
//! - [`ExtendedInstance`] wraps a validated [`Instance`](crate::model::Instance)
//!   with the state-transition tables, the on window and O(1) range costs.
//! - Optimal switching costs fill an `(intervals + 1)^2` table with one
//!   shortest-path query per begin interval, in parallel.
//! - Gap lower bounds combine the switching table with a preemptive
//!   relaxation of the remaining work, in parallel over interval pairs.
//! - [`CacheBlob`] stores the derived tables with a version and digest tag.
//!
//! # References
//!
//! - Benedikt, O., Módos, I., Hanzálek, Z. (2020). "Power of pre-processing:
//!   production scheduling with variable energy pricing and power-saving
//!   states", *Constraints* 25, 300-318.

mod cache;
mod gaps;
mod instance;
mod switching;
mod table;

pub use cache::{CacheBlob, CACHE_VERSION};
pub use gaps::GAP_INFEASIBLE;
pub use instance::{ExtendedInstance, StateKind};
pub use table::DenseTable;
