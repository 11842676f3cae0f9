//! Order-based local search.
//!
//! The search explores permutations of the jobs. Every candidate order is
//! timed optimally by the [`FixedOrderEvaluator`](crate::fixed_order::FixedOrderEvaluator),
//! so the neighborhood only has to reorder jobs: random swaps of jobs with
//! different processing times and random insertions. Neighbors are
//! evaluated in parallel on a dedicated `rayon` pool; ties are broken by
//! generation order, so results depend only on the seed.
//!
//! # Key Types
//!
//! - [`LocalSearchConfig`]: neighborhood sizes, bounds, seed, warm start
//! - [`LocalSearchRunner`]: executes the restarts
//! - [`LocalSearchResult`]: best schedule and run statistics
//!
//! # References
//!
//! - Benedikt, O., Módos, I., Hanzálek, Z. (2020). "Power of pre-processing:
//!   production scheduling with variable energy pricing and power-saving
//!   states", *Constraints* 25, 300-318.

mod best;
mod config;
mod moves;
mod runner;

pub use config::LocalSearchConfig;
pub use moves::Move;
pub use runner::{LocalSearchResult, LocalSearchRunner};
