//! Optimal timing of a fixed job order.
//!
//! Given the processing order of the jobs, [`FixedOrderEvaluator`] finds the
//! start times minimizing the total energy cost. The choice is a shortest
//! path in a layered graph with two layers per job (start and completion
//! interval); gaps between consecutive jobs are priced with the precomputed
//! optimal switching costs of the [`ExtendedInstance`](crate::extended::ExtendedInstance).
//!
//! # References
//!
//! - Benedikt, O., Módos, I., Hanzálek, Z. (2020). "Power of pre-processing:
//!   production scheduling with variable energy pricing and power-saving
//!   states", *Constraints* 25, 300-318.

mod evaluator;

pub use evaluator::{FixedOrderEvaluator, FixedOrderSolution};
