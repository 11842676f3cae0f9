//! Energy-aware single-machine scheduling.
//!
//! Schedules non-preemptive jobs on one machine over a horizon split into
//! intervals with time-varying energy prices. Between jobs the machine can
//! stay on, idle, or switch to one of several off states, each transition
//! taking time and drawing power. The goal is the schedule with the least
//! total energy cost (TEC).
//!
//! - [`graph`]: layered graphs and shortest paths over them.
//! - [`model`]: instances, power-state diagrams, start times, JSON files.
//! - [`extended`]: derived tables, above all the optimal switching cost of
//!   every gap between two interval boundaries, and gap lower bounds.
//! - [`fixed_order`]: optimal start times for a given job order.
//! - [`local_search`]: parallel order-based local search.
//! - [`feasibility`]: the oracle that validates any schedule.
//! - [`solver`]: named solvers, shared configuration and result records.
//!
//! # Examples
//!
//! ```
//! use u_energysched::model::{Instance, StateDiagram};
//! use u_energysched::solver::{Solver, SolverConfig, SolverKind};
//!
//! let instance = Instance::single_machine(
//!     &[2, 1, 2],
//!     &[3, 6, 4, 5, 7, 4, 5, 4, 5, 2],
//!     StateDiagram::aghelinejad2017a(),
//! );
//! let config = SolverConfig::default().with_specialized("max_iterations", 5.into());
//! let result = SolverKind::LocalSearch.solve(&config, &instance).unwrap();
//! assert_eq!(result.objective, Some(155));
//! ```

pub mod error;
pub mod extended;
pub mod feasibility;
pub mod fixed_order;
pub mod graph;
pub mod local_search;
pub mod model;
pub mod solver;
pub mod status;
pub mod timer;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use status::Status;
pub use timer::Timer;
