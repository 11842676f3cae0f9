//! Solver surface.
//!
//! A [`SolverKind`] is looked up by name and run through the [`Solver`]
//! trait with a [`SolverConfig`]; the outcome is a [`SolverResult`] record
//! in the JSON format shared with external solvers. Every run validates
//! the instance, derives the tables the solver needs within the time limit
//! and, in debug builds, re-checks the returned schedule with the
//! [feasibility oracle](crate::feasibility).

mod config;
mod registry;
mod result;

pub use config::{PresolveLevel, SolverConfig};
pub use registry::{solve_with, Solver, SolverKind};
pub use result::SolverResult;
