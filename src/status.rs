//! Outcome status shared by every algorithm and solver.

use serde::{Deserialize, Serialize};

/// Status of an algorithm after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// No solution was found, either because none exists or the budget ran out.
    NoSolution,
    /// Proven optimal solution.
    Optimal,
    /// The problem was proven infeasible.
    Infeasible,
    /// Feasible solution without an optimality proof.
    Heuristic,
}

impl Status {
    /// Whether the status carries a usable solution.
    pub fn is_feasible_solution(self) -> bool {
        matches!(self, Status::Optimal | Status::Heuristic)
    }
}
