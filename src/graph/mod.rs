//! Layered graphs and shortest paths.
//!
//! The switching-cost table and the fixed-order evaluator both reduce to
//! shortest-path queries over graphs whose inner nodes form a grid: rows are
//! time (intervals, or job start/completion layers) and columns are power
//! states or intervals.

mod layered;
mod shortest_path;

pub use layered::{Edge, LayeredGraph};
pub use shortest_path::{ShortestPathConfig, ShortestPaths, UNREACHED};
