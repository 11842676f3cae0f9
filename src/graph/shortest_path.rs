//! Single-source shortest paths over a [`LayeredGraph`].
//!
//! Two strategies are provided:
//!
//! - **Dijkstra** with a linear-scan frontier. Layered graphs here have a
//!   bounded width, so the frontier stays small and a heap does not pay off.
//! - **Topological sweep** for graphs whose edges only lead to higher node
//!   indices. Nodes are settled in index order from an ordered frontier.
//!
//! Both report [`Status::NoSolution`] when the sink is unreachable or the
//! time budget runs out; a partial result is never reported as optimal.

use std::collections::BTreeSet;
use std::time::Duration;

use super::layered::LayeredGraph;
use crate::status::Status;
use crate::timer::Timer;

/// Distance of a node that was never reached.
pub const UNREACHED: i64 = i64::MAX;

/// Options for a shortest-path query.
///
/// # Examples
///
/// ```
/// use u_energysched::graph::ShortestPathConfig;
///
/// let config = ShortestPathConfig::default()
///     .with_topological_order(true)
///     .with_stop_on_reaching_sink(true);
/// assert!(config.topological_order);
/// assert!(config.source.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShortestPathConfig {
    /// Caller guarantees every edge leads to a higher node index.
    pub topological_order: bool,
    /// Stop as soon as the sink is settled.
    pub stop_on_reaching_sink: bool,
    /// Start node (graph source when `None`).
    pub source: Option<usize>,
    /// Wall-clock budget.
    pub time_limit: Option<Duration>,
}

impl ShortestPathConfig {
    /// Enables the topological sweep.
    pub fn with_topological_order(mut self, topological: bool) -> Self {
        self.topological_order = topological;
        self
    }

    /// Enables early exit at the sink.
    pub fn with_stop_on_reaching_sink(mut self, stop: bool) -> Self {
        self.stop_on_reaching_sink = stop;
        self
    }

    /// Starts the search from `node` instead of the graph source.
    pub fn with_source(mut self, node: usize) -> Self {
        self.source = Some(node);
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }
}

/// Result of a shortest-path query.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    /// `Optimal` when the sink was reached, `NoSolution` otherwise.
    pub status: Status,
    /// Distance from the start node, [`UNREACHED`] if not reached.
    pub distances: Vec<i64>,
    /// Predecessor on the shortest path.
    pub predecessors: Vec<Option<usize>>,
    /// Node sequence from the start node to the sink.
    pub path: Option<Vec<usize>>,
    /// Weight of `path`.
    pub path_weight: Option<i64>,
    /// Whether the search was cut short by the time budget.
    pub time_limit_reached: bool,
}

impl ShortestPaths {
    /// Runs the query described by `config` on `graph`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_energysched::graph::{LayeredGraph, ShortestPathConfig, ShortestPaths};
    ///
    /// let mut graph = LayeredGraph::new(2, 1);
    /// graph.add_edge_from_source(0, 0, 5);
    /// graph.add_edge_from_source(0, 1, 1);
    /// graph.add_edge_to_sink(0, 0, 0);
    /// graph.add_edge_to_sink(0, 1, 7);
    ///
    /// let sp = ShortestPaths::solve(&graph, &ShortestPathConfig::default());
    /// assert_eq!(sp.path_weight, Some(5));
    /// assert_eq!(sp.path, Some(vec![0, 1, 3]));
    /// ```
    pub fn solve(graph: &LayeredGraph, config: &ShortestPathConfig) -> Self {
        let timer = Timer::new(config.time_limit);
        let source = config.source.unwrap_or_else(|| graph.source());
        let nodes = graph.nodes_count();

        let mut result = Self {
            status: Status::NoSolution,
            distances: vec![UNREACHED; nodes],
            predecessors: vec![None; nodes],
            path: None,
            path_weight: None,
            time_limit_reached: false,
        };
        result.distances[source] = 0;

        let completed = if config.topological_order {
            result.sweep(graph, source, config.stop_on_reaching_sink, &timer)
        } else {
            result.dijkstra(graph, source, config.stop_on_reaching_sink, &timer)
        };

        if !completed {
            result.time_limit_reached = true;
            return result;
        }

        let sink = graph.sink();
        if result.distances[sink] != UNREACHED {
            result.path_weight = Some(result.distances[sink]);
            result.path = Some(result.reconstruct(source, sink));
            result.status = Status::Optimal;
        }
        result
    }

    /// Returns `false` if the time budget was exhausted.
    fn dijkstra(
        &mut self,
        graph: &LayeredGraph,
        source: usize,
        stop_on_sink: bool,
        timer: &Timer,
    ) -> bool {
        let sink = graph.sink();
        let mut visited = vec![false; graph.nodes_count()];
        let mut discovered = vec![false; graph.nodes_count()];
        let mut frontier = vec![source];
        discovered[source] = true;

        while !frontier.is_empty() {
            if timer.limit_reached() {
                return false;
            }

            let mut best = 0;
            for (pos, &node) in frontier.iter().enumerate().skip(1) {
                if self.distances[node] < self.distances[frontier[best]] {
                    best = pos;
                }
            }
            let node = frontier.swap_remove(best);
            visited[node] = true;

            if stop_on_sink && node == sink {
                break;
            }

            let base = self.distances[node];
            for edge in graph.outgoing(node) {
                if visited[edge.to] {
                    continue;
                }
                let candidate = base + edge.weight;
                if candidate < self.distances[edge.to] {
                    self.distances[edge.to] = candidate;
                    self.predecessors[edge.to] = Some(node);
                }
                if !discovered[edge.to] {
                    discovered[edge.to] = true;
                    frontier.push(edge.to);
                }
            }
        }
        true
    }

    /// Returns `false` if the time budget was exhausted.
    fn sweep(
        &mut self,
        graph: &LayeredGraph,
        source: usize,
        stop_on_sink: bool,
        timer: &Timer,
    ) -> bool {
        let sink = graph.sink();
        let mut frontier = BTreeSet::new();
        frontier.insert(source);

        while let Some(node) = frontier.pop_first() {
            if timer.limit_reached() {
                return false;
            }
            if stop_on_sink && node == sink {
                break;
            }

            let base = self.distances[node];
            for edge in graph.outgoing(node) {
                debug_assert!(edge.to > node, "edge {node} -> {} breaks node order", edge.to);
                let candidate = base + edge.weight;
                if candidate < self.distances[edge.to] {
                    self.distances[edge.to] = candidate;
                    self.predecessors[edge.to] = Some(node);
                }
                frontier.insert(edge.to);
            }
        }
        true
    }

    fn reconstruct(&self, source: usize, sink: usize) -> Vec<usize> {
        let mut path = vec![sink];
        let mut node = sink;
        while node != source {
            match self.predecessors[node] {
                Some(prev) => {
                    path.push(prev);
                    node = prev;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Diamond: s -> (0,0)/(0,1) -> (1,1) -> t, where the cheapest path
    /// takes the longer detour through (1,0).
    fn diamond() -> LayeredGraph {
        let mut graph = LayeredGraph::new(2, 2);
        graph.add_edge_from_source(0, 0, 1);
        graph.add_edge_from_source(0, 1, 4);
        graph.add_edge(0, 0, 1, 1, 5);
        graph.add_edge(0, 1, 1, 1, 1);
        graph.add_edge(0, 0, 1, 0, 2);
        graph.add_edge(1, 0, 1, 1, 1);
        graph.add_edge_to_sink(1, 1, 0);
        graph
    }

    #[test]
    fn test_dijkstra_finds_cheapest_path() {
        let graph = diamond();
        let sp = ShortestPaths::solve(&graph, &ShortestPathConfig::default());

        assert_eq!(sp.status, Status::Optimal);
        assert_eq!(sp.path_weight, Some(4));
        let expected = vec![
            graph.source(),
            graph.node_index(0, 0),
            graph.node_index(1, 0),
            graph.node_index(1, 1),
            graph.sink(),
        ];
        assert_eq!(sp.path, Some(expected));
    }

    #[test]
    fn test_topological_matches_dijkstra() {
        let graph = diamond();
        let dijkstra = ShortestPaths::solve(&graph, &ShortestPathConfig::default());
        let sweep = ShortestPaths::solve(
            &graph,
            &ShortestPathConfig::default().with_topological_order(true),
        );
        assert_eq!(dijkstra.distances, sweep.distances);
        assert_eq!(dijkstra.path, sweep.path);
    }

    #[test]
    fn test_stop_on_sink_keeps_sink_distance() {
        let graph = diamond();
        let sp = ShortestPaths::solve(
            &graph,
            &ShortestPathConfig::default().with_stop_on_reaching_sink(true),
        );
        assert_eq!(sp.path_weight, Some(4));
    }

    #[test]
    fn test_disconnected_source_is_no_solution() {
        let mut graph = LayeredGraph::new(2, 2);
        graph.add_edge(0, 0, 1, 0, 1);
        graph.add_edge_to_sink(1, 0, 0);
        let sp = ShortestPaths::solve(&graph, &ShortestPathConfig::default());

        assert_eq!(sp.status, Status::NoSolution);
        assert!(sp.path.is_none());
        assert!(!sp.time_limit_reached);
        assert_eq!(sp.distances[graph.sink()], UNREACHED);
    }

    #[test]
    fn test_custom_source() {
        let graph = diamond();
        let start = graph.node_index(0, 1);
        let sp = ShortestPaths::solve(&graph, &ShortestPathConfig::default().with_source(start));

        assert_eq!(sp.path_weight, Some(1));
        assert_eq!(sp.distances[graph.source()], UNREACHED);
        assert_eq!(sp.path.as_ref().map(|p| p[0]), Some(start));
    }

    #[test]
    fn test_zero_weight_cycle_is_tolerated() {
        let mut graph = LayeredGraph::new(2, 1);
        graph.add_edge_from_source(0, 0, 2);
        graph.add_edge(0, 0, 0, 1, 0);
        graph.add_edge(0, 1, 0, 0, 0);
        graph.add_edge_to_sink(0, 1, 3);
        let sp = ShortestPaths::solve(&graph, &ShortestPathConfig::default());
        assert_eq!(sp.path_weight, Some(5));
    }

    #[test]
    fn test_exhausted_budget_reports_no_solution() {
        let graph = diamond();
        let sp = ShortestPaths::solve(
            &graph,
            &ShortestPathConfig::default().with_time_limit(Some(Duration::ZERO)),
        );
        assert_eq!(sp.status, Status::NoSolution);
        assert!(sp.time_limit_reached);
        assert!(sp.path_weight.is_none());
    }
}
