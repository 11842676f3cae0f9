//! Layered directed graph over a `rows x cols` grid plus source and sink.

use std::fmt::Write;

/// Outgoing edge of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Target node index.
    pub to: usize,
    /// Non-negative edge weight.
    pub weight: i64,
}

/// Directed graph whose inner nodes form a grid of `rows x cols`.
///
/// Node `0` is the source, the last node is the sink, and grid node
/// `(row, col)` has index `cols * row + col + 1`. Edges are stored as
/// per-node adjacency lists; every insertion bumps an incoming-edge counter
/// of the target so that graph builders can skip unreachable nodes.
///
/// # Examples
///
/// ```
/// use u_energysched::graph::LayeredGraph;
///
/// let mut graph = LayeredGraph::new(3, 2);
/// assert_eq!(graph.nodes_count(), 8);
/// graph.add_edge_from_source(0, 1, 4);
/// graph.add_edge(0, 1, 1, 2, 3);
/// assert!(graph.has_incoming_edge(1, 2));
/// assert!(!graph.has_incoming_edge(1, 0));
/// ```
#[derive(Debug, Clone)]
pub struct LayeredGraph {
    cols: usize,
    rows: usize,
    adjacency: Vec<Vec<Edge>>,
    incoming: Vec<usize>,
}

impl LayeredGraph {
    /// Creates an edgeless graph with `cols * rows + 2` nodes.
    pub fn new(cols: usize, rows: usize) -> Self {
        let nodes = cols * rows + 2;
        Self {
            cols,
            rows,
            adjacency: vec![Vec::new(); nodes],
            incoming: vec![0; nodes],
        }
    }

    /// Number of columns of the grid.
    pub fn cols_count(&self) -> usize {
        self.cols
    }

    /// Number of rows of the grid.
    pub fn rows_count(&self) -> usize {
        self.rows
    }

    /// Total number of nodes, source and sink included.
    pub fn nodes_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Index of the source node.
    pub fn source(&self) -> usize {
        0
    }

    /// Index of the sink node.
    pub fn sink(&self) -> usize {
        self.adjacency.len() - 1
    }

    /// Index of grid node `(row, col)`.
    #[inline]
    pub fn node_index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        self.cols * row + col + 1
    }

    /// Row of a grid node.
    #[inline]
    pub fn node_row(&self, node: usize) -> usize {
        (node - 1) / self.cols
    }

    /// Column of a grid node.
    #[inline]
    pub fn node_col(&self, node: usize) -> usize {
        node - self.node_row(node) * self.cols - 1
    }

    /// Adds an edge between two raw node indices.
    pub fn add_node_edge(&mut self, from: usize, to: usize, weight: i64) {
        self.adjacency[from].push(Edge { to, weight });
        self.incoming[to] += 1;
    }

    /// Adds an edge `(from_row, from_col) -> (to_row, to_col)`.
    pub fn add_edge(
        &mut self,
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
        weight: i64,
    ) {
        let from = self.node_index(from_row, from_col);
        let to = self.node_index(to_row, to_col);
        self.add_node_edge(from, to, weight);
    }

    /// Adds an edge from the source to `(row, col)`.
    pub fn add_edge_from_source(&mut self, row: usize, col: usize, weight: i64) {
        let to = self.node_index(row, col);
        self.add_node_edge(self.source(), to, weight);
    }

    /// Adds an edge from `(row, col)` to the sink.
    pub fn add_edge_to_sink(&mut self, row: usize, col: usize, weight: i64) {
        let from = self.node_index(row, col);
        self.add_node_edge(from, self.sink(), weight);
    }

    /// Whether `(row, col)` has at least one incoming edge.
    #[inline]
    pub fn has_incoming_edge(&self, row: usize, col: usize) -> bool {
        self.incoming[self.node_index(row, col)] > 0
    }

    /// Outgoing edges of a node.
    #[inline]
    pub fn outgoing(&self, node: usize) -> &[Edge] {
        &self.adjacency[node]
    }

    /// Total number of edges.
    pub fn edges_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Removes every edge, keeping the allocated adjacency lists.
    pub fn remove_edges(&mut self) {
        for edges in &mut self.adjacency {
            edges.clear();
        }
        self.incoming.iter_mut().for_each(|count| *count = 0);
    }

    /// Removes only the edges leaving the source.
    pub fn remove_edges_from_source(&mut self) {
        let source = self.source();
        for edge in std::mem::take(&mut self.adjacency[source]) {
            self.incoming[edge.to] -= 1;
        }
    }

    /// Renders the graph in Graphviz DOT format.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph layered {\n");
        for (from, edges) in self.adjacency.iter().enumerate() {
            for edge in edges {
                let _ = writeln!(
                    dot,
                    "  \"{}\" -> \"{}\" [label=\"{}\"];",
                    self.node_label(from),
                    self.node_label(edge.to),
                    edge.weight
                );
            }
        }
        dot.push_str("}\n");
        dot
    }

    fn node_label(&self, node: usize) -> String {
        if node == self.source() {
            "s".to_string()
        } else if node == self.sink() {
            "t".to_string()
        } else {
            format!("{},{}", self.node_row(node), self.node_col(node))
        }
    }
}
