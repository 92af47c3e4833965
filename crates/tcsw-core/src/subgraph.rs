//! Solution subgraphs
//!
//! A [`Subgraph`] is the caller-visible result of a solve: the original node
//! set plus exactly the selected edges, each with its original weight.

use crate::{NodeKey, TcswResult, TemporalGraph};

/// Minimum-weight subgraph recovered from a solved model.
#[derive(Debug, Clone)]
pub struct Subgraph<N: NodeKey> {
    graph: TemporalGraph<N>,
}

impl<N: NodeKey> Subgraph<N> {
    /// Empty subgraph over the nodes of `base`.
    pub fn over_nodes_of(base: &TemporalGraph<N>) -> Self {
        let mut graph = TemporalGraph::new();
        for node in base.nodes() {
            graph.add_node(node.clone());
        }
        Self { graph }
    }

    pub fn add_edge(&mut self, from: N, to: N, weight: f64) -> TcswResult<()> {
        self.graph.add_edge(from, to, weight).map(|_| ())
    }

    pub fn edges(&self) -> impl Iterator<Item = (&N, &N, f64)> + '_ {
        self.graph.edges()
    }

    /// Selected edges as owned pairs, sorted.
    pub fn edge_pairs(&self) -> Vec<(N, N)> {
        let mut pairs: Vec<(N, N)> = self
            .graph
            .edges()
            .map(|(from, to, _)| (from.clone(), to.clone()))
            .collect();
        pairs.sort();
        pairs
    }

    pub fn contains_edge(&self, from: &N, to: &N) -> bool {
        self.graph.contains_edge(from, to)
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Sum of the weights of the selected edges.
    pub fn total_weight(&self) -> f64 {
        self.graph.total_weight()
    }

    /// Human-readable listing, `edges_per_line` entries of `u -> v` per line.
    pub fn edge_listing(&self, edges_per_line: usize) -> String {
        let per_line = edges_per_line.max(1);
        let entries: Vec<String> = self
            .graph
            .edges()
            .map(|(from, to, _)| format!("{} -> {}", from, to))
            .collect();
        entries
            .chunks(per_line)
            .map(|line| line.join("        "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn as_graph(&self) -> &TemporalGraph<N> {
        &self.graph
    }

    pub fn into_graph(self) -> TemporalGraph<N> {
        self.graph
    }
}
