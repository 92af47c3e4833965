//! # tcsw-core: Temporal Graph Modeling Core
//!
//! Provides the data structures shared by every Temporally Connected Subgraph
//! with Weight (TCSW) formulation, plus the narrow solver boundary the
//! formulation code talks to.
//!
//! ## Design Philosophy
//!
//! A TCSW instance is a **static weighted digraph** plus a per-(node, time)
//! activity map:
//! - **Nodes**: arbitrary hashable, ordered identifiers ([`NodeKey`])
//! - **Edges**: directed, carrying a non-negative weight
//! - **Existence**: `(node, time) -> active?` over a horizon `0..=T`
//!
//! Time never lives inside the graph itself. Formulations and reachability
//! checks expand `(node, time)` pairs on demand, so the same graph can be
//! reused against many activity maps.
//!
//! ## Quick Start
//!
//! ```rust
//! use tcsw_core::*;
//!
//! let mut graph = TemporalGraph::new();
//! graph.add_path(&[1, 2, 3, 4], 1.0).unwrap();
//!
//! let existence = ExistenceMap::always_active(graph.nodes().cloned(), 4);
//! let demand = ConnectivityDemand::single(1, 4);
//!
//! assert_eq!(existence.horizon(), Some(3));
//! assert_eq!(demand.flow_units(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`existence`] - Node activity windows
//! - [`demand`] - Source/destination connectivity demands
//! - [`subgraph`] - Solution subgraphs and edge listings
//! - [`graph_utils`] - Time-expanded reachability (used to certify generated instances)
//! - [`solver`] - MILP model representation and the backend trait

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

pub mod demand;
pub mod error;
pub mod existence;
pub mod graph_utils;
pub mod solver;
pub mod subgraph;

pub use demand::ConnectivityDemand;
pub use error::{TcswError, TcswResult};
pub use existence::ExistenceMap;
pub use graph_utils::TimeExpandedGraph;
pub use petgraph::graph::EdgeIndex;
pub use solver::*;
pub use subgraph::Subgraph;

/// Discrete time step. Horizons always start at 0.
pub type Time = u32;

/// Bound for node identifiers.
///
/// Ordering is required so that model construction and reporting are
/// deterministic; `Display` is used for variable names and edge listings.
pub trait NodeKey: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display {}

impl<T> NodeKey for T where T: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display {}

/// Static directed weighted graph underlying a TCSW instance.
///
/// Wraps a petgraph `DiGraph<N, f64>` and keeps a key -> index map so callers
/// address nodes by their own identifiers. Parallel edges are not allowed:
/// adding an existing `(u, v)` pair replaces its weight.
#[derive(Debug, Clone)]
pub struct TemporalGraph<N: NodeKey> {
    graph: DiGraph<N, f64>,
    index: HashMap<N, NodeIndex>,
}

impl<N: NodeKey> Default for TemporalGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeKey> TemporalGraph<N> {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Add a node, returning its index. Re-adding a known node is a no-op.
    pub fn add_node(&mut self, node: N) -> NodeIndex {
        if let Some(idx) = self.index.get(&node) {
            return *idx;
        }
        let idx = self.graph.add_node(node.clone());
        self.index.insert(node, idx);
        idx
    }

    /// Add (or re-weight) the directed edge `from -> to`.
    ///
    /// Missing endpoints are created. Weights must be finite and non-negative.
    pub fn add_edge(&mut self, from: N, to: N, weight: f64) -> TcswResult<EdgeIndex> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(TcswError::Graph(format!(
                "edge {} -> {} has invalid weight {}",
                from, to, weight
            )));
        }
        let a = self.add_node(from);
        let b = self.add_node(to);
        match self.graph.find_edge(a, b) {
            Some(edge) => {
                self.graph[edge] = weight;
                Ok(edge)
            }
            None => Ok(self.graph.add_edge(a, b, weight)),
        }
    }

    /// Add the directed path `nodes[0] -> nodes[1] -> ...` with a uniform weight.
    pub fn add_path(&mut self, nodes: &[N], weight: f64) -> TcswResult<()> {
        for pair in nodes.windows(2) {
            self.add_edge(pair[0].clone(), pair[1].clone(), weight)?;
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    pub fn contains_edge(&self, from: &N, to: &N) -> bool {
        self.weight(from, to).is_some()
    }

    /// Weight of `from -> to`, if the edge exists.
    pub fn weight(&self, from: &N, to: &N) -> Option<f64> {
        let a = *self.index.get(from)?;
        let b = *self.index.get(to)?;
        self.graph.find_edge(a, b).map(|edge| self.graph[edge])
    }

    /// Petgraph index of a node.
    pub fn node_index(&self, node: &N) -> Option<NodeIndex> {
        self.index.get(node).copied()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges as `(from, to, weight)` in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N, f64)> + '_ {
        self.graph.edge_references().map(move |edge| {
            (
                &self.graph[edge.source()],
                &self.graph[edge.target()],
                *edge.weight(),
            )
        })
    }

    pub fn successors<'a>(&'a self, node: &N) -> impl Iterator<Item = &'a N> + 'a {
        self.neighbors(node, Direction::Outgoing)
    }

    pub fn predecessors<'a>(&'a self, node: &N) -> impl Iterator<Item = &'a N> + 'a {
        self.neighbors(node, Direction::Incoming)
    }

    fn neighbors<'a>(&'a self, node: &N, direction: Direction) -> impl Iterator<Item = &'a N> + 'a {
        let idx = self.index.get(node).copied();
        idx.into_iter().flat_map(move |idx| {
            self.graph
                .neighbors_directed(idx, direction)
                .map(move |other| &self.graph[other])
        })
    }

    /// Sum of all edge weights.
    pub fn total_weight(&self) -> f64 {
        self.graph.edge_weights().sum()
    }

    /// Borrow the underlying petgraph structure.
    pub fn graph(&self) -> &DiGraph<N, f64> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_path_creates_nodes_and_edges() {
        let mut graph = TemporalGraph::new();
        graph.add_path(&[1, 2, 3, 4], 1.0).unwrap();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.contains_edge(&2, &3));
        assert!(!graph.contains_edge(&3, &2));
        assert_eq!(graph.total_weight(), 3.0);
    }

    #[test]
    fn test_readding_edge_replaces_weight() {
        let mut graph = TemporalGraph::new();
        graph.add_edge("a", "b", 2.0).unwrap();
        graph.add_edge("a", "b", 5.0).unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight(&"a", &"b"), Some(5.0));
    }

    #[test]
    fn test_rejects_negative_and_nan_weights() {
        let mut graph = TemporalGraph::new();
        assert!(matches!(
            graph.add_edge(1, 2, -1.0),
            Err(TcswError::Graph(_))
        ));
        assert!(graph.add_edge(1, 2, f64::NAN).is_err());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_neighbors() {
        let mut graph = TemporalGraph::new();
        graph.add_edge(1, 2, 1.0).unwrap();
        graph.add_edge(1, 3, 1.0).unwrap();
        graph.add_edge(4, 1, 1.0).unwrap();

        let mut succ: Vec<_> = graph.successors(&1).copied().collect();
        succ.sort();
        assert_eq!(succ, vec![2, 3]);
        assert_eq!(graph.predecessors(&1).copied().collect::<Vec<_>>(), vec![4]);
        assert_eq!(graph.successors(&99).count(), 0);
    }

    #[test]
    fn test_nodes_keep_insertion_order() {
        let mut graph = TemporalGraph::new();
        graph.add_node(3);
        graph.add_node(1);
        graph.add_node(3);
        assert_eq!(graph.nodes().copied().collect::<Vec<_>>(), vec![3, 1]);
    }
}
