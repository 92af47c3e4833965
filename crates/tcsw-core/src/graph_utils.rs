//! Time-expanded reachability
//!
//! Temporal reachability is ordinary reachability in an auxiliary graph whose
//! vertices are `(node, time)` pairs. An edge `u -> v` of the static graph
//! yields `(u, t) -> (v, t + s)` for every delay `s` in `0..=max_delay` such
//! that both endpoints are active at their respective times and `t + s` stays
//! within the horizon. There are no "wait at node" arcs: waiting only happens
//! while traversing an edge, exactly as in the flow formulations.

use crate::{ExistenceMap, NodeKey, TemporalGraph, Time};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use std::collections::{BTreeSet, HashMap};

/// Auxiliary graph over active `(node, time)` pairs.
#[derive(Debug, Clone)]
pub struct TimeExpandedGraph<N: NodeKey> {
    graph: DiGraph<(N, Time), ()>,
    index: HashMap<(N, Time), NodeIndex>,
    horizon: Time,
}

impl<N: NodeKey> TimeExpandedGraph<N> {
    /// Expand `graph` over `0..time_count` using `existence`.
    ///
    /// Pairs without an existence entry count as inactive here; strict
    /// validation is the formulation builder's job.
    pub fn build(
        graph: &TemporalGraph<N>,
        existence: &ExistenceMap<N>,
        time_count: Time,
        max_delay: Time,
    ) -> Self {
        let mut expanded = Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            horizon: time_count.saturating_sub(1),
        };
        let active = |node: &N, time: Time| existence.is_active(node, time).unwrap_or(false);

        for (from, to, _) in graph.edges() {
            for t in 0..time_count {
                if !active(from, t) {
                    continue;
                }
                for step in 0..=max_delay {
                    let arrival = t + step;
                    if arrival >= time_count {
                        break;
                    }
                    if active(to, arrival) {
                        let a = expanded.vertex(from.clone(), t);
                        let b = expanded.vertex(to.clone(), arrival);
                        expanded.graph.update_edge(a, b, ());
                    }
                }
            }
        }
        expanded
    }

    fn vertex(&mut self, node: N, time: Time) -> NodeIndex {
        let key = (node, time);
        if let Some(idx) = self.index.get(&key) {
            return *idx;
        }
        let idx = self.graph.add_node(key.clone());
        self.index.insert(key, idx);
        idx
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn arc_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn horizon(&self) -> Time {
        self.horizon
    }

    pub fn contains(&self, node: &N, time: Time) -> bool {
        self.index.contains_key(&(node.clone(), time))
    }

    /// Every `(node, time)` reachable from `(node, time)`, including itself.
    pub fn reachable_from(&self, node: &N, time: Time) -> BTreeSet<(N, Time)> {
        let mut reached = BTreeSet::new();
        let Some(start) = self.index.get(&(node.clone(), time)).copied() else {
            return reached;
        };
        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(idx) = bfs.next(&self.graph) {
            reached.insert(self.graph[idx].clone());
        }
        reached
    }

    /// Nodes reachable at the horizon from `source` at time 0, excluding `source`.
    pub fn destinations_from(&self, source: &N) -> Vec<N> {
        let horizon = self.horizon;
        self.reachable_from(source, 0)
            .into_iter()
            .filter(|(node, time)| *time == horizon && node != source)
            .map(|(node, _)| node)
            .collect()
    }

    /// Whether a time-respecting path leads from `(source, 0)` to `(destination, T)`.
    pub fn has_temporal_path(&self, source: &N, destination: &N) -> bool {
        let (Some(a), Some(b)) = (
            self.index.get(&(source.clone(), 0)).copied(),
            self.index.get(&(destination.clone(), self.horizon)).copied(),
        ) else {
            return false;
        };
        petgraph::algo::has_path_connecting(&self.graph, a, b, None)
    }

    /// Sources at time 0, sorted.
    pub fn sources(&self) -> Vec<N> {
        let mut sources: Vec<N> = self
            .index
            .keys()
            .filter(|(_, time)| *time == 0)
            .map(|(node, _)| node.clone())
            .collect();
        sources.sort();
        sources
    }
}
