//! Time-expanded network builder
//!
//! Validates an instance and derives the data every formulation shares: the
//! time set, the horizon and the per-(node, time) sourceflow.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use tcsw_core::{
    ConnectivityDemand, ExistenceMap, NodeKey, TcswError, TcswResult, TemporalGraph, Time,
};

/// Shared time structure of a validated instance.
#[derive(Debug, Clone)]
pub struct TimeExpandedNetwork<N: NodeKey> {
    times: Vec<Time>,
    horizon: Time,
    sourceflow: HashMap<(N, Time), i64>,
    flow_units: usize,
}

impl<N: NodeKey> TimeExpandedNetwork<N> {
    /// Validate `(graph, existence, demand)` and compute the sourceflow.
    ///
    /// Sourceflow is `+|destinations|` at `(source, 0)` and `-1` at each
    /// `(destination, T)`; contributions add up when nodes coincide.
    pub fn build(
        graph: &TemporalGraph<N>,
        existence: &ExistenceMap<N>,
        demand: &ConnectivityDemand<N>,
    ) -> TcswResult<Self> {
        let times = existence.times();
        let Some(&horizon) = times.last() else {
            return Err(TcswError::Configuration(
                "existence map is empty, no time steps to expand".into(),
            ));
        };
        if times.len() != horizon as usize + 1 {
            return Err(TcswError::Configuration(format!(
                "time steps must be contiguous from 0, got {} distinct steps with horizon {}",
                times.len(),
                horizon
            )));
        }

        for node in graph.nodes() {
            for &time in &times {
                if existence.is_active(node, time).is_none() {
                    return Err(TcswError::Configuration(format!(
                        "missing existence entry for node {} at time {}",
                        node, time
                    )));
                }
            }
        }

        if demand.destinations.is_empty() {
            return Err(TcswError::Configuration(
                "connectivity demand has no destinations".into(),
            ));
        }
        require_active(graph, existence, &demand.source, 0, "source")?;
        for destination in &demand.destinations {
            require_active(graph, existence, destination, horizon, "destination")?;
        }

        let flow_units = demand.flow_units();
        let mut sourceflow = HashMap::new();
        *sourceflow.entry((demand.source.clone(), 0)).or_insert(0) += flow_units as i64;
        for destination in &demand.destinations {
            *sourceflow.entry((destination.clone(), horizon)).or_insert(0) -= 1;
        }

        Ok(Self {
            times,
            horizon,
            sourceflow,
            flow_units,
        })
    }

    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Final time step `T`.
    pub fn horizon(&self) -> Time {
        self.horizon
    }

    /// Units of flow leaving the source.
    pub fn flow_units(&self) -> usize {
        self.flow_units
    }

    /// Injected (positive) or absorbed (negative) flow at `(node, time)`.
    pub fn sourceflow(&self, node: &N, time: Time) -> i64 {
        self.sourceflow
            .get(&(node.clone(), time))
            .copied()
            .unwrap_or(0)
    }

    /// Arrival times reachable when departing at `t`: `t..=min(t + k, T)`.
    pub fn arrival_window(&self, t: Time, max_delay: Time) -> RangeInclusive<Time> {
        t..=t.saturating_add(max_delay).min(self.horizon)
    }

    /// Departure times that can arrive at `t`: `max(0, t - k)..=t`.
    pub fn departure_window(&self, t: Time, max_delay: Time) -> RangeInclusive<Time> {
        t.saturating_sub(max_delay)..=t
    }

    /// Every allowed `(t, t')` pair, departure-major.
    pub fn edge_time_slots(&self, max_delay: Time) -> Vec<(Time, Time)> {
        self.times
            .iter()
            .flat_map(|&t| self.arrival_window(t, max_delay).map(move |arrival| (t, arrival)))
            .collect()
    }
}

fn require_active<N: NodeKey>(
    graph: &TemporalGraph<N>,
    existence: &ExistenceMap<N>,
    node: &N,
    time: Time,
    role: &str,
) -> TcswResult<()> {
    if !graph.contains_node(node) {
        return Err(TcswError::Configuration(format!(
            "{} {} is not a node of the graph",
            role, node
        )));
    }
    match existence.is_active(node, time) {
        Some(true) => Ok(()),
        Some(false) => Err(TcswError::Configuration(format!(
            "{} {} is inactive at time {}",
            role, node, time
        ))),
        None => Err(TcswError::Configuration(format!(
            "missing existence entry for {} {} at time {}",
            role, node, time
        ))),
    }
}
