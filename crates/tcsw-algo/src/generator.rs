//! Random TCSW instances
//!
//! Samples node activity independently per `(node, time)` and keeps the
//! sample only when some source can reach a destination through the
//! time-expanded graph. The returned demand is therefore always satisfiable
//! by a flow formulation with the same delay bound.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tcsw_core::{
    ConnectivityDemand, ExistenceMap, NodeKey, TcswError, TcswResult, TemporalGraph,
    TimeExpandedGraph, Time,
};
use tracing::debug;

/// Parameters for sampling existence windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of time steps; times run over `0..time_count`
    pub time_count: Time,
    /// Probability that a node is active at a given time
    pub node_active_probability: f64,
    /// Delay bound used for the reachability check
    pub max_delay: Time,
    /// Existence samples to draw before giving up
    pub max_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            time_count: 10,
            node_active_probability: 0.25,
            max_delay: 1,
            max_attempts: 1000,
        }
    }
}

impl GeneratorConfig {
    fn validate(&self) -> TcswResult<()> {
        if self.time_count == 0 {
            return Err(TcswError::Configuration(
                "time_count must be at least 1".into(),
            ));
        }
        check_probability("node_active_probability", self.node_active_probability)?;
        if self.max_attempts == 0 {
            return Err(TcswError::Configuration(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A sampled instance with a guaranteed temporal path.
#[derive(Debug, Clone)]
pub struct GeneratedInstance<N: NodeKey> {
    pub graph: TemporalGraph<N>,
    pub existence: ExistenceMap<N>,
    pub demand: ConnectivityDemand<N>,
    /// Existence samples drawn, including the accepted one
    pub attempts: usize,
}

/// Seeded RNG when a seed is given, entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    seed.map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy)
}

/// Nodes `1..=num_nodes`.
pub fn generate_nodes(num_nodes: u32) -> Vec<u32> {
    (1..=num_nodes).collect()
}

/// Random digraph over `1..=num_nodes`; each ordered pair `u != v` becomes
/// an edge with `edge_probability`, weighted uniformly from `weight_range`.
pub fn random_digraph<R: Rng>(
    num_nodes: u32,
    edge_probability: f64,
    weight_range: RangeInclusive<f64>,
    rng: &mut R,
) -> TcswResult<TemporalGraph<u32>> {
    check_probability("edge_probability", edge_probability)?;
    let (low, high) = (*weight_range.start(), *weight_range.end());
    if !(low.is_finite() && high.is_finite()) || low < 0.0 || low > high {
        return Err(TcswError::Configuration(format!(
            "weight range {}..={} must be finite, non-negative and non-empty",
            low, high
        )));
    }

    let nodes = generate_nodes(num_nodes);
    let mut graph = TemporalGraph::new();
    for &node in &nodes {
        graph.add_node(node);
    }
    for &u in &nodes {
        for &v in &nodes {
            if u != v && rng.gen_bool(edge_probability) {
                let weight = if low == high {
                    low
                } else {
                    rng.gen_range(low..=high)
                };
                graph.add_edge(u, v, weight)?;
            }
        }
    }
    Ok(graph)
}

/// Sample existence for `graph` and pick a reachable source/destination pair.
pub fn generate_instance<N: NodeKey, R: Rng>(
    graph: &TemporalGraph<N>,
    config: &GeneratorConfig,
    rng: &mut R,
) -> TcswResult<GeneratedInstance<N>> {
    generate_multi_destination_instance(graph, config, 1, rng)
}

/// Like [`generate_instance`] but with `destination_count` distinct destinations.
pub fn generate_multi_destination_instance<N: NodeKey, R: Rng>(
    graph: &TemporalGraph<N>,
    config: &GeneratorConfig,
    destination_count: usize,
    rng: &mut R,
) -> TcswResult<GeneratedInstance<N>> {
    config.validate()?;
    if destination_count == 0 {
        return Err(TcswError::Configuration(
            "destination_count must be at least 1".into(),
        ));
    }

    for attempt in 1..=config.max_attempts {
        let existence = ExistenceMap::from_fn(graph.nodes().cloned(), config.time_count, |_, _| {
            rng.gen_bool(config.node_active_probability)
        });
        let expanded =
            TimeExpandedGraph::build(graph, &existence, config.time_count, config.max_delay);

        let candidates: Vec<(N, Vec<N>)> = expanded
            .sources()
            .into_iter()
            .map(|source| {
                let reachable = expanded.destinations_from(&source);
                (source, reachable)
            })
            .filter(|(_, reachable)| reachable.len() >= destination_count)
            .collect();

        let demand = if destination_count == 1 {
            // uniform over feasible (source, destination) pairs
            let pairs: Vec<(&N, &N)> = candidates
                .iter()
                .flat_map(|(source, reachable)| reachable.iter().map(move |d| (source, d)))
                .collect();
            pairs
                .choose(rng)
                .map(|(source, destination)| {
                    ConnectivityDemand::single((*source).clone(), (*destination).clone())
                })
        } else {
            candidates.choose(rng).map(|(source, reachable)| {
                let mut destinations: Vec<N> = reachable
                    .choose_multiple(rng, destination_count)
                    .cloned()
                    .collect();
                destinations.sort();
                ConnectivityDemand::multi(source.clone(), destinations)
            })
        };

        if let Some(demand) = demand {
            debug!(
                attempt,
                vertices = expanded.vertex_count(),
                arcs = expanded.arc_count(),
                source = %demand.source,
                "sampled feasible TCSW instance"
            );
            return Ok(GeneratedInstance {
                graph: graph.clone(),
                existence,
                demand,
                attempts: attempt,
            });
        }
    }

    Err(TcswError::Configuration(format!(
        "no feasible source with {} reachable destination(s) after {} attempts",
        destination_count, config.max_attempts
    )))
}

fn check_probability(name: &str, p: f64) -> TcswResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(TcswError::Configuration(format!(
            "{} must lie in [0, 1], got {}",
            name, p
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(time_count: Time, p: f64) -> GeneratorConfig {
        GeneratorConfig {
            time_count,
            node_active_probability: p,
            max_delay: 1,
            max_attempts: 50,
        }
    }

    #[test]
    fn test_random_digraph_is_deterministic_per_seed() {
        let a = random_digraph(8, 0.3, 1.0..=5.0, &mut rng_from_seed(Some(7))).unwrap();
        let b = random_digraph(8, 0.3, 1.0..=5.0, &mut rng_from_seed(Some(7))).unwrap();

        assert_eq!(a.node_count(), 8);
        let edges_a: Vec<_> = a.edges().map(|(u, v, w)| (*u, *v, w)).collect();
        let edges_b: Vec<_> = b.edges().map(|(u, v, w)| (*u, *v, w)).collect();
        assert_eq!(edges_a, edges_b);
        assert!(edges_a.iter().all(|(u, v, w)| u != v && (1.0..=5.0).contains(w)));
    }

    #[test]
    fn test_random_digraph_extremes() {
        let mut rng = rng_from_seed(Some(1));
        let empty = random_digraph(5, 0.0, 1.0..=1.0, &mut rng).unwrap();
        assert_eq!(empty.edge_count(), 0);
        let complete = random_digraph(5, 1.0, 2.0..=2.0, &mut rng).unwrap();
        assert_eq!(complete.edge_count(), 20);
        assert_eq!(complete.total_weight(), 40.0);
    }

    #[test]
    fn test_random_digraph_rejects_bad_parameters() {
        let mut rng = rng_from_seed(Some(1));
        assert!(random_digraph(5, 1.5, 1.0..=2.0, &mut rng).is_err());
        assert!(random_digraph(5, 0.5, 3.0..=2.0, &mut rng).is_err());
        assert!(random_digraph(5, 0.5, -1.0..=2.0, &mut rng).is_err());
    }

    #[test]
    fn test_generated_instance_is_reachable() {
        let mut rng = rng_from_seed(Some(42));
        let graph = random_digraph(10, 0.4, 1.0..=10.0, &mut rng).unwrap();
        let config = config(4, 0.8);
        let instance = generate_instance(&graph, &config, &mut rng).unwrap();

        let destination = instance.demand.destination().unwrap();
        assert_ne!(&instance.demand.source, destination);
        assert_eq!(instance.existence.horizon(), Some(3));
        assert_eq!(instance.existence.len(), 10 * 4);

        let expanded = TimeExpandedGraph::build(&instance.graph, &instance.existence, 4, 1);
        assert!(expanded.has_temporal_path(&instance.demand.source, destination));
    }

    #[test]
    fn test_fully_active_path_always_yields_the_path_ends() {
        let mut graph = TemporalGraph::new();
        graph.add_path(&[1u32, 2, 3, 4], 1.0).unwrap();
        let mut rng = rng_from_seed(Some(3));
        let instance = generate_instance(&graph, &config(4, 1.0), &mut rng).unwrap();

        // no wait arcs: only (1, 0) still reaches the path end at T = 3
        assert_eq!(instance.demand, ConnectivityDemand::single(1, 4));
        assert_eq!(instance.attempts, 1);
    }

    #[test]
    fn test_exhausted_attempts_is_configuration_error() {
        let mut graph = TemporalGraph::new();
        graph.add_path(&[1u32, 2, 3], 1.0).unwrap();
        let mut rng = rng_from_seed(Some(9));
        let err = generate_instance(&graph, &config(3, 0.0), &mut rng).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("after 50 attempts"));
    }

    #[test]
    fn test_multi_destination_instance() {
        let mut graph = TemporalGraph::new();
        graph.add_edge(1u32, 2, 1.0).unwrap();
        graph.add_edge(1, 3, 1.0).unwrap();
        graph.add_edge(1, 4, 1.0).unwrap();
        let mut rng = rng_from_seed(Some(11));
        let instance =
            generate_multi_destination_instance(&graph, &config(2, 1.0), 2, &mut rng).unwrap();

        assert_eq!(instance.demand.source, 1);
        assert_eq!(instance.demand.destinations.len(), 2);
        let mut sorted = instance.demand.destinations.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, instance.demand.destinations);
        assert!(!instance.demand.destinations.contains(&1));
    }

    #[test]
    fn test_invalid_config() {
        let graph = TemporalGraph::<u32>::new();
        let mut rng = rng_from_seed(Some(0));
        assert!(generate_instance(&graph, &config(0, 0.5), &mut rng).is_err());
        assert!(generate_instance(&graph, &config(3, 2.0), &mut rng).is_err());
        assert!(generate_multi_destination_instance(&graph, &config(3, 0.5), 0, &mut rng).is_err());
    }
}
