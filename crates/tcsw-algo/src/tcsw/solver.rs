//! TCSW solve orchestration
//!
//! Each entry point builds a fresh model, runs the backend once and extracts
//! the result. Nothing is cached between calls.

use super::formulation::{build_model, ConstraintFamily, Formulation, TcswModel};
use super::solution::TcswSolution;
use crate::backends::BackendKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tcsw_core::{
    ConnectivityDemand, ExistenceMap, MilpBackend, NodeKey, SolveLimits, TcswError, TcswResult,
    TemporalGraph, Time,
};
use tracing::{debug, info, warn};

/// TCSW solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcswSolverConfig {
    /// Wall-clock limit handed to the backend (seconds)
    pub time_limit_seconds: Option<f64>,
    /// Values above this count as positive during extraction
    pub tolerance: f64,
    /// Log the selected edges at info level
    pub detailed_output: bool,
    /// Edges per line in listings
    pub edges_per_line: usize,
}

impl Default for TcswSolverConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: None,
            tolerance: 1e-9,
            detailed_output: false,
            edges_per_line: super::solution::DEFAULT_EDGES_PER_LINE,
        }
    }
}

impl TcswSolverConfig {
    /// Limit used by the k-delay experiments (20 minutes).
    pub const K_DELAY_TIME_LIMIT_SECONDS: f64 = 1200.0;

    /// Defaults for the k-delay variant.
    pub fn k_delay() -> Self {
        Self {
            time_limit_seconds: Some(Self::K_DELAY_TIME_LIMIT_SECONDS),
            ..Self::default()
        }
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_seconds = Some(seconds);
        self
    }

    pub fn with_detailed_output(mut self, detailed: bool) -> Self {
        self.detailed_output = detailed;
        self
    }

    /// Validate and convert to backend limits.
    pub fn limits(&self) -> TcswResult<SolveLimits> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(TcswError::Configuration(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        let time_limit = match self.time_limit_seconds {
            None => None,
            Some(secs) if secs.is_finite() && secs > 0.0 => Some(Duration::from_secs_f64(secs)),
            Some(secs) => {
                return Err(TcswError::Configuration(format!(
                    "time limit must be positive, got {}",
                    secs
                )))
            }
        };
        Ok(SolveLimits { time_limit })
    }
}

/// Solve an already formulated model with `backend`.
pub fn solve_model<N: NodeKey>(
    model: &TcswModel<N>,
    graph: &TemporalGraph<N>,
    backend: &dyn MilpBackend,
    config: &TcswSolverConfig,
) -> TcswResult<TcswSolution<N>> {
    let limits = config.limits()?;
    let milp = model.milp();
    info!(
        backend = backend.id(),
        variables = milp.num_variables(),
        constraints = milp.num_constraints(),
        max_delay = model.formulation().max_delay(),
        flow_units = model.network().flow_units(),
        "solving TCSW model"
    );
    for family in ConstraintFamily::ALL {
        debug!(family = %family, count = model.family_count(family), "constraint family");
    }
    if limits.time_limit.is_some() && !backend.supports_time_limit() {
        warn!(
            backend = backend.id(),
            "backend cannot enforce the configured time limit"
        );
    }

    let outcome = backend.solve(milp, &limits)?;
    let solution =
        TcswSolution::from_outcome(model, graph, outcome, config.tolerance, backend.id())?;

    info!(
        status = %solution.status,
        objective = ?solution.objective,
        solve_time_ms = solution.solve_time.as_millis() as u64,
        "TCSW solve finished"
    );
    if solution.is_uncertified() {
        warn!(
            objective = ?solution.objective,
            "returning a feasible subgraph that is not certified optimal"
        );
    }
    if let Some(subgraph) = &solution.subgraph {
        let listing = subgraph.edge_listing(config.edges_per_line);
        if config.detailed_output {
            info!("Edges in minimal subgraph:\n{}", listing);
        } else {
            debug!("Edges in minimal subgraph:\n{}", listing);
        }
    }
    Ok(solution)
}

/// Formulate and solve with an explicit backend.
pub fn solve_with_backend<N: NodeKey>(
    graph: &TemporalGraph<N>,
    existence: &ExistenceMap<N>,
    demand: &ConnectivityDemand<N>,
    formulation: Formulation,
    backend: &dyn MilpBackend,
    config: &TcswSolverConfig,
) -> TcswResult<TcswSolution<N>> {
    config.limits()?;
    let model = build_model(graph, existence, demand, formulation)?;
    solve_model(&model, graph, backend, config)
}

/// Solve the single-destination TCSW problem.
///
/// # Example
///
/// ```
/// use tcsw_algo::tcsw::{solve_tcsw, TcswSolverConfig};
/// use tcsw_core::{ExistenceMap, TemporalGraph};
///
/// let mut graph = TemporalGraph::new();
/// graph.add_path(&[1, 2, 3, 4], 1.0)?;
/// let existence = ExistenceMap::always_active(graph.nodes().cloned(), 4);
///
/// let solution = solve_tcsw(&graph, &existence, 1, 4, &TcswSolverConfig::default())?;
/// assert_eq!(solution.objective, Some(3.0));
/// println!("{}", solution.summary());
/// # Ok::<(), tcsw_core::TcswError>(())
/// ```
pub fn solve_tcsw<N: NodeKey>(
    graph: &TemporalGraph<N>,
    existence: &ExistenceMap<N>,
    source: N,
    destination: N,
    config: &TcswSolverConfig,
) -> TcswResult<TcswSolution<N>> {
    solve_with_backend(
        graph,
        existence,
        &ConnectivityDemand::single(source, destination),
        Formulation::base(),
        BackendKind::preferred().build_backend().as_ref(),
        config,
    )
}

/// Solve the k-delay TCSW problem.
///
/// Callers normally pass [`TcswSolverConfig::k_delay`], which carries the
/// 1200 s wall-clock limit. The limit is enforced when the `solver-highs`
/// feature is enabled; see [`BackendKind::preferred`].
pub fn solve_k_tcsw<N: NodeKey>(
    graph: &TemporalGraph<N>,
    existence: &ExistenceMap<N>,
    source: N,
    destination: N,
    k: Time,
    config: &TcswSolverConfig,
) -> TcswResult<TcswSolution<N>> {
    solve_with_backend(
        graph,
        existence,
        &ConnectivityDemand::single(source, destination),
        Formulation::k_delay(k),
        BackendKind::preferred().build_backend().as_ref(),
        config,
    )
}

/// Solve the multi-destination TCSW problem.
pub fn solve_multi_destination_tcsw<N: NodeKey>(
    graph: &TemporalGraph<N>,
    existence: &ExistenceMap<N>,
    source: N,
    destinations: Vec<N>,
    config: &TcswSolverConfig,
) -> TcswResult<TcswSolution<N>> {
    let demand = ConnectivityDemand::multi(source, destinations);
    let units = u32::try_from(demand.flow_units()).map_err(|_| {
        TcswError::Configuration(format!(
            "{} destinations exceed the supported flow domain",
            demand.flow_units()
        ))
    })?;
    solve_with_backend(
        graph,
        existence,
        &demand,
        Formulation::multi_destination(units),
        BackendKind::preferred().build_backend().as_ref(),
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TcswSolverConfig::default();
        assert_eq!(config.time_limit_seconds, None);
        assert_eq!(config.tolerance, 1e-9);
        assert!(!config.detailed_output);
        assert_eq!(config.limits().unwrap(), SolveLimits::default());
    }

    #[test]
    fn test_k_delay_config_has_time_limit() {
        let limits = TcswSolverConfig::k_delay().limits().unwrap();
        assert_eq!(limits.time_limit, Some(Duration::from_secs(1200)));
    }

    #[test]
    fn test_invalid_limits_are_rejected() {
        assert!(TcswSolverConfig::default()
            .with_time_limit(0.0)
            .limits()
            .is_err());
        assert!(TcswSolverConfig::default()
            .with_time_limit(f64::NAN)
            .limits()
            .is_err());
        let config = TcswSolverConfig {
            tolerance: -1.0,
            ..TcswSolverConfig::default()
        };
        assert!(config.limits().unwrap_err().is_configuration());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: TcswSolverConfig =
            serde_json::from_str(r#"{"time_limit_seconds": 30.0}"#).unwrap();
        assert_eq!(config.time_limit_seconds, Some(30.0));
        assert_eq!(config.tolerance, 1e-9);
        assert_eq!(config.edges_per_line, 5);
    }
}
