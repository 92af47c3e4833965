pub mod path;
pub mod random;

use serde::Serialize;
use tcsw_algo::tcsw::{Formulation, TcswSolution, TcswSolverConfig};
use tcsw_core::NodeKey;

/// Solver configuration for a run: the k-delay variant carries its default
/// time limit unless one is given explicitly.
pub(crate) fn solver_config(k: Option<u32>, time_limit: Option<f64>) -> TcswSolverConfig {
    let config = if k.is_some() {
        TcswSolverConfig::k_delay()
    } else {
        TcswSolverConfig::default()
    };
    match time_limit {
        Some(seconds) => config.with_time_limit(seconds),
        None => config,
    }
}

pub(crate) fn formulation_name(formulation: &Formulation) -> String {
    format!(
        "max_delay={} flow_capacity={}",
        formulation.max_delay(),
        formulation.flow.capacity()
    )
}

#[derive(Debug, Serialize)]
pub struct EdgeOutput<N> {
    pub from: N,
    pub to: N,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct SolutionOutput<N> {
    pub status: String,
    pub certified_optimal: bool,
    pub objective: Option<f64>,
    pub solution_count: usize,
    pub solve_time_ms: u64,
    pub backend: String,
    pub edges: Vec<EdgeOutput<N>>,
}

impl<N: NodeKey + Serialize> SolutionOutput<N> {
    pub fn from_solution(solution: &TcswSolution<N>) -> Self {
        let edges = solution
            .subgraph
            .iter()
            .flat_map(|subgraph| subgraph.edges())
            .map(|(from, to, weight)| EdgeOutput {
                from: from.clone(),
                to: to.clone(),
                weight,
            })
            .collect();
        Self {
            status: solution.status.to_string(),
            certified_optimal: solution.certified_optimal,
            objective: solution.objective,
            solution_count: solution.solution_count,
            solve_time_ms: solution.solve_time.as_millis() as u64,
            backend: solution.backend.clone(),
            edges,
        }
    }
}
