//! TCSW solution data structures
//!
//! Reads a backend outcome back through a [`TcswModel`] index and rebuilds the
//! selected subgraph.

use super::formulation::TcswModel;
use std::time::Duration;
use tcsw_core::{MilpOutcome, NodeKey, SolveStatus, Subgraph, TcswResult, TemporalGraph, Time};

/// Edges per line in [`TcswSolution::summary`].
pub const DEFAULT_EDGES_PER_LINE: usize = 5;

/// Positive flow on one edge-time slot.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeTimeFlow<N> {
    pub from: N,
    pub to: N,
    pub departure: Time,
    pub arrival: Time,
    pub units: f64,
}

/// Result of one TCSW solve
#[derive(Debug, Clone)]
pub struct TcswSolution<N: NodeKey> {
    /// Raw status reported by the backend
    pub status: SolveStatus,
    /// Selected edges; `None` when no usable assignment exists
    pub subgraph: Option<Subgraph<N>>,
    /// Objective value of the returned assignment
    pub objective: Option<f64>,
    /// Number of solutions the backend found
    pub solution_count: usize,
    /// True only for a certified optimum
    pub certified_optimal: bool,
    pub solve_time: Duration,
    /// Identifier of the backend that produced the outcome
    pub backend: String,
    /// Edge-time slots carrying flow, in model order
    pub flows: Vec<EdgeTimeFlow<N>>,
    /// Raw variable values indexed by `VarId`
    pub values: Vec<f64>,
}

impl<N: NodeKey> TcswSolution<N> {
    /// Assemble a solution from a backend outcome.
    ///
    /// A subgraph is extracted when the backend proved optimality, or when it
    /// stopped at the time limit holding an incumbent. In the latter case the
    /// result is kept but flagged as not certified. Every graph edge whose
    /// aggregate variable exceeds `tolerance` is selected with its original
    /// weight.
    pub fn from_outcome(
        model: &TcswModel<N>,
        graph: &TemporalGraph<N>,
        outcome: MilpOutcome,
        tolerance: f64,
        backend: &str,
    ) -> TcswResult<Self> {
        let usable = match outcome.status {
            SolveStatus::Optimal | SolveStatus::TimeLimit => outcome.has_incumbent(),
            SolveStatus::Infeasible | SolveStatus::Other => false,
        };

        let mut solution = Self {
            status: outcome.status,
            subgraph: None,
            objective: None,
            solution_count: outcome.solution_count(),
            certified_optimal: false,
            solve_time: outcome.solve_time,
            backend: backend.to_string(),
            flows: Vec::new(),
            values: Vec::new(),
        };
        if !usable {
            return Ok(solution);
        }

        let mut subgraph = Subgraph::over_nodes_of(graph);
        for edge in model.edges() {
            if outcome.value(edge.var).unwrap_or(0.0) > tolerance {
                subgraph.add_edge(edge.from.clone(), edge.to.clone(), edge.weight)?;
            }
        }
        for slot in model.slots() {
            let units = outcome.value(slot.var).unwrap_or(0.0);
            if units > tolerance {
                let edge = &model.edges()[slot.edge];
                solution.flows.push(EdgeTimeFlow {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    departure: slot.departure,
                    arrival: slot.arrival,
                    units,
                });
            }
        }

        solution.certified_optimal = outcome.status.is_optimal();
        solution.objective = outcome.objective_value();
        solution.subgraph = Some(subgraph);
        solution.values = outcome.values;
        Ok(solution)
    }

    /// The subgraph, only when optimality is certified.
    pub fn optimal_subgraph(&self) -> Option<&Subgraph<N>> {
        if self.certified_optimal {
            self.subgraph.as_ref()
        } else {
            None
        }
    }

    pub fn is_infeasible(&self) -> bool {
        self.status == SolveStatus::Infeasible
    }

    /// Whether an assignment came back without an optimality certificate.
    pub fn is_uncertified(&self) -> bool {
        self.subgraph.is_some() && !self.certified_optimal
    }

    /// Sum of the weights of the selected edges.
    pub fn selected_weight(&self) -> f64 {
        self.subgraph
            .as_ref()
            .map(Subgraph::total_weight)
            .unwrap_or(0.0)
    }

    /// Format a human-readable summary
    pub fn summary(&self) -> String {
        self.summary_with(DEFAULT_EDGES_PER_LINE)
    }

    pub fn summary_with(&self, edges_per_line: usize) -> String {
        let mut s = String::new();
        s.push_str(&format!("TCSW Solution Summary\n{}\n", "=".repeat(40)));
        let status = match (self.status, self.certified_optimal) {
            (SolveStatus::Optimal, true) => "Optimal".to_string(),
            (SolveStatus::TimeLimit, _) if self.subgraph.is_some() => {
                "Time limit reached (feasible, not certified optimal)".to_string()
            }
            (status, _) => format!("No solution ({})", status),
        };
        s.push_str(&format!("Status: {}\n", status));
        s.push_str(&format!("Backend: {}\n", self.backend));
        if let Some(objective) = self.objective {
            s.push_str(&format!("Objective: {}\n", objective));
        }
        let (days, hours, minutes, seconds) = execution_time(self.solve_time);
        s.push_str(&format!(
            "Solve time: {}d {}h {}m {}s ({:.3}s)\n",
            days,
            hours,
            minutes,
            seconds,
            self.solve_time.as_secs_f64()
        ));
        s.push_str(&format!("Solutions found: {}\n", self.solution_count));

        if let Some(subgraph) = &self.subgraph {
            s.push_str(&format!("\nEdges in minimal subgraph: {}\n", subgraph.edge_count()));
            let listing = subgraph.edge_listing(edges_per_line);
            if !listing.is_empty() {
                s.push_str(&listing);
                s.push('\n');
            }
        }
        s
    }
}

/// Split a duration into whole days, hours, minutes and seconds.
pub fn execution_time(elapsed: Duration) -> (u64, u64, u64, u64) {
    let total = elapsed.as_secs();
    let days = total / 86_400;
    let rest = total % 86_400;
    (days, rest / 3600, (rest / 60) % 60, rest % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tcsw::formulation::{build_model, Formulation};
    use tcsw_core::{ConnectivityDemand, ExistenceMap};

    fn path_model() -> (TemporalGraph<u32>, TcswModel<u32>) {
        let mut graph = TemporalGraph::new();
        graph.add_path(&[1, 2, 3, 4], 1.0).unwrap();
        let existence = ExistenceMap::always_active(graph.nodes().cloned(), 4);
        let model = build_model(
            &graph,
            &existence,
            &ConnectivityDemand::single(1, 4),
            Formulation::base(),
        )
        .unwrap();
        (graph, model)
    }

    /// Route the unit along 1->2->3->4 advancing one step per hop.
    fn path_values(model: &TcswModel<u32>) -> Vec<f64> {
        let mut values = vec![0.0; model.milp().num_variables()];
        for (u, v, t) in [(1, 2, 0), (2, 3, 1), (3, 4, 2)] {
            values[model.edge_time_var(&u, &v, t, t + 1).unwrap().value()] = 1.0;
            values[model.edge_var(&u, &v).unwrap().value()] = 1.0;
        }
        values
    }

    #[test]
    fn test_optimal_outcome_extracts_subgraph() {
        let (graph, model) = path_model();
        let values = path_values(&model);
        let outcome =
            MilpOutcome::with_solution(SolveStatus::Optimal, model.milp(), values, Duration::ZERO);

        let solution = TcswSolution::from_outcome(&model, &graph, outcome, 1e-9, "test").unwrap();
        assert!(solution.certified_optimal);
        assert_eq!(solution.objective, Some(3.0));
        let subgraph = solution.optimal_subgraph().unwrap();
        assert_eq!(subgraph.edge_pairs(), vec![(1, 2), (2, 3), (3, 4)]);
        assert_eq!(subgraph.node_count(), 4);
        assert_eq!(solution.flows.len(), 3);
        assert_eq!(solution.flows[0].departure, 0);
        assert_eq!(solution.flows[0].arrival, 1);
    }

    #[test]
    fn test_values_below_tolerance_are_dropped() {
        let (graph, model) = path_model();
        let mut values = path_values(&model);
        values[model.edge_var(&3, &4).unwrap().value()] = 1e-12;
        let outcome =
            MilpOutcome::with_solution(SolveStatus::Optimal, model.milp(), values, Duration::ZERO);

        let solution = TcswSolution::from_outcome(&model, &graph, outcome, 1e-9, "test").unwrap();
        assert!(!solution.subgraph.unwrap().contains_edge(&3, &4));
    }

    #[test]
    fn test_time_limit_incumbent_is_flagged() {
        let (graph, model) = path_model();
        let values = path_values(&model);
        let outcome = MilpOutcome::with_solution(
            SolveStatus::TimeLimit,
            model.milp(),
            values,
            Duration::from_secs(1200),
        );

        let solution = TcswSolution::from_outcome(&model, &graph, outcome, 1e-9, "test").unwrap();
        assert!(!solution.certified_optimal);
        assert!(solution.is_uncertified());
        assert!(solution.subgraph.is_some());
        assert!(solution.optimal_subgraph().is_none());
        assert!(solution.summary().contains("not certified optimal"));
    }

    #[test]
    fn test_infeasible_outcome_has_no_subgraph() {
        let (graph, model) = path_model();
        let outcome =
            MilpOutcome::without_solution(SolveStatus::Infeasible, Duration::ZERO, "infeasible");

        let solution = TcswSolution::from_outcome(&model, &graph, outcome, 1e-9, "test").unwrap();
        assert!(solution.is_infeasible());
        assert!(solution.subgraph.is_none());
        assert_eq!(solution.objective, None);
        assert!(solution.summary().contains("No solution (infeasible)"));
    }

    #[test]
    fn test_summary_lists_edges() {
        let (graph, model) = path_model();
        let outcome = MilpOutcome::with_solution(
            SolveStatus::Optimal,
            model.milp(),
            path_values(&model),
            Duration::from_millis(1500),
        );
        let solution = TcswSolution::from_outcome(&model, &graph, outcome, 1e-9, "test").unwrap();
        let summary = solution.summary();

        assert!(summary.contains("Status: Optimal"));
        assert!(summary.contains("Objective: 3"));
        assert!(summary.contains("1 -> 2"));
        assert!(summary.contains("0d 0h 0m 1s"));
    }

    #[test]
    fn test_execution_time_breakdown() {
        assert_eq!(execution_time(Duration::from_secs(0)), (0, 0, 0, 0));
        assert_eq!(execution_time(Duration::from_secs(3_725)), (0, 1, 2, 5));
        assert_eq!(execution_time(Duration::from_secs(90_061)), (1, 1, 1, 1));
    }
}
