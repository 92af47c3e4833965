use super::{formulation_name, solver_config, SolutionOutput};
use crate::cli::PathArgs;
use anyhow::{Context, Result};
use tcsw_algo::backends::BackendKind;
use tcsw_algo::tcsw::{solve_with_backend, Formulation, TcswSolution};
use tcsw_core::{ConnectivityDemand, ExistenceMap, TemporalGraph};
use tracing::{info, warn};

const TIME_COUNT: u32 = 4;

/// Path 1 -> 2 -> 3 -> 4 with unit weights, every node active at times 0..=3.
/// `infeasible` switches node 4 off at time 3.
pub fn sample_instance(infeasible: bool) -> Result<(TemporalGraph<u32>, ExistenceMap<u32>)> {
    let mut graph = TemporalGraph::new();
    graph
        .add_path(&[1, 2, 3, 4], 1.0)
        .context("building sample path")?;
    let mut existence = ExistenceMap::always_active(graph.nodes().cloned(), TIME_COUNT);
    existence.set(4, TIME_COUNT - 1, !infeasible);
    Ok((graph, existence))
}

pub fn handle(args: &PathArgs) -> Result<()> {
    let (graph, existence) = sample_instance(args.infeasible)?;
    let demand = ConnectivityDemand::single(1, 4);
    let formulation = args.k.map(Formulation::k_delay).unwrap_or_default();
    let config = solver_config(args.k, args.time_limit).with_detailed_output(args.detailed);

    info!(
        infeasible = args.infeasible,
        formulation = %formulation_name(&formulation),
        "solving sample path instance"
    );
    let backend = BackendKind::preferred().build_backend();
    let solution = match solve_with_backend(
        &graph,
        &existence,
        &demand,
        formulation,
        backend.as_ref(),
        &config,
    ) {
        Ok(solution) => solution,
        Err(err) if err.is_configuration() => {
            warn!(error = %err, "instance rejected before solving");
            println!("No solution: {}", err);
            return Ok(());
        }
        Err(err) => return Err(err).context("solving sample path instance"),
    };

    print_solution(&solution, config.edges_per_line, args.detailed);
    Ok(())
}

fn print_solution(solution: &TcswSolution<u32>, edges_per_line: usize, detailed: bool) {
    if detailed {
        println!("{}", solution.summary_with(edges_per_line));
        return;
    }
    let output = SolutionOutput::from_solution(solution);
    println!("Status: {}", output.status);
    if let Some(objective) = output.objective {
        println!("Objective: {}", objective);
    }
    let edges: Vec<String> = output
        .edges
        .iter()
        .map(|e| format!("{} -> {}", e.from, e.to))
        .collect();
    if !edges.is_empty() {
        println!("Edges: {}", edges.join(", "));
    }
}
