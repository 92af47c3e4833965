use super::{formulation_name, solver_config, SolutionOutput};
use crate::cli::RandomArgs;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::str::FromStr;
use tcsw_algo::backends::BackendKind;
use tcsw_algo::generator::{
    generate_multi_destination_instance, random_digraph, rng_from_seed, GeneratorConfig,
};
use tcsw_algo::tcsw::{solve_with_backend, Formulation, TcswSolverConfig};
use tracing::info;

#[derive(Debug, Serialize)]
struct InstanceOutput {
    nodes: usize,
    edges: usize,
    source: u32,
    destinations: Vec<u32>,
    attempts: usize,
}

#[derive(Debug, Serialize)]
struct RandomOutput {
    seed: Option<u64>,
    formulation: Formulation,
    generator: GeneratorConfig,
    solver: TcswSolverConfig,
    instance: InstanceOutput,
    solution: SolutionOutput<u32>,
}

/// Formulation for `destinations` destinations with an optional delay bound.
pub fn formulation_for(k: Option<u32>, destinations: usize) -> Result<Formulation> {
    if destinations <= 1 {
        return Ok(k.map(Formulation::k_delay).unwrap_or_default());
    }
    let units = u32::try_from(destinations)
        .map_err(|_| anyhow!("{} destinations is too many", destinations))?;
    let formulation = Formulation::multi_destination(units);
    Ok(match k {
        Some(k) => formulation.with_max_delay(k),
        None => formulation,
    })
}

pub fn handle(args: &RandomArgs) -> Result<()> {
    let backend = match &args.backend {
        Some(name) => BackendKind::from_str(name).context("selecting backend")?,
        None => BackendKind::preferred(),
    }
    .build_backend();
    let formulation = formulation_for(args.k, args.destinations)?;
    let generator = GeneratorConfig {
        time_count: args.times,
        node_active_probability: args.active_prob,
        max_delay: formulation.max_delay(),
        max_attempts: args.max_attempts,
    };
    let mut solver = solver_config(args.k, args.time_limit);
    solver.edges_per_line = args.edges_per_line;

    let mut rng = rng_from_seed(args.seed);
    let graph = random_digraph(
        args.nodes,
        args.edge_prob,
        args.min_weight..=args.max_weight,
        &mut rng,
    )
    .context("generating random digraph")?;
    let instance =
        generate_multi_destination_instance(&graph, &generator, args.destinations, &mut rng)
            .context("sampling existence windows")?;

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        source = instance.demand.source,
        destinations = ?instance.demand.destinations,
        attempts = instance.attempts,
        formulation = %formulation_name(&formulation),
        "generated random instance"
    );

    let solution = solve_with_backend(
        &instance.graph,
        &instance.existence,
        &instance.demand,
        formulation,
        backend.as_ref(),
        &solver,
    )
    .context("solving random instance")?;

    if args.json {
        let output = RandomOutput {
            seed: args.seed,
            formulation,
            generator,
            solver,
            instance: InstanceOutput {
                nodes: graph.node_count(),
                edges: graph.edge_count(),
                source: instance.demand.source,
                destinations: instance.demand.destinations.clone(),
                attempts: instance.attempts,
            },
            solution: SolutionOutput::from_solution(&solution),
        };
        let json = serde_json::to_string_pretty(&output).context("serializing result")?;
        println!("{}", json);
    } else {
        println!(
            "Instance: {} nodes, {} edges, source {} -> {:?} ({} attempt(s))",
            graph.node_count(),
            graph.edge_count(),
            instance.demand.source,
            instance.demand.destinations,
            instance.attempts
        );
        println!("{}", solution.summary_with(solver.edges_per_line));
    }
    Ok(())
}
