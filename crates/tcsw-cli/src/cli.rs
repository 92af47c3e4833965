use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Minimum-weight temporally connected subgraphs", long_about = None)]
pub struct Cli {
    /// Default logging level; RUST_LOG directives take precedence
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve the four-node sample path 1 -> 2 -> 3 -> 4
    Path(PathArgs),
    /// Generate and solve a random instance
    Random(RandomArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    /// Deactivate node 4 at the last time step
    #[arg(long)]
    pub infeasible: bool,
    /// Use the k-delay formulation with this delay bound
    #[arg(long)]
    pub k: Option<u32>,
    /// Wall-clock limit in seconds (k-delay defaults to 1200)
    #[arg(long)]
    pub time_limit: Option<f64>,
    /// Print the full summary including the edge listing
    #[arg(long)]
    pub detailed: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RandomArgs {
    /// Number of nodes in the random digraph
    #[arg(long, default_value_t = 10)]
    pub nodes: u32,
    /// Probability of each ordered pair becoming an edge
    #[arg(long, default_value_t = 0.3)]
    pub edge_prob: f64,
    /// Lower bound for edge weights
    #[arg(long, default_value_t = 1.0)]
    pub min_weight: f64,
    /// Upper bound for edge weights
    #[arg(long, default_value_t = 10.0)]
    pub max_weight: f64,
    /// Number of time steps
    #[arg(long, default_value_t = 10)]
    pub times: u32,
    /// Probability that a node is active at a given time
    #[arg(long, default_value_t = 0.25)]
    pub active_prob: f64,
    /// Delay bound; omit for the base formulation
    #[arg(long)]
    pub k: Option<u32>,
    /// Number of destinations
    #[arg(long, default_value_t = 1)]
    pub destinations: usize,
    /// RNG seed for reproducible instances
    #[arg(long)]
    pub seed: Option<u64>,
    /// Wall-clock limit in seconds (k-delay defaults to 1200)
    #[arg(long)]
    pub time_limit: Option<f64>,
    /// Existence samples to draw before giving up
    #[arg(long, default_value_t = 1000)]
    pub max_attempts: usize,
    /// MILP backend (microlp, or highs with the solver-highs feature);
    /// defaults to highs when compiled in
    #[arg(long)]
    pub backend: Option<String>,
    /// Edges per line in the listing
    #[arg(long, default_value_t = 5)]
    pub edges_per_line: usize,
    /// Emit the configuration and result as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_defaults() {
        let cli = Cli::try_parse_from(["tcsw", "path"]).unwrap();
        assert_eq!(cli.log_level, tracing::Level::INFO);
        match cli.command {
            Commands::Path(args) => {
                assert!(!args.infeasible);
                assert_eq!(args.k, None);
                assert_eq!(args.time_limit, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_random_arguments() {
        let cli = Cli::try_parse_from([
            "tcsw",
            "random",
            "--nodes",
            "12",
            "--edge-prob",
            "0.4",
            "--times",
            "5",
            "--active-prob",
            "0.9",
            "--k",
            "2",
            "--destinations",
            "3",
            "--seed",
            "17",
            "--json",
            "--log-level",
            "warn",
        ])
        .unwrap();

        assert_eq!(cli.log_level, tracing::Level::WARN);
        let Commands::Random(args) = cli.command else {
            panic!("expected random command");
        };
        assert_eq!(args.nodes, 12);
        assert_eq!(args.edge_prob, 0.4);
        assert_eq!(args.times, 5);
        assert_eq!(args.active_prob, 0.9);
        assert_eq!(args.k, Some(2));
        assert_eq!(args.destinations, 3);
        assert_eq!(args.seed, Some(17));
        assert_eq!(args.backend, None);
        assert!(args.json);
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["tcsw"]).is_err());
        assert!(Cli::try_parse_from(["tcsw", "path", "--k", "soon"]).is_err());
    }
}
