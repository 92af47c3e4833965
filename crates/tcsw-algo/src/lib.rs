//! # tcsw-algo: TCSW Formulations and Solvers
//!
//! This crate turns Temporally Connected Subgraph with Weight (TCSW)
//! instances into Mixed-Integer Linear Programs, solves them through a
//! [`tcsw_core::MilpBackend`], and reads the minimum-weight subgraph back.
//!
//! ## Variants
//!
//! | Entry point | Formulation | Notes |
//! |-------------|-------------|-------|
//! | [`tcsw::solve_tcsw`] | [`tcsw::Formulation::base`] | one destination, delay ≤ 1 |
//! | [`tcsw::solve_k_tcsw`] | [`tcsw::Formulation::k_delay`] | one destination, delay ≤ k |
//! | [`tcsw::solve_multi_destination_tcsw`] | [`tcsw::Formulation::multi_destination`] | integer flow to n destinations |
//!
//! ### Architecture
//!
//! - **[`tcsw::build_model`]**: formulates an instance (what to solve)
//! - **[`tcsw_core::MilpBackend`]**: solves the resulting model (how to solve it)
//! - **[`tcsw::TcswSolution`]**: extracted subgraph plus raw status
//! - **[`tcsw::audit_solution`]**: re-checks an assignment against the flow semantics
//!
//! The default backend is [`backends::MicrolpBackend`], a pure-Rust
//! branch-and-bound solver without time limits. The `solver-highs` feature
//! adds `HighsBackend`, which enforces them and becomes the backend of the
//! `solve_*` entry points. Other solvers plug in by implementing the trait.
//!
//! ## Instance Generation
//!
//! [`generator`] samples activity windows and only returns instances with a
//! temporal path from the chosen source to its destination(s).
//!
//! ## Example
//!
//! ```
//! use tcsw_algo::generator::{generate_instance, random_digraph, rng_from_seed, GeneratorConfig};
//! use tcsw_algo::tcsw::{solve_with_backend, Formulation, TcswSolverConfig};
//! use tcsw_algo::backends::MicrolpBackend;
//!
//! let mut rng = rng_from_seed(Some(42));
//! let graph = random_digraph(6, 0.5, 1.0..=10.0, &mut rng)?;
//! let config = GeneratorConfig { time_count: 3, node_active_probability: 0.9, ..Default::default() };
//! let instance = generate_instance(&graph, &config, &mut rng)?;
//!
//! let solution = solve_with_backend(
//!     &instance.graph,
//!     &instance.existence,
//!     &instance.demand,
//!     Formulation::base(),
//!     &MicrolpBackend::new(),
//!     &TcswSolverConfig::default(),
//! )?;
//! assert!(solution.certified_optimal);
//! # Ok::<(), tcsw_core::TcswError>(())
//! ```

pub mod backends;
pub mod generator;
pub mod tcsw;

pub use backends::{BackendKind, MicrolpBackend};
pub use generator::{GeneratedInstance, GeneratorConfig};
pub use tcsw::{
    audit_solution, build_model, solve_k_tcsw, solve_multi_destination_tcsw, solve_tcsw,
    Formulation, TcswModel, TcswSolution, TcswSolverConfig,
};
