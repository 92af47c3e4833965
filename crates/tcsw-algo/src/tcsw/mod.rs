//! Temporally Connected Subgraph with Weight (TCSW)
//!
//! This module formulates TCSW instances as Mixed-Integer Linear Programs and
//! reads the selected subgraph back from a solved model.
//!
//! ## Problem Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TEMPORALLY CONNECTED SUBGRAPH WITH WEIGHT (TCSW)                        │
//! │  ────────────────────────────────────────────                            │
//! │                                                                          │
//! │  Given:                                                                  │
//! │    • Directed graph with non-negative edge weights                      │
//! │    • Activity flags for every (node, time), time in 0..=T               │
//! │    • A source and one or more destinations                              │
//! │                                                                          │
//! │  Decide:                                                                 │
//! │    • Which edges to keep (binary d[u,v])                                │
//! │    • When flow traverses them (d[u,v,t,t'])                             │
//! │                                                                          │
//! │  Minimize:                                                               │
//! │    Σ w(u,v) · d[u,v]                                                    │
//! │                                                                          │
//! │  Subject to:                                                             │
//! │    • Flow only touches active (node, time) pairs                        │
//! │    • d[u,v] covers every time the edge carries flow                     │
//! │    • Flow balance at every (node, time)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Variants
//!
//! | Variant           | arrival window t'       | edge-time domain |
//! |-------------------|-------------------------|------------------|
//! | base              | t ..= min(t+1, T)       | binary           |
//! | k-delay           | t ..= min(t+k, T)       | binary           |
//! | multi-destination | t ..= min(t+1, T)       | integer [0, n]   |
//!
//! All three are one [`Formulation`]; see [`build_model`] for the exact
//! constraint rows. The source injects `n` units at time 0 and every
//! destination absorbs one unit at time `T`.
//!
//! Infeasible instances are reported through [`TcswSolution::status`], not as
//! errors. Malformed inputs (gaps in the time axis, missing existence entries,
//! inactive endpoints) fail with [`tcsw_core::TcswError::Configuration`] before
//! any model is built.

mod audit;
mod formulation;
mod network;
mod solution;
mod solver;

pub use audit::{audit_solution, AuditViolation};
pub use formulation::{
    build_model, ConstraintFamily, DelayWindow, EdgeTimeSlot, FlowDomain, Formulation, ModelEdge,
    TcswModel,
};
pub use network::TimeExpandedNetwork;
pub use solution::{execution_time, EdgeTimeFlow, TcswSolution, DEFAULT_EDGES_PER_LINE};
pub use solver::{
    solve_k_tcsw, solve_model, solve_multi_destination_tcsw, solve_tcsw, solve_with_backend,
    TcswSolverConfig,
};
