//! Solver boundary: a backend-neutral MILP model and the backend trait.

pub mod backend;
pub mod model;

pub use backend::{MilpBackend, MilpOutcome, SolveLimits, SolveStatus};
pub use model::{LinearConstraint, LinearExpr, MilpModel, Relation, VarId, VariableDef, VariableKind};
