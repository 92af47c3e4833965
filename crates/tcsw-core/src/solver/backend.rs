use super::model::{MilpModel, VarId};
use crate::TcswResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Trait for MILP solvers that can solve a [`MilpModel`].
///
/// This is the only seam between formulation code and a concrete solver.
/// Branch-and-bound, cutting planes and LP relaxations are entirely the
/// backend's business.
pub trait MilpBackend: Send + Sync {
    /// Unique identifier (e.g., "microlp")
    fn id(&self) -> &str;

    /// Whether [`SolveLimits::time_limit`] is honoured
    fn supports_time_limit(&self) -> bool;

    /// Solve the model once.
    ///
    /// Infeasibility and time limits are reported through
    /// [`MilpOutcome::status`]; `Err` is reserved for solver faults.
    fn solve(&self, model: &MilpModel, limits: &SolveLimits) -> TcswResult<MilpOutcome>;
}

/// Status reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Certified optimal solution found.
    Optimal,
    /// No feasible assignment exists.
    Infeasible,
    /// Wall-clock limit reached; an incumbent may or may not exist.
    TimeLimit,
    /// Anything else the backend could not classify.
    Other,
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "optimal"),
            SolveStatus::Infeasible => write!(f, "infeasible"),
            SolveStatus::TimeLimit => write!(f, "time_limit"),
            SolveStatus::Other => write!(f, "other"),
        }
    }
}

/// Resource limits for one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolveLimits {
    pub time_limit: Option<Duration>,
}

/// Raw result of one backend solve.
#[derive(Debug, Clone, PartialEq)]
pub struct MilpOutcome {
    pub status: SolveStatus,
    /// Dense values indexed by [`VarId`]; empty when no solution exists.
    pub values: Vec<f64>,
    pub objective_value: Option<f64>,
    pub solution_count: usize,
    pub solve_time: Duration,
    pub message: String,
}

impl MilpOutcome {
    /// Outcome carrying a solution.
    pub fn with_solution(
        status: SolveStatus,
        model: &MilpModel,
        values: Vec<f64>,
        solve_time: Duration,
    ) -> Self {
        let objective_value = Some(model.objective().evaluate(&values));
        Self {
            status,
            values,
            objective_value,
            solution_count: 1,
            solve_time,
            message: status.to_string(),
        }
    }

    /// Outcome without any solution (infeasible, or limit hit before an incumbent).
    pub fn without_solution(status: SolveStatus, solve_time: Duration, message: impl Into<String>) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective_value: None,
            solution_count: 0,
            solve_time,
            message: message.into(),
        }
    }

    pub fn value(&self, var: VarId) -> Option<f64> {
        self.values.get(var.value()).copied()
    }

    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    pub fn solution_count(&self) -> usize {
        self.solution_count
    }

    pub fn has_incumbent(&self) -> bool {
        !self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::model::{LinearExpr, VariableKind};

    #[test]
    fn test_outcome_objective_is_evaluated_from_values() {
        let mut model = MilpModel::new("objective");
        let x = model.create_variable(VariableKind::Binary, "x");
        let y = model.create_variable(VariableKind::Binary, "y");
        let mut objective = LinearExpr::term(x, 3.0);
        objective.add_term(y, 5.0);
        model.set_objective(objective);

        let outcome = MilpOutcome::with_solution(
            SolveStatus::Optimal,
            &model,
            vec![1.0, 0.0],
            Duration::ZERO,
        );
        assert_eq!(outcome.objective_value(), Some(3.0));
        assert_eq!(outcome.value(y), Some(0.0));
        assert_eq!(outcome.solution_count(), 1);
        assert!(outcome.has_incumbent());
    }

    #[test]
    fn test_outcome_without_solution() {
        let outcome =
            MilpOutcome::without_solution(SolveStatus::Infeasible, Duration::ZERO, "infeasible");
        assert!(!outcome.has_incumbent());
        assert_eq!(outcome.value(VarId::new(0)), None);
        assert_eq!(outcome.solution_count(), 0);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SolveStatus::TimeLimit.to_string(), "time_limit");
        assert!(SolveStatus::Optimal.is_optimal());
        assert!(!SolveStatus::TimeLimit.is_optimal());
    }

    /// Backends are used as trait objects.
    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_backend(_b: &dyn MilpBackend) {}
        fn _assert_send_sync<T: Send + Sync>() {}
        _assert_send_sync::<Box<dyn MilpBackend>>();
    }
}
