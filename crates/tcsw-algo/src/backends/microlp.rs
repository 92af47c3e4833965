//! Pure-Rust MILP backend built on `good_lp`'s microlp branch-and-bound.

use super::translate::{
    add_rows, collect_values, constant_row_outcome, declare_variables, objective,
    resolution_outcome,
};
use good_lp::solvers::microlp::microlp;
use good_lp::SolverModel;
use std::time::Instant;
use tcsw_core::{MilpBackend, MilpModel, MilpOutcome, SolveLimits, SolveStatus, TcswResult};

/// Default backend: no native libraries, exact integrality, no time limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrolpBackend;

impl MicrolpBackend {
    pub fn new() -> Self {
        Self
    }
}

impl MilpBackend for MicrolpBackend {
    fn id(&self) -> &str {
        "microlp"
    }

    fn supports_time_limit(&self) -> bool {
        false
    }

    fn solve(&self, model: &MilpModel, _limits: &SolveLimits) -> TcswResult<MilpOutcome> {
        let start = Instant::now();
        if let Some(outcome) = constant_row_outcome(model, start) {
            return Ok(outcome);
        }

        let (vars, handles) = declare_variables(model);
        let problem = vars
            .minimise(objective(model, &handles))
            .using(microlp);
        let problem = add_rows(problem, model, &handles);

        match problem.solve() {
            Ok(solution) => Ok(MilpOutcome::with_solution(
                SolveStatus::Optimal,
                model,
                collect_values(&solution, &handles),
                start.elapsed(),
            )),
            Err(e) => resolution_outcome(self.id(), e, start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tcsw_core::{LinearExpr, Relation, VariableKind};

    #[test]
    fn test_solves_small_binary_program() {
        // min 2x + 3y  s.t.  x + y >= 1
        let mut model = MilpModel::new("cover");
        let x = model.create_variable(VariableKind::Binary, "x");
        let y = model.create_variable(VariableKind::Binary, "y");
        let mut objective = LinearExpr::term(x, 2.0);
        objective.add_term(y, 3.0);
        model.set_objective(objective);
        model.add_linear_constraint(
            "cover",
            "test",
            LinearExpr::sum(vec![x, y]),
            Relation::GreaterEq,
            LinearExpr::constant(1.0),
        );

        let outcome = MicrolpBackend.solve(&model, &SolveLimits::default()).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.value(x), Some(1.0));
        assert_eq!(outcome.value(y), Some(0.0));
        assert_eq!(outcome.objective_value(), Some(2.0));
    }

    #[test]
    fn test_respects_integer_bounds() {
        // min -x  s.t.  x in [0, 3]
        let mut model = MilpModel::new("bounds");
        let x = model.create_variable(VariableKind::Integer { lower: 0, upper: 3 }, "x");
        model.set_objective(LinearExpr::term(x, -1.0));

        let outcome = MicrolpBackend.solve(&model, &SolveLimits::default()).unwrap();
        assert_eq!(outcome.value(x), Some(3.0));
    }

    #[test]
    fn test_reports_infeasibility_as_status() {
        let mut model = MilpModel::new("infeasible");
        let x = model.create_variable(VariableKind::Binary, "x");
        model.set_objective(LinearExpr::term(x, 1.0));
        model.add_linear_constraint(
            "too_much",
            "test",
            x.into(),
            Relation::GreaterEq,
            LinearExpr::constant(2.0),
        );

        let outcome = MicrolpBackend.solve(&model, &SolveLimits::default()).unwrap();
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert!(!outcome.has_incumbent());
    }

    #[test]
    fn test_violated_constant_row_is_infeasible() {
        let mut model = MilpModel::new("constant");
        let x = model.create_variable(VariableKind::Binary, "x");
        model.set_objective(LinearExpr::term(x, 1.0));
        model.add_linear_constraint(
            "isolated_source",
            "test",
            LinearExpr::constant(1.0),
            Relation::Equal,
            LinearExpr::new(),
        );

        let outcome = MicrolpBackend.solve(&model, &SolveLimits::default()).unwrap();
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert!(outcome.message.contains("isolated_source"));
    }

    #[test]
    fn test_time_limit_is_ignored() {
        let mut model = MilpModel::new("limit");
        let x = model.create_variable(VariableKind::Binary, "x");
        model.set_objective(LinearExpr::term(x, 1.0));

        let limits = SolveLimits {
            time_limit: Some(Duration::from_secs(1)),
        };
        let backend = MicrolpBackend::new();
        assert!(!backend.supports_time_limit());
        let outcome = backend.solve(&model, &limits).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
    }
}
