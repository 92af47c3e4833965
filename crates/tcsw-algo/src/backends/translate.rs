//! Translation of a [`MilpModel`] into `good_lp` problems, shared by the
//! backends in this module.

use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};
use std::time::Instant;
use tcsw_core::{
    LinearConstraint, LinearExpr, MilpModel, MilpOutcome, Relation, SolveStatus, TcswError,
    TcswResult, VariableKind,
};
use tracing::debug;

/// Values of integer variables this close to an integer are snapped to it.
const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Rows without variables never reach the solver. A violated one makes the
/// model infeasible outright.
pub(crate) fn constant_row_outcome(model: &MilpModel, start: Instant) -> Option<MilpOutcome> {
    let row = model
        .constraints()
        .iter()
        .filter(|c| is_constant_row(c))
        .find(|c| !c.is_satisfied(&[], 0.0))?;
    debug!(constraint = %row.name, "constant constraint is violated");
    Some(MilpOutcome::without_solution(
        SolveStatus::Infeasible,
        start.elapsed(),
        format!("constraint {} cannot hold", row.name),
    ))
}

/// Declare one `good_lp` variable per model variable, in `VarId` order.
pub(crate) fn declare_variables(model: &MilpModel) -> (ProblemVariables, Vec<Variable>) {
    let mut vars = ProblemVariables::new();
    let handles = model
        .variables()
        .iter()
        .map(|def| {
            let definition = match def.kind {
                VariableKind::Binary => variable().binary(),
                VariableKind::Integer { lower, upper } => {
                    variable().integer().min(lower as f64).max(upper as f64)
                }
            };
            vars.add(definition.name(def.name.clone()))
        })
        .collect();
    (vars, handles)
}

pub(crate) fn objective(model: &MilpModel, handles: &[Variable]) -> Expression {
    to_expression(model.objective(), handles)
}

pub(crate) fn add_rows<M: SolverModel>(mut problem: M, model: &MilpModel, handles: &[Variable]) -> M {
    for row in model.constraints() {
        if is_constant_row(row) {
            continue;
        }
        let lhs = to_expression(&row.lhs, handles);
        let rhs = to_expression(&row.rhs, handles);
        problem = match row.relation {
            Relation::LessEq => problem.with(constraint!(lhs <= rhs)),
            Relation::GreaterEq => problem.with(constraint!(lhs >= rhs)),
            Relation::Equal => problem.with(constraint!(lhs == rhs)),
        };
    }
    problem
}

pub(crate) fn collect_values<S: Solution>(solution: &S, handles: &[Variable]) -> Vec<f64> {
    handles
        .iter()
        .map(|handle| snap(solution.value(*handle)))
        .collect()
}

/// Infeasibility is an outcome; anything else unexpected is a fault.
pub(crate) fn resolution_outcome(
    backend: &str,
    error: ResolutionError,
    start: Instant,
) -> TcswResult<MilpOutcome> {
    match error {
        ResolutionError::Infeasible => Ok(MilpOutcome::without_solution(
            SolveStatus::Infeasible,
            start.elapsed(),
            "infeasible",
        )),
        ResolutionError::Unbounded => Ok(MilpOutcome::without_solution(
            SolveStatus::Other,
            start.elapsed(),
            "unbounded",
        )),
        other => Err(TcswError::SolverFault(format!("{}: {:?}", backend, other))),
    }
}

fn is_constant_row(row: &LinearConstraint) -> bool {
    row.lhs.is_constant() && row.rhs.is_constant()
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant_value());
    for (var, coef) in expr.terms() {
        out += *coef * handles[var.value()];
    }
    out
}

fn snap(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() < INTEGRALITY_TOLERANCE {
        rounded
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap() {
        assert_eq!(snap(0.9999999999), 1.0);
        assert_eq!(snap(1e-12), 0.0);
        assert_eq!(snap(0.5), 0.5);
    }

    #[test]
    fn test_satisfied_constant_rows_are_skipped() {
        let mut model = MilpModel::new("constant");
        model.add_linear_constraint(
            "trivial",
            "test",
            LinearExpr::constant(0.0),
            Relation::Equal,
            LinearExpr::new(),
        );
        assert!(constant_row_outcome(&model, Instant::now()).is_none());
    }

    #[test]
    fn test_declares_variables_in_order() {
        let mut model = MilpModel::new("vars");
        model.create_variable(VariableKind::Binary, "a");
        model.create_variable(VariableKind::Integer { lower: 0, upper: 4 }, "b");
        let (_, handles) = declare_variables(&model);
        assert_eq!(handles.len(), 2);
    }
}
