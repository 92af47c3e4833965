//! Backend-neutral MILP model.
//!
//! Formulation code registers variables, linear constraints and a
//! minimisation objective here; a [`super::MilpBackend`] later translates the
//! model into whatever its solver understands. Keeping the model as plain data
//! means a formulation can be inspected (and compared) without solving it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a model variable (its position in [`MilpModel::variables`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub fn new(value: usize) -> Self {
        VarId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

/// Variable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Binary,
    /// Integer in `[lower, upper]`
    Integer { lower: i64, upper: i64 },
}

impl VariableKind {
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            VariableKind::Binary => (0.0, 1.0),
            VariableKind::Integer { lower, upper } => (*lower as f64, *upper as f64),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDef {
    pub name: String,
    pub kind: VariableKind,
}

/// `Σ coef · var + constant`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    /// `coef · var`
    pub fn term(var: VarId, coef: f64) -> Self {
        Self {
            terms: vec![(var, coef)],
            constant: 0.0,
        }
    }

    /// `Σ vars` with unit coefficients.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self {
            terms: vars.into_iter().map(|var| (var, 1.0)).collect(),
            constant: 0.0,
        }
    }

    pub fn add_term(&mut self, var: VarId, coef: f64) {
        self.terms.push((var, coef));
    }

    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    pub fn with_constant(mut self, value: f64) -> Self {
        self.constant += value;
        self
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn constant_value(&self) -> f64 {
        self.constant
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate against a dense value vector indexed by [`VarId`].
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coef)| coef * values.get(var.value()).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        LinearExpr::term(var, 1.0)
    }
}

impl From<f64> for LinearExpr {
    fn from(value: f64) -> Self {
        LinearExpr::constant(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    LessEq,
    GreaterEq,
    Equal,
}

impl Relation {
    /// Whether `lhs (relation) rhs` holds within `tolerance`.
    pub fn holds(&self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Relation::LessEq => lhs <= rhs + tolerance,
            Relation::GreaterEq => lhs + tolerance >= rhs,
            Relation::Equal => (lhs - rhs).abs() <= tolerance,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::LessEq => write!(f, "<="),
            Relation::GreaterEq => write!(f, ">="),
            Relation::Equal => write!(f, "=="),
        }
    }
}

/// `lhs (relation) rhs`, tagged with a readable name and a group label.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub group: &'static str,
    pub lhs: LinearExpr,
    pub relation: Relation,
    pub rhs: LinearExpr,
}

impl LinearConstraint {
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.relation
            .holds(self.lhs.evaluate(values), self.rhs.evaluate(values), tolerance)
    }
}

/// Variables, constraints and a minimisation objective.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilpModel {
    name: String,
    variables: Vec<VariableDef>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
}

impl MilpModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn create_variable(&mut self, kind: VariableKind, name: impl Into<String>) -> VarId {
        let id = VarId::new(self.variables.len());
        self.variables.push(VariableDef {
            name: name.into(),
            kind,
        });
        id
    }

    pub fn add_linear_constraint(
        &mut self,
        name: impl Into<String>,
        group: &'static str,
        lhs: LinearExpr,
        relation: Relation,
        rhs: LinearExpr,
    ) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            group,
            lhs,
            relation,
            rhs,
        });
    }

    /// Objective to minimise.
    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> Option<&VariableDef> {
        self.variables.get(id.value())
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn constraints_in<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a LinearConstraint> + 'a {
        self.constraints.iter().filter(move |c| c.group == group)
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Names of the constraints violated by `values`.
    pub fn violated_constraints(&self, values: &[f64], tolerance: f64) -> Vec<&str> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(values, tolerance))
            .map(|c| c.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_ids_are_sequential() {
        let mut model = MilpModel::new("test");
        let x = model.create_variable(VariableKind::Binary, "x");
        let y = model.create_variable(VariableKind::Integer { lower: 0, upper: 3 }, "y");

        assert_eq!(x.value(), 0);
        assert_eq!(y.value(), 1);
        assert_eq!(model.variable(y).unwrap().kind.bounds(), (0.0, 3.0));
    }

    #[test]
    fn test_expression_evaluation() {
        let x = VarId::new(0);
        let y = VarId::new(1);
        let mut expr = LinearExpr::term(x, 2.0).with_constant(1.0);
        expr.add_term(y, -1.0);

        assert_eq!(expr.evaluate(&[3.0, 4.0]), 3.0);
        assert_eq!(LinearExpr::sum(vec![x, y]).evaluate(&[1.0, 1.0]), 2.0);
    }

    #[test]
    fn test_relation_tolerance() {
        assert!(Relation::Equal.holds(1.0, 1.0 + 1e-10, 1e-9));
        assert!(!Relation::Equal.holds(1.0, 1.1, 1e-9));
        assert!(Relation::LessEq.holds(1.0, 1.0, 0.0));
        assert!(!Relation::GreaterEq.holds(0.0, 1.0, 1e-9));
    }

    #[test]
    fn test_violated_constraints() {
        let mut model = MilpModel::new("test");
        let x = model.create_variable(VariableKind::Binary, "x");
        model.add_linear_constraint(
            "x_at_most_zero",
            "bounds",
            x.into(),
            Relation::LessEq,
            LinearExpr::constant(0.0),
        );
        model.add_linear_constraint(
            "x_at_least_zero",
            "bounds",
            x.into(),
            Relation::GreaterEq,
            LinearExpr::constant(0.0),
        );

        assert!(model.violated_constraints(&[0.0], 1e-9).is_empty());
        assert_eq!(model.violated_constraints(&[1.0], 1e-9), vec!["x_at_most_zero"]);
        assert_eq!(model.constraints_in("bounds").count(), 2);
    }
}
