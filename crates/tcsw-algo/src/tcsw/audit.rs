//! Solution audit
//!
//! Recomputes the structural properties of a TCSW assignment from raw
//! variable values, independently of the constraint rows the backend saw.
//! An empty report means the assignment routes integral flow through active
//! nodes only, balances every `(node, time)` pair, selects exactly the edges
//! that carry flow and prices them correctly.

use super::formulation::TcswModel;
use std::fmt;
use tcsw_core::{NodeKey, Time, VarId};

/// A single property an assignment fails.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditViolation<N> {
    /// Inflow plus sourceflow differs from outflow at `(node, time)`.
    FlowImbalance {
        node: N,
        time: Time,
        inflow: f64,
        sourceflow: i64,
        outflow: f64,
    },
    /// Flow on a slot whose tail or head is inactive.
    ExistenceBreach {
        from: N,
        to: N,
        departure: Time,
        arrival: Time,
        units: f64,
    },
    /// Slot flow exceeds what the aggregate edge variable allows.
    DominationBreach {
        from: N,
        to: N,
        edge_value: f64,
        slot_units: f64,
    },
    /// Edge selected although none of its slots carries flow.
    LooseDomination { from: N, to: N, edge_value: f64 },
    /// A variable with an integer domain holds a fractional value.
    Fractional { variable: String, value: f64 },
    /// Objective disagrees with the weight of the edges carrying flow.
    ObjectiveMismatch { objective: f64, selected_weight: f64 },
}

impl<N: fmt::Display> fmt::Display for AuditViolation<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditViolation::FlowImbalance {
                node,
                time,
                inflow,
                sourceflow,
                outflow,
            } => write!(
                f,
                "flow imbalance at ({}, {}): inflow {} + sourceflow {} != outflow {}",
                node, time, inflow, sourceflow, outflow
            ),
            AuditViolation::ExistenceBreach {
                from,
                to,
                departure,
                arrival,
                units,
            } => write!(
                f,
                "{} units on {} -> {} ({} to {}) touch an inactive node",
                units, from, to, departure, arrival
            ),
            AuditViolation::DominationBreach {
                from,
                to,
                edge_value,
                slot_units,
            } => write!(
                f,
                "edge {} -> {} has value {} but a slot carries {}",
                from, to, edge_value, slot_units
            ),
            AuditViolation::LooseDomination {
                from,
                to,
                edge_value,
            } => write!(
                f,
                "edge {} -> {} selected ({}) without carrying flow",
                from, to, edge_value
            ),
            AuditViolation::Fractional { variable, value } => {
                write!(f, "{} has fractional value {}", variable, value)
            }
            AuditViolation::ObjectiveMismatch {
                objective,
                selected_weight,
            } => write!(
                f,
                "objective {} differs from selected weight {}",
                objective, selected_weight
            ),
        }
    }
}

/// Check `values` (indexed by `VarId`) against `model`.
///
/// Loose domination is reported for every selected edge without flow. With
/// strictly positive weights an optimal solution never contains one; a zero
/// weight edge may legitimately be selected for free.
pub fn audit_solution<N: NodeKey>(
    model: &TcswModel<N>,
    values: &[f64],
    tolerance: f64,
) -> Vec<AuditViolation<N>> {
    let value = |var: VarId| values.get(var.value()).copied().unwrap_or(0.0);
    let scale = model.formulation().flow.scale();
    let mut violations = Vec::new();

    for (idx, def) in model.milp().variables().iter().enumerate() {
        let v = values.get(idx).copied().unwrap_or(0.0);
        if (v - v.round()).abs() > tolerance {
            violations.push(AuditViolation::Fractional {
                variable: def.name.clone(),
                value: v,
            });
        }
    }

    for slot in model.slots() {
        let units = value(slot.var);
        if units > tolerance && !(slot.tail_active && slot.head_active) {
            let edge = &model.edges()[slot.edge];
            violations.push(AuditViolation::ExistenceBreach {
                from: edge.from.clone(),
                to: edge.to.clone(),
                departure: slot.departure,
                arrival: slot.arrival,
                units,
            });
        }
    }

    let mut selected_weight = 0.0;
    for (position, edge) in model.edges().iter().enumerate() {
        let edge_value = value(edge.var);
        let peak = model
            .slots_of(position)
            .map(|slot| value(slot.var))
            .fold(0.0_f64, f64::max);

        if peak > scale * edge_value + tolerance {
            violations.push(AuditViolation::DominationBreach {
                from: edge.from.clone(),
                to: edge.to.clone(),
                edge_value,
                slot_units: peak,
            });
        }
        if edge_value > tolerance && peak <= tolerance {
            violations.push(AuditViolation::LooseDomination {
                from: edge.from.clone(),
                to: edge.to.clone(),
                edge_value,
            });
        }
        if peak > tolerance {
            selected_weight += edge.weight;
        }
    }

    let network = model.network();
    for node in model.nodes() {
        for &time in network.times() {
            let inflow: f64 = model
                .inflow_slots(node, time)
                .iter()
                .map(|slot| value(slot.var))
                .sum();
            let outflow: f64 = model
                .outflow_slots(node, time)
                .iter()
                .map(|slot| value(slot.var))
                .sum();
            let sourceflow = network.sourceflow(node, time);
            if (inflow + sourceflow as f64 - outflow).abs() > tolerance {
                violations.push(AuditViolation::FlowImbalance {
                    node: node.clone(),
                    time,
                    inflow,
                    sourceflow,
                    outflow,
                });
            }
        }
    }

    let objective = model.milp().objective().evaluate(values);
    // relative to the selected weight
    let slack = tolerance * selected_weight.abs().max(1.0);
    if (objective - selected_weight).abs() > slack {
        violations.push(AuditViolation::ObjectiveMismatch {
            objective,
            selected_weight,
        });
    }

    violations
}
