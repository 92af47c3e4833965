//! Constraint generator and objective builder
//!
//! One generator covers every variant. A [`Formulation`] fixes the delay
//! window (how far an arrival may lag its departure) and the flow domain
//! (binary routing or integer flow counts); everything else is shared.

use super::network::TimeExpandedNetwork;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tcsw_core::{
    ConnectivityDemand, ExistenceMap, LinearExpr, MilpModel, NodeKey, Relation, TcswError,
    TcswResult, TemporalGraph, Time, VarId, VariableKind,
};
use tracing::debug;

/// Largest number of steps an edge traversal may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayWindow {
    pub max_delay: Time,
}

/// Domain of the edge-time variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDomain {
    /// 0/1 routing of a single unit.
    Binary,
    /// Integer flow counts in `[0, n]`.
    Units(u32),
}

impl FlowDomain {
    /// Factor applied to the domination and existence right-hand sides.
    pub fn scale(&self) -> f64 {
        match self {
            FlowDomain::Binary => 1.0,
            FlowDomain::Units(n) => f64::from(*n),
        }
    }

    /// Maximum number of flow units a single edge-time slot may carry.
    pub fn capacity(&self) -> usize {
        match self {
            FlowDomain::Binary => 1,
            FlowDomain::Units(n) => *n as usize,
        }
    }

    fn variable_kind(&self) -> VariableKind {
        match self {
            FlowDomain::Binary => VariableKind::Binary,
            FlowDomain::Units(n) => VariableKind::Integer {
                lower: 0,
                upper: i64::from(*n),
            },
        }
    }
}

/// Parameters selecting a TCSW variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formulation {
    pub delay: DelayWindow,
    pub flow: FlowDomain,
}

impl Formulation {
    /// Single destination; flow either stays within a step or advances one step.
    pub fn base() -> Self {
        Self {
            delay: DelayWindow { max_delay: 1 },
            flow: FlowDomain::Binary,
        }
    }

    /// Single destination with arrivals up to `k` steps after departure.
    pub fn k_delay(k: Time) -> Self {
        Self {
            delay: DelayWindow { max_delay: k },
            flow: FlowDomain::Binary,
        }
    }

    /// `destination_count` units of flow over the base delay window.
    pub fn multi_destination(destination_count: u32) -> Self {
        Self {
            delay: DelayWindow { max_delay: 1 },
            flow: FlowDomain::Units(destination_count),
        }
    }

    pub fn with_max_delay(mut self, k: Time) -> Self {
        self.delay.max_delay = k;
        self
    }

    pub fn max_delay(&self) -> Time {
        self.delay.max_delay
    }

    fn check_demand<N: NodeKey>(&self, demand: &ConnectivityDemand<N>) -> TcswResult<()> {
        let units = demand.flow_units();
        match self.flow {
            FlowDomain::Binary if units > 1 => Err(TcswError::Configuration(format!(
                "binary flow domain cannot route {} units, use a multi-destination formulation",
                units
            ))),
            FlowDomain::Units(n) if (n as usize) < units => Err(TcswError::Configuration(format!(
                "flow domain [0, {}] is too small for {} destinations",
                n, units
            ))),
            _ => Ok(()),
        }
    }
}

impl Default for Formulation {
    fn default() -> Self {
        Self::base()
    }
}

/// Tag carried by every generated constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    Existence,
    Domination,
    FlowConservation,
}

impl ConstraintFamily {
    pub const ALL: [ConstraintFamily; 3] = [
        ConstraintFamily::Existence,
        ConstraintFamily::Domination,
        ConstraintFamily::FlowConservation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintFamily::Existence => "existence",
            ConstraintFamily::Domination => "domination",
            ConstraintFamily::FlowConservation => "flow_conservation",
        }
    }
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A graph edge and its aggregate selection variable `d[u,v]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEdge<N> {
    pub from: N,
    pub to: N,
    pub weight: f64,
    pub var: VarId,
}

/// One edge-time variable `d[u,v,t,t']` together with the activity of its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeTimeSlot {
    /// Position in [`TcswModel::edges`].
    pub edge: usize,
    pub departure: Time,
    pub arrival: Time,
    pub var: VarId,
    pub tail_active: bool,
    pub head_active: bool,
}

/// A formulated instance: the MILP plus the index needed to read it back.
#[derive(Debug, Clone)]
pub struct TcswModel<N: NodeKey> {
    milp: MilpModel,
    formulation: Formulation,
    network: TimeExpandedNetwork<N>,
    nodes: Vec<N>,
    edges: Vec<ModelEdge<N>>,
    slots: Vec<EdgeTimeSlot>,
    slot_index: HashMap<(usize, Time, Time), usize>,
    edge_index: HashMap<(N, N), usize>,
    incoming: HashMap<N, Vec<usize>>,
    outgoing: HashMap<N, Vec<usize>>,
}

impl<N: NodeKey> TcswModel<N> {
    pub fn milp(&self) -> &MilpModel {
        &self.milp
    }

    pub fn formulation(&self) -> &Formulation {
        &self.formulation
    }

    pub fn network(&self) -> &TimeExpandedNetwork<N> {
        &self.network
    }

    /// Graph nodes in insertion order.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn edges(&self) -> &[ModelEdge<N>] {
        &self.edges
    }

    pub fn slots(&self) -> &[EdgeTimeSlot] {
        &self.slots
    }

    /// Slots belonging to the edge at `edge` (a position in [`Self::edges`]).
    pub fn slots_of(&self, edge: usize) -> impl Iterator<Item = &EdgeTimeSlot> + '_ {
        self.slots.iter().filter(move |slot| slot.edge == edge)
    }

    pub fn edge_var(&self, from: &N, to: &N) -> Option<VarId> {
        self.edge_position(from, to).map(|idx| self.edges[idx].var)
    }

    /// `d[u,v,t,t']`, or `None` when the pair is outside the delay window.
    pub fn edge_time_var(&self, from: &N, to: &N, departure: Time, arrival: Time) -> Option<VarId> {
        let edge = self.edge_position(from, to)?;
        self.slot_index
            .get(&(edge, departure, arrival))
            .map(|&idx| self.slots[idx].var)
    }

    fn edge_position(&self, from: &N, to: &N) -> Option<usize> {
        self.edge_index.get(&(from.clone(), to.clone())).copied()
    }

    /// Slots whose arrival is `(node, time)`.
    pub fn inflow_slots(&self, node: &N, time: Time) -> Vec<&EdgeTimeSlot> {
        let window = self
            .network
            .departure_window(time, self.formulation.max_delay());
        self.collect_slots(self.incoming.get(node), |edge| {
            window.clone().map(move |departure| (edge, departure, time))
        })
    }

    /// Slots whose departure is `(node, time)`.
    pub fn outflow_slots(&self, node: &N, time: Time) -> Vec<&EdgeTimeSlot> {
        let window = self
            .network
            .arrival_window(time, self.formulation.max_delay());
        self.collect_slots(self.outgoing.get(node), |edge| {
            window.clone().map(move |arrival| (edge, time, arrival))
        })
    }

    fn collect_slots<'a, F, I>(&'a self, edges: Option<&Vec<usize>>, keys: F) -> Vec<&'a EdgeTimeSlot>
    where
        F: Fn(usize) -> I,
        I: Iterator<Item = (usize, Time, Time)>,
    {
        edges
            .into_iter()
            .flatten()
            .flat_map(|&edge| keys(edge))
            .filter_map(|key| self.slot_index.get(&key).map(|&idx| &self.slots[idx]))
            .collect()
    }

    /// Number of constraints registered under `family`.
    pub fn family_count(&self, family: ConstraintFamily) -> usize {
        self.milp.constraints_in(family.as_str()).count()
    }

    pub fn into_milp(self) -> MilpModel {
        self.milp
    }
}

/// Formulate a TCSW instance under `formulation`.
///
/// Every allowed `(t, t')` pair of every edge gets a variable; pairs outside
/// the delay window are never created. For each slot the generator emits
///
/// ```text
/// d[u,v,t,t'] <= n · existence[u,t]
/// d[u,v,t,t'] <= n · existence[v,t']
/// n · d[u,v] - d[u,v,t,t'] >= 0
/// ```
///
/// and for each `(v, t)` one balance equation
///
/// ```text
/// Σ d[u,v,t'',t] (t'' in [max(0,t-k), t]) + sourceflow[v,t]
///     == Σ d[v,w,t,t'] (t' in [t, min(t+k,T)])
/// ```
///
/// where `n` is 1 for binary flow. The objective minimises `Σ w(u,v) · d[u,v]`.
pub fn build_model<N: NodeKey>(
    graph: &TemporalGraph<N>,
    existence: &ExistenceMap<N>,
    demand: &ConnectivityDemand<N>,
    formulation: Formulation,
) -> TcswResult<TcswModel<N>> {
    formulation.check_demand(demand)?;
    let network = TimeExpandedNetwork::build(graph, existence, demand)?;
    let max_delay = formulation.max_delay();
    let scale = formulation.flow.scale();
    let active = |node: &N, time: Time| existence.is_active(node, time).unwrap_or(false);

    let mut model = TcswModel {
        milp: MilpModel::new("temporal_connectivity"),
        formulation,
        nodes: graph.nodes().cloned().collect(),
        edges: Vec::with_capacity(graph.edge_count()),
        slots: Vec::new(),
        slot_index: HashMap::new(),
        edge_index: HashMap::new(),
        incoming: HashMap::new(),
        outgoing: HashMap::new(),
        network,
    };

    // === Variables ===
    let time_slots = model.network.edge_time_slots(max_delay);
    for (position, (from, to, weight)) in graph.edges().enumerate() {
        for &(departure, arrival) in &time_slots {
            let var = model.milp.create_variable(
                formulation.flow.variable_kind(),
                format!("edge_time_{}_{}_{}_{}", from, to, departure, arrival),
            );
            model
                .slot_index
                .insert((position, departure, arrival), model.slots.len());
            model.slots.push(EdgeTimeSlot {
                edge: position,
                departure,
                arrival,
                var,
                tail_active: active(from, departure),
                head_active: active(to, arrival),
            });
        }
        let var = model
            .milp
            .create_variable(VariableKind::Binary, format!("edge_{}_{}", from, to));
        model.edge_index.insert((from.clone(), to.clone()), position);
        model.outgoing.entry(from.clone()).or_default().push(position);
        model.incoming.entry(to.clone()).or_default().push(position);
        model.edges.push(ModelEdge {
            from: from.clone(),
            to: to.clone(),
            weight,
            var,
        });
    }

    // === Existence and domination ===
    for slot in &model.slots {
        let edge = &model.edges[slot.edge];
        let suffix = format!(
            "{}_{}_{}_{}",
            edge.from, edge.to, slot.departure, slot.arrival
        );
        model.milp.add_linear_constraint(
            format!("existence_tail_{}", suffix),
            ConstraintFamily::Existence.as_str(),
            slot.var.into(),
            Relation::LessEq,
            LinearExpr::constant(scale * indicator(slot.tail_active)),
        );
        model.milp.add_linear_constraint(
            format!("existence_head_{}", suffix),
            ConstraintFamily::Existence.as_str(),
            slot.var.into(),
            Relation::LessEq,
            LinearExpr::constant(scale * indicator(slot.head_active)),
        );

        let mut dominated = LinearExpr::term(edge.var, scale);
        dominated.add_term(slot.var, -1.0);
        model.milp.add_linear_constraint(
            format!("domination_{}", suffix),
            ConstraintFamily::Domination.as_str(),
            dominated,
            Relation::GreaterEq,
            LinearExpr::constant(0.0),
        );
    }

    // === Flow conservation ===
    let times = model.network.times().to_vec();
    for node in &model.nodes {
        for &time in &times {
            let inflow = LinearExpr::sum(model.inflow_slots(node, time).iter().map(|s| s.var))
                .with_constant(model.network.sourceflow(node, time) as f64);
            let outflow = LinearExpr::sum(model.outflow_slots(node, time).iter().map(|s| s.var));
            model.milp.add_linear_constraint(
                format!("flow_{}_{}", node, time),
                ConstraintFamily::FlowConservation.as_str(),
                inflow,
                Relation::Equal,
                outflow,
            );
        }
    }

    // === Objective ===
    let mut objective = LinearExpr::new();
    for edge in &model.edges {
        objective.add_term(edge.var, edge.weight);
    }
    model.milp.set_objective(objective);

    debug!(
        variables = model.milp.num_variables(),
        existence = model.family_count(ConstraintFamily::Existence),
        domination = model.family_count(ConstraintFamily::Domination),
        flow_conservation = model.family_count(ConstraintFamily::FlowConservation),
        "formulated TCSW model"
    );

    Ok(model)
}

fn indicator(active: bool) -> f64 {
    if active {
        1.0
    } else {
        0.0
    }
}
