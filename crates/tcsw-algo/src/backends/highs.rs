//! HiGHS MILP backend (`solver-highs` feature).
//!
//! Enforces the wall-clock limit from [`SolveLimits`]. A solve stopped by the
//! limit reports [`SolveStatus::TimeLimit`], carrying the incumbent when HiGHS
//! found one.

use super::translate::{
    add_rows, collect_values, constant_row_outcome, declare_variables, objective,
    resolution_outcome,
};
use good_lp::solvers::highs::highs;
use good_lp::solvers::SolutionStatus;
use good_lp::{Solution, SolverModel};
use std::time::Instant;
use tcsw_core::{MilpBackend, MilpModel, MilpOutcome, SolveLimits, SolveStatus, TcswResult};
use tracing::debug;

/// Row violation accepted when checking a time-limited incumbent.
const FEASIBILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, Default)]
pub struct HighsBackend {
    verbose: bool,
}

impl HighsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let HiGHS print its own progress log.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl MilpBackend for HighsBackend {
    fn id(&self) -> &str {
        "highs"
    }

    fn supports_time_limit(&self) -> bool {
        true
    }

    fn solve(&self, model: &MilpModel, limits: &SolveLimits) -> TcswResult<MilpOutcome> {
        let start = Instant::now();
        if let Some(outcome) = constant_row_outcome(model, start) {
            return Ok(outcome);
        }

        let (vars, handles) = declare_variables(model);
        let mut problem = vars
            .minimise(objective(model, &handles))
            .using(highs)
            .set_verbose(self.verbose);
        if let Some(limit) = limits.time_limit {
            problem = problem.set_time_limit(limit.as_secs_f64());
        }
        let problem = add_rows(problem, model, &handles);

        let solution = match problem.solve() {
            Ok(solution) => solution,
            Err(e) => return resolution_outcome(self.id(), e, start),
        };
        let values = collect_values(&solution, &handles);

        match solution.status() {
            SolutionStatus::Optimal => Ok(MilpOutcome::with_solution(
                SolveStatus::Optimal,
                model,
                values,
                start.elapsed(),
            )),
            SolutionStatus::TimeLimit => {
                // HiGHS hands back column values even without an incumbent
                let violated = model.violated_constraints(&values, FEASIBILITY_TOLERANCE);
                if violated.is_empty() {
                    Ok(MilpOutcome::with_solution(
                        SolveStatus::TimeLimit,
                        model,
                        values,
                        start.elapsed(),
                    ))
                } else {
                    debug!(
                        violated = violated.len(),
                        "time limit reached without a feasible incumbent"
                    );
                    Ok(MilpOutcome::without_solution(
                        SolveStatus::TimeLimit,
                        start.elapsed(),
                        "time limit reached before an incumbent was found",
                    ))
                }
            }
            other => Ok(MilpOutcome::without_solution(
                SolveStatus::Other,
                start.elapsed(),
                format!("highs stopped with {:?}", other),
            )),
        }
    }
}
