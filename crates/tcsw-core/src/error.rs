//! Unified error type for TCSW operations
//!
//! Infeasible instances and time-limited solves are *outcomes*, reported
//! through [`crate::SolveStatus`]. Only malformed inputs and solver-side
//! failures surface as [`TcswError`].
//!
//! # Example
//!
//! ```ignore
//! use tcsw_core::{TcswError, TcswResult};
//!
//! fn check_horizon(times: &[u32]) -> TcswResult<u32> {
//!     times
//!         .last()
//!         .copied()
//!         .ok_or_else(|| TcswError::Configuration("empty time set".into()))
//! }
//! ```

use thiserror::Error;

/// Error type for model construction, instance generation and solving.
#[derive(Error, Debug)]
pub enum TcswError {
    /// Malformed input: missing existence entries, inactive demand nodes,
    /// empty or non-contiguous time set, mismatched flow domain.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Graph construction errors (invalid weights, unknown nodes)
    #[error("Graph error: {0}")]
    Graph(String),

    /// Unexpected failure inside the MILP backend
    #[error("Solver error: {0}")]
    SolverFault(String),
}

/// Convenience type alias for Results using TcswError.
pub type TcswResult<T> = Result<T, TcswError>;

impl TcswError {
    /// Whether this error stems from caller input rather than the solver.
    pub fn is_configuration(&self) -> bool {
        matches!(self, TcswError::Configuration(_) | TcswError::Graph(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TcswError::SolverFault("numerical trouble".into());
        assert!(err.to_string().contains("Solver error"));
        assert!(err.to_string().contains("numerical trouble"));
    }

    #[test]
    fn test_configuration_classification() {
        assert!(TcswError::Configuration("x".into()).is_configuration());
        assert!(TcswError::Graph("x".into()).is_configuration());
        assert!(!TcswError::SolverFault("x".into()).is_configuration());
    }

    #[test]
    fn test_every_variant_is_classified() {
        let errors = [
            TcswError::Configuration("missing entry".into()),
            TcswError::Graph("negative weight".into()),
            TcswError::SolverFault("crashed".into()),
        ];
        for err in &errors {
            let expected = match err {
                TcswError::Configuration(_) | TcswError::Graph(_) => true,
                TcswError::SolverFault(_) => false,
            };
            assert_eq!(err.is_configuration(), expected);
        }
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> TcswResult<()> {
            Err(TcswError::Configuration("test".into()))
        }

        fn outer() -> TcswResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
