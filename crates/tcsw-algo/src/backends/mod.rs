//! MILP backends and a small registry to select one by name.

#[cfg(feature = "solver-highs")]
mod highs;
mod microlp;
mod translate;

#[cfg(feature = "solver-highs")]
pub use highs::HighsBackend;
pub use microlp::MicrolpBackend;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tcsw_core::{MilpBackend, TcswError};

/// Backends compiled into this crate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    #[default]
    Microlp,
    #[cfg(feature = "solver-highs")]
    Highs,
}

impl BackendKind {
    /// HiGHS when compiled in, since it enforces time limits; microlp otherwise.
    pub fn preferred() -> Self {
        #[cfg(feature = "solver-highs")]
        {
            BackendKind::Highs
        }
        #[cfg(not(feature = "solver-highs"))]
        {
            BackendKind::Microlp
        }
    }

    pub fn build_backend(self) -> Arc<dyn MilpBackend> {
        match self {
            BackendKind::Microlp => Arc::new(MicrolpBackend::new()),
            #[cfg(feature = "solver-highs")]
            BackendKind::Highs => Arc::new(HighsBackend::new()),
        }
    }

    pub fn available() -> &'static [&'static str] {
        AVAILABLE_BACKENDS
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Microlp => "microlp",
            #[cfg(feature = "solver-highs")]
            BackendKind::Highs => "highs",
        }
    }
}

const AVAILABLE_BACKENDS: &[&str] = &[
    "microlp",
    #[cfg(feature = "solver-highs")]
    "highs",
];

impl FromStr for BackendKind {
    type Err = TcswError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "microlp" | "default" => Ok(BackendKind::Microlp),
            "highs" => {
                #[cfg(feature = "solver-highs")]
                {
                    Ok(BackendKind::Highs)
                }
                #[cfg(not(feature = "solver-highs"))]
                {
                    Err(TcswError::Configuration(
                        "the highs backend requires the solver-highs feature".into(),
                    ))
                }
            }
            other => Err(TcswError::Configuration(format!(
                "unknown backend '{}'; supported values: {}",
                other,
                Self::available().join(", ")
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
