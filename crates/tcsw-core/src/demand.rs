//! Connectivity demands
//!
//! A demand asks for one unit of flow from `source` (at time 0) to every
//! destination (at the final time). Single-destination formulations use a
//! demand with exactly one destination.

use crate::NodeKey;
use serde::{Deserialize, Serialize};

/// Source and destination(s) of a TCSW instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityDemand<N> {
    pub source: N,
    pub destinations: Vec<N>,
}

impl<N: NodeKey> ConnectivityDemand<N> {
    /// Demand for the single-destination and k-delay variants.
    pub fn single(source: N, destination: N) -> Self {
        Self {
            source,
            destinations: vec![destination],
        }
    }

    /// Demand for the multi-destination variant.
    pub fn multi(source: N, destinations: impl IntoIterator<Item = N>) -> Self {
        Self {
            source,
            destinations: destinations.into_iter().collect(),
        }
    }

    /// Units of flow injected at the source.
    pub fn flow_units(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_multi_destination(&self) -> bool {
        self.destinations.len() > 1
    }

    /// The destination of a single-destination demand.
    pub fn destination(&self) -> Option<&N> {
        match self.destinations.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}
