//! Node activity windows
//!
//! An [`ExistenceMap`] records whether each node may carry flow at each
//! discrete time. The set of times is not declared separately: it is the set
//! of time coordinates present in the keys.

use crate::{NodeKey, Time};
use std::collections::{BTreeSet, HashMap};

/// Mapping `(node, time) -> active`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistenceMap<N: NodeKey> {
    flags: HashMap<(N, Time), bool>,
}

impl<N: NodeKey> Default for ExistenceMap<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeKey> ExistenceMap<N> {
    pub fn new() -> Self {
        Self {
            flags: HashMap::new(),
        }
    }

    /// Every node active at every time in `0..time_count`.
    pub fn always_active(nodes: impl IntoIterator<Item = N>, time_count: Time) -> Self {
        Self::from_fn(nodes, time_count, |_, _| true)
    }

    /// Build a full map over `nodes x 0..time_count` from a predicate.
    pub fn from_fn<F>(nodes: impl IntoIterator<Item = N>, time_count: Time, mut active: F) -> Self
    where
        F: FnMut(&N, Time) -> bool,
    {
        let mut map = Self::new();
        for node in nodes {
            for time in 0..time_count {
                let flag = active(&node, time);
                map.set(node.clone(), time, flag);
            }
        }
        map
    }

    /// Set (or overwrite) the flag for `(node, time)`.
    pub fn set(&mut self, node: N, time: Time, active: bool) {
        self.flags.insert((node, time), active);
    }

    /// `None` when the pair has no entry at all, which callers must treat as
    /// malformed input rather than "inactive".
    pub fn is_active(&self, node: &N, time: Time) -> Option<bool> {
        self.flags.get(&(node.clone(), time)).copied()
    }

    /// 0/1 view of a flag, for constraint right-hand sides.
    pub fn indicator(&self, node: &N, time: Time) -> Option<f64> {
        self.is_active(node, time)
            .map(|active| if active { 1.0 } else { 0.0 })
    }

    /// Sorted distinct time coordinates present in the map.
    pub fn times(&self) -> Vec<Time> {
        self.flags
            .keys()
            .map(|(_, time)| *time)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Largest time coordinate, `None` for an empty map.
    pub fn horizon(&self) -> Option<Time> {
        self.flags.keys().map(|(_, time)| *time).max()
    }

    /// Nodes active at `time`, sorted.
    pub fn active_at(&self, time: Time) -> Vec<N> {
        let mut nodes: Vec<N> = self
            .flags
            .iter()
            .filter(|((_, t), active)| *t == time && **active)
            .map(|((node, _), _)| node.clone())
            .collect();
        nodes.sort();
        nodes
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&N, Time, bool)> + '_ {
        self.flags
            .iter()
            .map(|((node, time), active)| (node, *time, *active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_are_sorted_and_distinct() {
        let mut map = ExistenceMap::new();
        map.set(1, 2, true);
        map.set(2, 0, false);
        map.set(1, 0, true);
        map.set(2, 1, true);

        assert_eq!(map.times(), vec![0, 1, 2]);
        assert_eq!(map.horizon(), Some(2));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_missing_entry_is_distinct_from_inactive() {
        let mut map = ExistenceMap::new();
        map.set("a", 0, false);

        assert_eq!(map.is_active(&"a", 0), Some(false));
        assert_eq!(map.is_active(&"a", 1), None);
        assert_eq!(map.indicator(&"a", 0), Some(0.0));
    }

    #[test]
    fn test_from_fn_covers_full_grid() {
        let map = ExistenceMap::from_fn(vec![1, 2, 3], 3, |node, time| (*node + time) % 2 == 0);

        assert_eq!(map.len(), 9);
        assert_eq!(map.is_active(&2, 0), Some(true));
        assert_eq!(map.is_active(&2, 1), Some(false));
        assert_eq!(map.active_at(1), vec![1, 3]);
    }

    #[test]
    fn test_empty_map_has_no_horizon() {
        let map: ExistenceMap<u32> = ExistenceMap::new();
        assert!(map.is_empty());
        assert_eq!(map.horizon(), None);
        assert!(map.times().is_empty());
    }
}
