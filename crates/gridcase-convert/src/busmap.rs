//! Dense 1-based bus numbering for the output tables.
//!
//! Downstream table formats key buses by integer; source identifiers are
//! sparse strings. `BusIndex` is built once from the retained island and
//! then passed by shared reference to every builder; nothing mutates it
//! after construction.

use std::collections::HashMap;

/// Bidirectional map between retained bus identifiers and dense integer
/// ids `1..=N`, in the order the identifiers were supplied.
#[derive(Debug, Clone, Default)]
pub struct BusIndex {
    forward: HashMap<String, u32>,
    reverse: Vec<String>,
}

impl BusIndex {
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let reverse: Vec<String> = ids.into_iter().collect();
        let forward = reverse
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), (i + 1) as u32))
            .collect();
        Self { forward, reverse }
    }

    /// Dense id for a bus identifier, `None` for buses outside the island.
    pub fn id(&self, name: &str) -> Option<u32> {
        self.forward.get(name).copied()
    }

    /// Original identifier for a dense id.
    pub fn name(&self, id: u32) -> Option<&str> {
        if id == 0 {
            return None;
        }
        self.reverse.get((id - 1) as usize).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.forward.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// Iterate `(dense id, identifier)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.reverse
            .iter()
            .enumerate()
            .map(|(i, name)| ((i + 1) as u32, name.as_str()))
    }
}
