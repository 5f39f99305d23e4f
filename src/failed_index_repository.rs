//! Unordered set of visit indices blamed for the most recent failure
//! (§4.5 `FailedIndexRepository`).

use crate::engine::NodeIndex;
use std::collections::HashSet;

/// Communicates "visits that caused the latest fail" to heuristic search
/// code outside this core. No ordering, no duplicates. Cleared by external
/// policy between search restarts (§3 Lifecycle), never by this crate.
#[derive(Debug, Default)]
pub struct FailedIndexRepository {
    indices: HashSet<NodeIndex>,
}

impl FailedIndexRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emplace(&mut self, index: NodeIndex) {
        self.indices.insert(index);
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn indices(&self) -> &HashSet<NodeIndex> {
        &self.indices
    }
}
