//! Immutable per-scenario duration matrix, sibling index and per-node
//! time-window bounds (§3 `DurationSample`).

#[cfg(test)]
#[path = "../tests/unit/duration_sample_test.rs"]
mod duration_sample_test;

use crate::engine::{IntVarHandle, NodeIndex, RoutingEngine, Timestamp};
use crate::error::{DurationSampleError, GenericResult};
use crate::history::HistoryProvider;
use std::collections::{HashMap, HashSet};

/// One visit node as known to the problem collaborator, prior to
/// historical-duration averaging. The averaging itself (restricting past
/// visits to a ±2h start-of-day window with a matching task set) is
/// performed upstream by the history collaborator; this core only
/// validates and stores the result.
pub struct VisitDescriptor {
    pub node: NodeIndex,
    pub sibling: Option<NodeIndex>,
    pub nominal_duration: Timestamp,
}

/// Immutable per-scenario duration matrix plus sibling index and
/// per-node time-window bounds. Never mutated after construction
/// (Invariant 5); safe to share across constraint instances.
pub struct DurationSample {
    num_indices: usize,
    num_scenarios: usize,
    start_min: Vec<Timestamp>,
    start_max: Vec<Timestamp>,
    duration: Vec<Vec<Timestamp>>,
    nominal_duration: Vec<Timestamp>,
    sibling: HashMap<NodeIndex, NodeIndex>,
    visit_indices: HashSet<NodeIndex>,
}

impl DurationSample {
    /// Builds the sample from the routing engine's current cumulative-time
    /// bounds, the set of visit descriptors and sibling links, and the
    /// history collaborator's per-date durations.
    ///
    /// `num_scenarios` is `S = |D|`, the size of the historical date index.
    pub fn new<E: RoutingEngine>(
        engine: &E,
        visits: &[VisitDescriptor],
        history: &dyn HistoryProvider,
        num_scenarios: usize,
    ) -> GenericResult<Self> {
        let num_indices = engine.node_count();

        let mut sibling = HashMap::new();
        let mut visit_indices = HashSet::new();
        for visit in visits {
            visit_indices.insert(visit.node);
            if let Some(partner) = visit.sibling {
                sibling.insert(visit.node, partner);
            }
        }
        for visit in visits {
            if let Some(partner) = visit.sibling {
                if partner == visit.node {
                    // a visit claiming itself as its own pair is a sibling group of
                    // size 1 masquerading as 2, the CHECK_GE/CHECK_LE the original
                    // performs on visit_indices.size() at construction.
                    return Err(Box::new(DurationSampleError::InvalidSiblingGroupSize {
                        node: visit.node,
                        size: 1,
                    }));
                }
                let back = sibling.get(&partner).copied();
                if back != Some(visit.node) {
                    return Err(Box::new(DurationSampleError::AsymmetricSibling {
                        a: visit.node,
                        b: partner,
                    }));
                }
            }
        }

        let mut start_min = vec![0; num_indices];
        let mut start_max = vec![0; num_indices];
        for index in 0..num_indices {
            let cumul = engine.cumul_var(index as NodeIndex);
            start_min[index] = cumul.min();
            start_max[index] = cumul.max();
        }

        let mut duration = vec![vec![0; num_scenarios]; num_indices];
        let mut nominal_duration = vec![0; num_indices];
        let mut rows_filled: HashSet<NodeIndex> = HashSet::new();
        for visit in visits {
            nominal_duration[visit.node as usize] = visit.nominal_duration;
            if let Some(partner) = visit.sibling {
                nominal_duration[partner as usize] = visit.nominal_duration;
            }
            if rows_filled.contains(&visit.node) {
                continue;
            }
            let row = build_duration_row(history, visit.node, visit.nominal_duration, num_scenarios);
            duration[visit.node as usize] = row.clone();
            rows_filled.insert(visit.node);
            if let Some(partner) = visit.sibling {
                duration[partner as usize] = row;
                rows_filled.insert(partner);
            }
        }

        Ok(DurationSample {
            num_indices,
            num_scenarios,
            start_min,
            start_max,
            duration,
            nominal_duration,
            sibling,
            visit_indices,
        })
    }

    /// `S`, the number of historical scenarios.
    pub fn size(&self) -> usize {
        self.num_scenarios
    }

    /// `N`, the number of nodes (`0..N`).
    pub fn num_indices(&self) -> usize {
        self.num_indices
    }

    pub fn start_min(&self, node: NodeIndex) -> Timestamp {
        self.start_min[node as usize]
    }

    pub fn start_max(&self, node: NodeIndex) -> Timestamp {
        self.start_max[node as usize]
    }

    pub fn duration(&self, node: NodeIndex, scenario: usize) -> Timestamp {
        self.duration[node as usize][scenario]
    }

    /// The nominal (non-scenario) planned duration, `0` for non-visit nodes.
    pub fn nominal_duration(&self, node: NodeIndex) -> Timestamp {
        self.nominal_duration[node as usize]
    }

    pub fn is_visit(&self, node: NodeIndex) -> bool {
        self.visit_indices.contains(&node)
    }

    pub fn has_sibling(&self, node: NodeIndex) -> bool {
        self.sibling.contains_key(&node)
    }

    /// The paired node of a two-carer visit, or `-1` if `node` has none.
    pub fn sibling(&self, node: NodeIndex) -> NodeIndex {
        self.sibling.get(&node).copied().unwrap_or(-1)
    }
}

/// Builds one node's duration row: per-date history sample where one
/// exists, nominal duration for dates with no matching sample, or an
/// all-zero row if the visit has no historical data whatsoever.
fn build_duration_row(
    history: &dyn HistoryProvider,
    node: NodeIndex,
    nominal_duration: Timestamp,
    num_scenarios: usize,
) -> Vec<Timestamp> {
    let sample = history.get_duration_sample(node);
    if sample.is_empty() {
        return vec![0; num_scenarios];
    }
    (0..num_scenarios).map(|s| sample.get(&s).copied().unwrap_or(nominal_duration)).collect()
}
