//! Trait surface abstracting the problem/history collaborators (§6).
//!
//! Neither problem-file parsing nor the averaging rule that produces a
//! historical duration sample belongs to this core (§1 non-goals); this
//! module only declares the shape the collaborator must expose so
//! `DurationSample::new` can consume it.

use crate::engine::{NodeIndex, Timestamp};
use std::collections::HashMap;

/// Number of carers a visit requires: exactly one or two (sibling pair).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarerCount {
    Single,
    Pair,
}

/// Static attributes of a visit node, as known to the problem collaborator.
pub trait VisitInfo {
    /// Opaque identifier of the service user being visited.
    fn service_user_id(&self) -> u64;
    /// Nominal (non-historical) planned duration, in seconds.
    fn nominal_duration(&self) -> Timestamp;
    fn carer_count(&self) -> CarerCount;
    /// Opaque identifier of the task set performed at this visit; two
    /// visits with the same task set are comparable for averaging (owned
    /// by the history collaborator, not this core).
    fn task_set_id(&self) -> u64;
}

/// `history.get_duration_sample(visit) -> mapping date -> duration`.
///
/// `dates` is the crate-wide scenario index `D`; a missing entry for a date
/// means no historical sample exists for that visit on that date.
pub trait HistoryProvider {
    /// Returns, for the visit at `node`, the duration observed on each
    /// historical date for which a sample exists. Dates absent from the
    /// returned map fall back to nominal duration at the call site.
    fn get_duration_sample(&self, node: NodeIndex) -> HashMap<usize, Timestamp>;
}
