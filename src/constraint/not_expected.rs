//! Concrete subclass: fails the search when any visit's mean scenario
//! delay is positive (§4.3 `DelayNotExpectedConstraint`).

#[cfg(test)]
#[path = "../../tests/unit/constraint/not_expected_test.rs"]
mod not_expected_test;

use super::DelayConstraintHook;
use crate::delay_tracker::DelayTracker;
use crate::engine::{NodeIndex, RoutingEngine, Solver};
use crate::failed_index_repository::FailedIndexRepository;
use std::cell::RefCell;
use std::rc::Rc;

/// Fails the current branch whenever a visit's mean delay across scenarios
/// is positive, recording the visit (and its sibling, if any) in the
/// shared [`FailedIndexRepository`] first so the search heuristic can bias
/// future decisions away from it.
///
/// `FailedIndexRepository` is shared with the search heuristic outside
/// this core; everything here runs on the single search thread (§5), so a
/// `Rc<RefCell<_>>` is sufficient — no locking is required.
pub struct DelayNotExpectedConstraint {
    failed_index_repository: Rc<RefCell<FailedIndexRepository>>,
}

impl DelayNotExpectedConstraint {
    pub fn new(failed_index_repository: Rc<RefCell<FailedIndexRepository>>) -> Self {
        DelayNotExpectedConstraint { failed_index_repository }
    }
}

impl<E: RoutingEngine, S: Solver> DelayConstraintHook<E, S> for DelayNotExpectedConstraint {
    fn post_node_constraints(&mut self, tracker: &DelayTracker<'_, E>, solver: &S, node: NodeIndex) {
        let mean_delay = tracker.mean_delay(node);
        if mean_delay > 0 {
            let mut repository = self.failed_index_repository.borrow_mut();
            repository.emplace(node);
            let sibling = tracker.sibling(node);
            if sibling != -1 {
                repository.emplace(sibling);
            }
            drop(repository);

            tracing::debug!(node, mean_delay, "mean delay positive, failing branch");
            solver.fail();
        }
    }
}
