//! Concrete subclass: computes an "essential riskiness" scalar per visit
//! and raises a shared objective variable (§4.4 `DelayRiskinessConstraint`).

#[cfg(test)]
#[path = "../../tests/unit/constraint/riskiness_test.rs"]
mod riskiness_test;

use super::DelayConstraintHook;
use crate::delay_tracker::DelayTracker;
use crate::engine::{IntVarHandle, NodeIndex, RoutingEngine, Solver, Timestamp};

/// Raises a shared, monotone lower-bound CP variable so that
/// `riskiness_index >= essential_riskiness(n)` for every visit on every
/// completed path. Never fails the branch, so unlike
/// `DelayNotExpectedConstraint` it has no use for a
/// [`crate::failed_index_repository::FailedIndexRepository`] (the
/// original header declares one but its constructor never wires it up;
/// see DESIGN.md).
pub struct DelayRiskinessConstraint<'a, IV: IntVarHandle> {
    riskiness_index: &'a IV,
}

impl<'a, IV: IntVarHandle> DelayRiskinessConstraint<'a, IV> {
    pub fn new(riskiness_index: &'a IV) -> Self {
        DelayRiskinessConstraint { riskiness_index }
    }
}

impl<'a, E, S> DelayConstraintHook<E, S> for DelayRiskinessConstraint<'a, S::IntVar>
where
    E: RoutingEngine,
    S: Solver,
{
    fn post_node_constraints(&mut self, tracker: &DelayTracker<'_, E>, solver: &S, node: NodeIndex) {
        let essential = essential_riskiness(tracker.delay(node), self.riskiness_index.min());
        if essential > self.riskiness_index.min() {
            solver.post_greater_or_equal(self.riskiness_index, essential);
        }
    }
}

/// Implements the five-step algorithm of §4.4 over the positive subset of
/// a visit's sorted delay row.
///
/// Step 1 (largest delay `<= 0`) and step 3 (every scenario delayed) each
/// return directly; the unreachable `return kint64max` lines the original
/// carries after those returns (Open Question 1) are not transcribed.
pub(crate) fn essential_riskiness(delays: &[Timestamp], riskiness_min: Timestamp) -> Timestamp {
    debug_assert!(!delays.is_empty(), "a visit's delay row must cover at least one scenario");

    let mut sorted: Vec<Timestamp> = delays.to_vec();
    sorted.sort_unstable();
    let largest = *sorted.last().unwrap();
    if largest <= 0 {
        return 0;
    }

    let mut positive: Vec<Timestamp> = sorted.iter().copied().filter(|&d| d > 0).collect();
    positive.sort_unstable();
    let total: Timestamp = positive.iter().sum();

    if positive.len() == sorted.len() {
        // every scenario is delayed: no non-positive scenario exists to absorb slack.
        return total;
    }

    let num_positive = positive.len() as i64;
    if num_positive * riskiness_min >= total {
        return riskiness_min;
    }

    let mut budget: Timestamp = 0;
    let mut k = positive.len() - 1;
    while k > 0 && budget + (k as i64 + 1) * positive[k] + total > 0 {
        budget += positive[k];
        k -= 1;
    }

    let balance = budget + (k as i64 + 1) * positive[k] + total;
    if balance < 0 {
        ceil_div(total + budget, k as i64 + 1)
    } else if balance > 0 {
        balance
    } else {
        positive[k]
    }
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder != 0 && (remainder > 0) == (denominator > 0) {
        quotient + 1
    } else {
        quotient
    }
}
