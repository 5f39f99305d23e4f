#[path = "../common/fixtures.rs"]
mod fixtures;

use fixtures::{FakeEngine, FakeHistory, FakeIntVar, FakeSolver};
use vrp_delay_core::constraint::DelayConstraintHook;
use vrp_delay_core::delay_tracker::DelayTracker;
use vrp_delay_core::duration_sample::{DurationSample, VisitDescriptor};
use vrp_delay_core::DelayRiskinessConstraint;

mod essential_riskiness {
    use super::*;
    use vrp_delay_core::constraint::riskiness::essential_riskiness;

    #[test]
    fn a_non_positive_worst_case_carries_no_risk() {
        assert_eq!(essential_riskiness(&[-120, -60, -10], 0), 0);
    }

    #[test]
    fn mixed_signs_yield_the_documented_worked_example() {
        assert_eq!(essential_riskiness(&[-120, -60, 2520], 0), 5040);
    }

    #[test]
    fn every_scenario_delayed_sums_all_of_them() {
        assert_eq!(essential_riskiness(&[100, 200, 300], 0), 600);
    }

    #[test]
    fn an_already_satisfied_lower_bound_is_left_untouched() {
        // one non-positive scenario keeps this out of the every-scenario-delayed
        // branch, and the existing bound already covers the positive total.
        assert_eq!(essential_riskiness(&[-100, 10, 20], 15), 15);
    }
}

#[test]
fn posts_a_higher_lower_bound_when_essential_riskiness_exceeds_it() {
    let mut engine = FakeEngine { node_count: 3, starts: vec![0], ends: vec![2], ..Default::default() };
    engine.next.insert(0, 1);
    engine.next.insert(1, 2);
    engine.cumul.insert(0, (0, 0));
    engine.cumul.insert(1, (0, 0));
    engine.cumul.insert(2, (0, 0));
    engine.arc_costs.insert((0, 1), 500);
    engine.arc_costs.insert((1, 2), 0);

    let history = FakeHistory::default();
    let visits = vec![VisitDescriptor { node: 1, sibling: None, nominal_duration: 0 }];
    let sample = std::sync::Arc::new(DurationSample::new(&engine, &visits, &history, 1).unwrap());
    let mut tracker = DelayTracker::new(&engine, sample);
    tracker.update_all_paths();
    tracker.compute_path_delay(0);
    assert_eq!(tracker.delay(1), &[500]);

    let solver = FakeSolver::new();
    let riskiness_index = FakeIntVar { min: 0, max: 1_000_000 };
    let mut constraint = DelayRiskinessConstraint::new(&riskiness_index);

    constraint.post_node_constraints(&tracker, &solver, 1);

    assert_eq!(solver.posted_lower_bounds.borrow().as_slice(), &[500]);
}

#[test]
fn never_fails_the_branch_even_when_every_scenario_is_late() {
    let mut engine = FakeEngine { node_count: 3, starts: vec![0], ends: vec![2], ..Default::default() };
    engine.next.insert(0, 1);
    engine.next.insert(1, 2);
    engine.cumul.insert(0, (0, 0));
    engine.cumul.insert(1, (0, 0));
    engine.cumul.insert(2, (0, 0));
    engine.arc_costs.insert((0, 1), 500);
    engine.arc_costs.insert((1, 2), 0);

    let history = FakeHistory::default();
    let visits = vec![VisitDescriptor { node: 1, sibling: None, nominal_duration: 0 }];
    let sample = std::sync::Arc::new(DurationSample::new(&engine, &visits, &history, 1).unwrap());
    let mut tracker = DelayTracker::new(&engine, sample);
    tracker.update_all_paths();
    tracker.compute_path_delay(0);

    let solver = FakeSolver::new();
    let riskiness_index = FakeIntVar { min: 0, max: 1_000_000 };
    let mut constraint = DelayRiskinessConstraint::new(&riskiness_index);

    constraint.post_node_constraints(&tracker, &solver, 1);

    assert!(!solver.failed());
}
