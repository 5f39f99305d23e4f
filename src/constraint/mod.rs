//! CP-engine constraint lifecycle shared by both concrete delay
//! constraints: path-completion watchers, dispatch to per-path or
//! all-paths propagation, and the per-visit hook (§4.2 `DelayConstraint`).

pub mod not_expected;
pub mod riskiness;

use crate::delay_tracker::DelayTracker;
use crate::duration_sample::DurationSample;
use crate::engine::{BoolVarHandle, NodeIndex, RoutingEngine, Solver, VehicleIndex};
use std::sync::Arc;
use tracing::instrument;

/// The capability the base constraint dispatches to once per visit on a
/// completed path. The base/subclass relationship from the source is
/// modelled as this single small trait rather than open inheritance, per
/// the design note on dispatch over `PostNodeConstraints`.
pub trait DelayConstraintHook<E: RoutingEngine, S: Solver> {
    fn post_node_constraints(&mut self, tracker: &DelayTracker<'_, E>, solver: &S, node: NodeIndex);
}

/// State machine: `Unposted -> Posted -> (Propagating)* -> Terminal (fail |
/// fixpoint)`. Owns the path-completion watchers and the tracker; dispatches
/// per-visit decisions to a `DelayConstraintHook`.
pub struct DelayConstraint<'a, E: RoutingEngine, S: Solver, H: DelayConstraintHook<E, S>> {
    engine: &'a E,
    solver: &'a S,
    tracker: DelayTracker<'a, E>,
    completed_paths: Vec<S::BoolVar>,
    all_paths_completed: Option<S::BoolVar>,
    hook: H,
}

impl<'a, E: RoutingEngine, S: Solver, H: DelayConstraintHook<E, S>> DelayConstraint<'a, E, S, H> {
    pub fn new(engine: &'a E, solver: &'a S, duration_sample: Arc<DurationSample>, hook: H) -> Self {
        DelayConstraint {
            engine,
            solver,
            tracker: DelayTracker::new(engine, duration_sample),
            completed_paths: Vec::new(),
            all_paths_completed: None,
            hook,
        }
    }

    /// `Post`: registers one path-completion bool var per vehicle and the
    /// aggregate `all_paths_completed` var.
    pub fn post(&mut self) {
        let vehicle_count = self.engine.vehicle_count() as VehicleIndex;
        self.completed_paths = (0..vehicle_count)
            .map(|vehicle| {
                let start = self.engine.start(vehicle);
                let end = self.engine.end(vehicle);
                let nexts: Vec<NodeIndex> = (0..self.engine.node_count() as NodeIndex).collect();
                self.solver.make_path_connected(&nexts, &[start], &[end])
            })
            .collect();
        self.all_paths_completed = Some(self.solver.make_sum_equals(&self.completed_paths, self.completed_paths.len() as i64));
    }

    /// `InitialPropagate`: if any vehicle is incomplete, propagate every
    /// completed vehicle individually; otherwise propagate all paths.
    pub fn initial_propagate(&mut self) {
        let all_complete = self.completed_paths.iter().all(|v| v.is_bound() && v.min() != 0);
        if !all_complete {
            for vehicle in 0..self.engine.vehicle_count() as VehicleIndex {
                if self.completed_paths[vehicle as usize].max() != 0 {
                    self.propagate_path(vehicle);
                }
            }
        } else {
            self.propagate_all_paths();
        }
    }

    /// `PropagatePath(v)`: precondition `completed_paths[v].Max != 0`.
    #[instrument(level = "debug", skip(self))]
    pub fn propagate_path(&mut self, vehicle: VehicleIndex) {
        if self.completed_paths[vehicle as usize].max() == 0 {
            return;
        }
        self.tracker.update_path(vehicle);
        self.tracker.propagate_path(vehicle);
        self.tracker.compute_path_delay(vehicle);
        self.post_path_constraints(vehicle);
    }

    /// `PropagateAllPaths`: precondition `all_paths_completed.Min != 0`.
    #[instrument(level = "debug", skip(self))]
    pub fn propagate_all_paths(&mut self) {
        let completed = self.all_paths_completed.as_ref().expect("post must run before propagate_all_paths");
        if completed.min() == 0 {
            return;
        }

        self.tracker.update_all_paths();
        for vehicle in 0..self.engine.vehicle_count() as VehicleIndex {
            self.tracker.compute_path_delay(vehicle);
            self.post_path_constraints(vehicle);
            if self.solver.is_failed() {
                return;
            }
        }
    }

    fn post_path_constraints(&mut self, vehicle: VehicleIndex) {
        for node in self.tracker.visit_nodes(vehicle) {
            self.hook.post_node_constraints(&self.tracker, self.solver, node);
            if self.solver.is_failed() {
                return;
            }
        }
    }

    pub fn tracker(&self) -> &DelayTracker<'a, E> {
        &self.tracker
    }

    pub fn completed_paths(&self) -> &[S::BoolVar] {
        &self.completed_paths
    }

    pub fn all_paths_completed(&self) -> Option<&S::BoolVar> {
        self.all_paths_completed.as_ref()
    }
}
