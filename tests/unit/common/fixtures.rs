//! Shared test doubles for the `RoutingEngine`/`Solver`/`HistoryProvider`
//! traits, built fresh per test the way the wider codebase's
//! `helpers::models::{problem,solution}` builders are.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use vrp_delay_core::engine::{BoolVarHandle, BreakIntervalHandle, IntVarHandle, NodeIndex, RoutingEngine, Solver, Timestamp, VehicleIndex};
use vrp_delay_core::history::HistoryProvider;

#[derive(Debug, Clone, Copy)]
pub struct FakeIntVar {
    pub min: Timestamp,
    pub max: Timestamp,
}

impl IntVarHandle for FakeIntVar {
    fn min(&self) -> Timestamp {
        self.min
    }
    fn max(&self) -> Timestamp {
        self.max
    }
    fn value(&self) -> Timestamp {
        self.min
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FakeBoolVar {
    pub min: i64,
    pub max: i64,
}

impl BoolVarHandle for FakeBoolVar {
    fn min(&self) -> i64 {
        self.min
    }
    fn max(&self) -> i64 {
        self.max
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FakeBreak {
    pub start_min: Timestamp,
    pub start_max: Timestamp,
    pub duration_min: Timestamp,
}

impl BreakIntervalHandle for FakeBreak {
    fn start_min(&self) -> Timestamp {
        self.start_min
    }
    fn start_max(&self) -> Timestamp {
        self.start_max
    }
    fn duration_min(&self) -> Timestamp {
        self.duration_min
    }
}

/// A hand-wired routing model: explicit starts/ends, a `next` chain, arc
/// costs, cumulative-variable bounds and per-vehicle break lists.
#[derive(Default)]
pub struct FakeEngine {
    pub node_count: usize,
    pub starts: Vec<NodeIndex>,
    pub ends: Vec<NodeIndex>,
    pub next: HashMap<NodeIndex, NodeIndex>,
    pub cumul: HashMap<NodeIndex, (Timestamp, Timestamp)>,
    pub arc_costs: HashMap<(NodeIndex, NodeIndex), Timestamp>,
    pub breaks: HashMap<VehicleIndex, Vec<FakeBreak>>,
}

impl RoutingEngine for FakeEngine {
    type IntVar = FakeIntVar;
    type Break = FakeBreak;

    fn vehicle_count(&self) -> usize {
        self.starts.len()
    }

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn start(&self, vehicle: VehicleIndex) -> NodeIndex {
        self.starts[vehicle as usize]
    }

    fn end(&self, vehicle: VehicleIndex) -> NodeIndex {
        self.ends[vehicle as usize]
    }

    fn is_end(&self, node: NodeIndex) -> bool {
        self.ends.contains(&node)
    }

    fn next_value(&self, node: NodeIndex) -> NodeIndex {
        *self.next.get(&node).unwrap_or(&node)
    }

    fn arc_cost(&self, from: NodeIndex, to: NodeIndex, _vehicle: VehicleIndex) -> Timestamp {
        *self.arc_costs.get(&(from, to)).unwrap_or(&0)
    }

    fn cumul_var(&self, node: NodeIndex) -> FakeIntVar {
        let (min, max) = self.cumul.get(&node).copied().unwrap_or((0, 0));
        FakeIntVar { min, max }
    }

    fn break_intervals(&self, vehicle: VehicleIndex) -> Vec<FakeBreak> {
        self.breaks.get(&vehicle).cloned().unwrap_or_default()
    }
}

/// A `Solver` double that records whether `fail` was called and lets tests
/// read back posted lower bounds via a shared cell.
#[derive(Default)]
pub struct FakeSolver {
    failed: Cell<bool>,
    pub posted_lower_bounds: RefCell<Vec<i64>>,
}

impl FakeSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failed(&self) -> bool {
        self.failed.get()
    }
}

impl Solver for FakeSolver {
    type BoolVar = FakeBoolVar;
    type IntVar = FakeIntVar;

    fn make_bool_var(&self) -> FakeBoolVar {
        FakeBoolVar { min: 0, max: 1 }
    }

    fn make_path_connected(&self, _nexts: &[NodeIndex], _starts: &[NodeIndex], _ends: &[NodeIndex]) -> FakeBoolVar {
        FakeBoolVar { min: 1, max: 1 }
    }

    fn make_sum_equals(&self, vars: &[FakeBoolVar], target: i64) -> FakeBoolVar {
        let bound = vars.iter().all(|v| v.is_bound() && v.min == 1) && vars.len() as i64 == target;
        FakeBoolVar { min: bound as i64, max: 1 }
    }

    fn post_greater_or_equal(&self, _var: &FakeIntVar, value: i64) {
        self.posted_lower_bounds.borrow_mut().push(value);
    }

    fn fail(&self) {
        self.failed.set(true);
    }

    fn is_failed(&self) -> bool {
        self.failed.get()
    }
}

#[derive(Default)]
pub struct FakeHistory {
    pub samples: HashMap<NodeIndex, HashMap<usize, Timestamp>>,
}

impl HistoryProvider for FakeHistory {
    fn get_duration_sample(&self, node: NodeIndex) -> HashMap<usize, Timestamp> {
        self.samples.get(&node).cloned().unwrap_or_default()
    }
}
