//! Per-vehicle path reconstruction, forward propagation of arrival times
//! across scenarios, sibling synchronisation and delay computation
//! (§4.1 `DelayTracker`).

#[cfg(test)]
#[path = "../tests/unit/delay_tracker_test.rs"]
mod delay_tracker_test;

use crate::duration_sample::DurationSample;
use crate::engine::{BreakIntervalHandle, IntVarHandle, NodeIndex, RoutingEngine, Timestamp, VehicleIndex};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::instrument;

/// Per-node bookkeeping rebuilt by `update_path`: the successor under the
/// current assignment, the arc cost to it, and the effective break
/// straddled between this node and its successor.
#[derive(Debug, Clone, Copy)]
pub struct TrackRecord {
    pub index: NodeIndex,
    pub next: NodeIndex,
    /// Nominal (non-scenario) visit duration; used only for service-time
    /// tie-breaks, never in the propagation arithmetic itself.
    pub duration: Timestamp,
    pub travel_time: Timestamp,
    pub break_min: Timestamp,
    pub break_duration: Timestamp,
}

impl TrackRecord {
    fn reset(index: NodeIndex, duration: Timestamp) -> Self {
        TrackRecord { index, next: -1, duration, travel_time: 0, break_min: 0, break_duration: 0 }
    }
}

/// Reconstructs vehicle paths and propagates scenario-specific arrival
/// times across them. Holds a borrowed view of the routing engine with the
/// same lifetime as the enclosing model; never owns engine state.
pub struct DelayTracker<'a, E: RoutingEngine> {
    engine: &'a E,
    duration_sample: Arc<DurationSample>,
    records: Vec<TrackRecord>,
    start: Vec<Vec<Timestamp>>,
    delay: Vec<Vec<Timestamp>>,
}

impl<'a, E: RoutingEngine> DelayTracker<'a, E> {
    pub fn new(engine: &'a E, duration_sample: Arc<DurationSample>) -> Self {
        let num_indices = duration_sample.num_indices();
        let num_scenarios = duration_sample.size();

        let records = (0..num_indices)
            .map(|index| {
                let index = index as NodeIndex;
                let duration = duration_sample.nominal_duration(index);
                TrackRecord::reset(index, duration)
            })
            .collect::<Vec<_>>();

        let start = (0..num_indices).map(|index| vec![duration_sample.start_min(index as NodeIndex); num_scenarios]).collect();
        let delay = vec![vec![0; num_scenarios]; num_indices];

        DelayTracker { engine, duration_sample, records, start, delay }
    }

    /// The shared, read-only duration sample this tracker propagates over.
    pub fn duration_sample(&self) -> &DurationSample {
        &self.duration_sample
    }

    /// `Delay(node)`: the per-scenario delay row, `start[n][s] - start_max[n]`.
    pub fn delay(&self, node: NodeIndex) -> &[Timestamp] {
        &self.delay[node as usize]
    }

    /// `start[node][scenario]`, exposed for tests and for the riskiness hook.
    pub fn start_at(&self, node: NodeIndex, scenario: usize) -> Timestamp {
        self.start[node as usize][scenario]
    }

    pub fn sibling(&self, node: NodeIndex) -> NodeIndex {
        self.duration_sample.sibling(node)
    }

    /// `Σ_s delay[n][s] / S`, truncated toward zero (signed integer
    /// division; no floating point is involved anywhere in this crate).
    pub fn mean_delay(&self, node: NodeIndex) -> Timestamp {
        let row = self.delay(node);
        let total: Timestamp = row.iter().sum();
        total / row.len() as Timestamp
    }

    /// `⌈100 · |{s: delay[n][s] > 0}| / S⌉`, a value in `[0, 100]`.
    pub fn delay_probability(&self, node: NodeIndex) -> i64 {
        let row = self.delay(node);
        let delayed = row.iter().filter(|&&d| d > 0).count() as i64;
        if delayed == 0 {
            return 0;
        }
        ceil_div(100 * delayed, row.len() as i64)
    }

    /// Rebuilds the `TrackRecord` chain for one vehicle from its bound
    /// `Next` variables. Does not touch `start`/`delay` for other vehicles.
    #[instrument(level = "debug", skip(self))]
    pub fn update_path(&mut self, vehicle: VehicleIndex) {
        let start_node = self.engine.start(vehicle);
        let mut current = start_node;
        let mut next = self.engine.next_value(current);
        if current == next {
            // empty vehicle: Start's Next points to itself, nothing to walk.
            return;
        }

        let breaks = self.engine.break_intervals(vehicle);
        let mut break_pos = 0usize;
        let current_min = self.engine.cumul_var(current).min();
        while break_pos < breaks.len() && breaks[break_pos].start_min() + breaks[break_pos].duration_min() <= current_min {
            break_pos += 1;
        }

        while !self.engine.is_end(current) {
            self.reset_node(current);

            next = self.engine.next_value(current);
            let next_min = self.engine.cumul_var(next).min();

            let mut current_break_duration = 0;
            let mut last_break_min = 0;
            let mut last_break_duration = 0;
            while break_pos < breaks.len() && breaks[break_pos].start_min() < next_min {
                last_break_min = breaks[break_pos].start_min();
                last_break_duration = breaks[break_pos].duration_min();
                current_break_duration += last_break_duration;
                break_pos += 1;
            }

            let record = &mut self.records[current as usize];
            record.next = next;
            record.travel_time = self.engine.arc_cost(current, next, vehicle);
            record.break_min = last_break_min + last_break_duration - current_break_duration;
            record.break_duration = current_break_duration;

            current = next;
        }
        self.reset_node(current);

        if break_pos != breaks.len() {
            let end_min = self.engine.cumul_var(current).min();
            if end_min > breaks[break_pos].start_min() {
                tracing::error!(vehicle, node = current, "break cursor left unconsumed breaks before path end");
            }
            debug_assert!(
                end_min <= breaks[break_pos].start_min(),
                "break cursor inconsistent: vehicle {vehicle} ended at {current} with break {break_pos} still pending"
            );
        }
    }

    fn reset_node(&mut self, node: NodeIndex) {
        let default_start = self.duration_sample.start_min(node);
        for scenario in 0..self.duration_sample.size() {
            self.start[node as usize][scenario] = default_start;
            self.delay[node as usize][scenario] = 0;
        }
    }

    /// `UpdatePath` for every vehicle, followed by the full sibling-aware
    /// forward propagation described in §4.1, one scenario at a time.
    #[instrument(level = "debug", skip(self))]
    pub fn update_all_paths(&mut self) {
        for vehicle in 0..self.engine.vehicle_count() as VehicleIndex {
            self.update_path(vehicle);
        }

        for scenario in 0..self.duration_sample.size() {
            let mut worklist: VecDeque<NodeIndex> = VecDeque::new();

            for vehicle in 0..self.engine.vehicle_count() as VehicleIndex {
                let start_node = self.engine.start(vehicle);
                let seed = self.duration_sample.start_min(start_node);
                self.start[start_node as usize][scenario] = seed;
                self.propagate_node_with_siblings(start_node, scenario, &mut worklist);
            }

            while let Some(node) = worklist.pop_front() {
                self.propagate_node_with_siblings(node, scenario, &mut worklist);
            }
        }
    }

    /// Propagates a single vehicle's own completed path forward, without
    /// sibling synchronisation (§4.2 `PropagatePath`): a single completed
    /// path cannot close a sibling living on another, still-open vehicle.
    pub fn propagate_path(&mut self, vehicle: VehicleIndex) {
        for scenario in 0..self.duration_sample.size() {
            self.propagate_node(self.engine.start(vehicle), scenario);
        }
    }

    fn propagate_node(&mut self, start_index: NodeIndex, scenario: usize) {
        let mut current = start_index;
        while self.records[current as usize].next != -1 {
            let next = self.records[current as usize].next;
            let arrival = self.arrival(current, scenario);
            if arrival > self.start[next as usize][scenario] {
                self.start[next as usize][scenario] = arrival;
            }
            current = next;
        }
    }

    fn propagate_node_with_siblings(&mut self, start_index: NodeIndex, scenario: usize, worklist: &mut VecDeque<NodeIndex>) {
        let mut current = start_index;
        while self.records[current as usize].next != -1 {
            let next = self.records[current as usize].next;
            let arrival = self.arrival(current, scenario);
            if arrival > self.start[next as usize][scenario] {
                self.start[next as usize][scenario] = arrival;

                if self.duration_sample.has_sibling(next) {
                    let sibling = self.duration_sample.sibling(next);
                    if self.start[next as usize][scenario] > self.start[sibling as usize][scenario] {
                        self.start[sibling as usize][scenario] = self.start[next as usize][scenario];
                        worklist.push_back(sibling);
                    }
                }
            }
            current = next;
        }
    }

    /// `arrival(u, s)` of §4.1: travel plus break interaction, never
    /// regressing below the already-recorded start of the successor.
    fn arrival(&self, node: NodeIndex, scenario: usize) -> Timestamp {
        let record = &self.records[node as usize];
        let mut value = self.start[node as usize][scenario] + self.duration_sample.duration(node, scenario) + record.travel_time;
        if value > record.break_min {
            value += record.break_duration;
        } else {
            value = value.max(record.break_min + record.break_duration);
        }
        value
    }

    /// Sets `delay[n][s] = start[n][s] - start_max[n]` for every node in
    /// `vehicle`'s own chain (Open Question 2: only this vehicle's chain,
    /// not every node in the model; un-routed nodes keep `delay = 0`).
    pub fn compute_path_delay(&mut self, vehicle: VehicleIndex) {
        let start_node = self.engine.start(vehicle);
        let mut current = self.records[start_node as usize].next;
        while current != -1 && !self.engine.is_end(current) {
            for scenario in 0..self.duration_sample.size() {
                self.delay[current as usize][scenario] = self.start[current as usize][scenario] - self.duration_sample.start_max(current);
            }
            current = self.records[current as usize].next;
        }
    }

    /// Walks `vehicle`'s chain starting at its first visit, in order.
    pub(crate) fn visit_nodes(&self, vehicle: VehicleIndex) -> Vec<NodeIndex> {
        let start_node = self.engine.start(vehicle);
        let mut nodes = Vec::new();
        let mut current = self.records[start_node as usize].next;
        while current != -1 && !self.engine.is_end(current) {
            if self.duration_sample.is_visit(current) {
                nodes.push(current);
            }
            current = self.records[current as usize].next;
        }
        nodes
    }
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator - 1) / denominator
}
