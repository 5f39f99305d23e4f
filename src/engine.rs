//! Trait surface abstracting the external CP routing engine (§6).
//!
//! This core never implements a search engine: it only reads bound
//! variables and posts constraints against handles the engine owns. The
//! traits below model exactly the slice of the engine's API this crate
//! touches (`Start`/`End`/`NextVar`/`ArcCost`/break intervals/cumulative
//! time variables/`Solver`), borrowed with the lifetime of the enclosing
//! model per the design note on cyclic references.

/// A node index in the routing model: a depot start/end or a visit.
pub type NodeIndex = i64;

/// A vehicle index in the routing model.
pub type VehicleIndex = i64;

/// Seconds since midnight, or a duration in seconds. Always signed.
pub type Timestamp = i64;

/// Number of seconds in a day; the horizon every `start[n][s]` is bounded by.
pub const SECONDS_IN_DAY: Timestamp = 86_400;

/// A read handle onto an integer CP variable (`CumulVar`, `SlackVar`, the
/// shared `riskiness_index`, ...).
pub trait IntVarHandle {
    fn min(&self) -> Timestamp;
    fn max(&self) -> Timestamp;
    fn value(&self) -> Timestamp;

    fn is_bound(&self) -> bool {
        self.min() == self.max()
    }
}

/// A read handle onto a boolean CP variable (`completed_paths[v]`,
/// `all_paths_completed`).
pub trait BoolVarHandle {
    fn min(&self) -> i64;
    fn max(&self) -> i64;

    fn is_bound(&self) -> bool {
        self.min() == self.max()
    }
}

/// A single break (unpaid interval) on a vehicle's ordered break list.
pub trait BreakIntervalHandle {
    fn start_min(&self) -> Timestamp;
    fn start_max(&self) -> Timestamp;
    fn duration_min(&self) -> Timestamp;
}

/// The slice of the routing engine this core reads from directly.
///
/// Implementations borrow the underlying solver model; the associated
/// handle types are themselves borrowed views, never owned copies.
pub trait RoutingEngine {
    type IntVar: IntVarHandle;
    type Break: BreakIntervalHandle;

    fn vehicle_count(&self) -> usize;
    fn node_count(&self) -> usize;

    fn start(&self, vehicle: VehicleIndex) -> NodeIndex;
    fn end(&self, vehicle: VehicleIndex) -> NodeIndex;
    fn is_end(&self, node: NodeIndex) -> bool;

    /// `NextVar(node).Value()`; only valid once bound.
    fn next_value(&self, node: NodeIndex) -> NodeIndex;

    /// Deterministic travel time for the owning vehicle.
    fn arc_cost(&self, from: NodeIndex, to: NodeIndex, vehicle: VehicleIndex) -> Timestamp;

    /// The time-dimension cumulative variable at `node`.
    fn cumul_var(&self, node: NodeIndex) -> Self::IntVar;

    /// Ordered break intervals for `vehicle`, ascending by `start_min`.
    fn break_intervals(&self, vehicle: VehicleIndex) -> Vec<Self::Break>;
}

/// The slice of `operations_research::Solver` this core posts against.
pub trait Solver {
    type BoolVar: BoolVarHandle;
    type IntVar: IntVarHandle;

    fn make_bool_var(&self) -> Self::BoolVar;

    /// `MakePathConnected`: a bool var bound to 1 once `nexts` forms a
    /// simple path from every node in `starts` to the matching node in `ends`.
    fn make_path_connected(
        &self,
        nexts: &[NodeIndex],
        starts: &[NodeIndex],
        ends: &[NodeIndex],
    ) -> Self::BoolVar;

    /// `MakeIsEqualCstVar(MakeSum(vars), target)`.
    fn make_sum_equals(&self, vars: &[Self::BoolVar], target: i64) -> Self::BoolVar;

    /// `AddConstraint(MakeGreaterOrEqual(var, value))`.
    fn post_greater_or_equal(&self, var: &Self::IntVar, value: i64);

    /// Fails the current search branch. In a real engine this unwinds to
    /// the nearest choice point and never returns control to the caller in
    /// the usual sense; here the caller is expected to stop propagating
    /// further nodes once this has been called (see `DelayConstraint`).
    fn fail(&self);

    /// Whether `fail` has been called since the last propagation cycle.
    fn is_failed(&self) -> bool;
}
