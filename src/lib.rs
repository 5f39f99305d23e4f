//! Stochastic delay-propagation core for a home-care vehicle-routing CP
//! search: given a candidate routing assignment and a historical sample of
//! visit durations, compute, under every historical scenario, the arrival
//! time and resulting lateness at every visit, honouring sibling
//! (multi-carer) synchronisation, and expose two CP constraints built on
//! top of that computation.
//!
//! Problem-file parsing, distance/duration lookup, the CP search engine
//! itself, CLI/logging-as-a-feature, diary/event value objects and the
//! multi-carer start-time-equality constraint are external collaborators;
//! this crate only declares the trait surface it needs from them
//! ([`engine`], [`history`]).

pub mod constraint;
pub mod delay_tracker;
pub mod duration_sample;
pub mod engine;
pub mod error;
pub mod failed_index_repository;
pub mod history;

pub use constraint::not_expected::DelayNotExpectedConstraint;
pub use constraint::riskiness::DelayRiskinessConstraint;
pub use constraint::{DelayConstraint, DelayConstraintHook};
pub use delay_tracker::{DelayTracker, TrackRecord};
pub use duration_sample::{DurationSample, VisitDescriptor};
pub use engine::{BoolVarHandle, BreakIntervalHandle, IntVarHandle, NodeIndex, RoutingEngine, Solver, Timestamp, VehicleIndex, SECONDS_IN_DAY};
pub use error::{DurationSampleError, GenericError, GenericResult};
pub use failed_index_repository::FailedIndexRepository;
pub use history::{CarerCount, HistoryProvider, VisitInfo};
