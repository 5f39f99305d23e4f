//! Crate error taxonomy (§7 ambient mechanism).
//!
//! Propagation itself never returns a `Result` — per §5/§7 the only
//! observable outcomes of a propagation cycle are quiet success, a branch
//! failure surfaced through the `Solver`, or a raised riskiness bound.
//! `Result` is reserved for construction-time errors, where a malformed
//! input is a caller mistake rather than a search outcome.

use std::error::Error;
use std::fmt;

/// Boxed, type-erased error, matching the wider codebase's `GenericError`.
pub type GenericError = Box<dyn Error + Send + Sync + 'static>;

/// Boxed-error result alias used at construction boundaries.
pub type GenericResult<T> = Result<T, GenericError>;

/// Errors `DurationSample::new` can return.
#[derive(Debug, thiserror::Error)]
pub enum DurationSampleError {
    /// A visit's sibling group did not have exactly one or two members.
    #[error("visit node {node} belongs to a sibling group of size {size}, expected 1 or 2")]
    InvalidSiblingGroupSize { node: i64, size: usize },

    /// Two nodes claimed each other as sibling inconsistently.
    #[error("sibling link between {a} and {b} is not symmetric")]
    AsymmetricSibling { a: i64, b: i64 },
}
