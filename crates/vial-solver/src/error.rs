//! Error types for request handling and move replay.
//!
//! None of these come out of the search itself: a search that finds nothing
//! is a normal [`SolverResult`](crate::solver::SolverResult), not an error.

use thiserror::Error;

/// Errors raised while turning caller input into a configuration.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A vial holds more units than fit.
    #[error("vial {vial} holds {len} units, capacity is {capacity}")]
    VialOverCapacity {
        vial: usize,
        len: usize,
        capacity: usize,
    },

    /// A color token is empty or whitespace.
    #[error("vial {vial} has an empty color at position {position}")]
    EmptyColor { vial: usize, position: usize },

    /// More distinct colors than a palette can intern.
    #[error("too many distinct colors (limit {limit})")]
    TooManyColors { limit: usize },

    /// Request body is not valid JSON for the expected shape.
    #[error("invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while replaying a caller-supplied move list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// The pour is not allowed in the configuration reached so far.
    #[error("move {index} ({from} -> {to}) is not a valid pour")]
    InvalidMove { index: usize, from: usize, to: usize },

    /// An annotated pour does not match what the source vial can give
    /// or the destination vial can take.
    #[error("move {index} ({from} -> {to}) cannot transfer {units} units")]
    UnitMismatch {
        index: usize,
        from: usize,
        to: usize,
        units: usize,
    },
}
