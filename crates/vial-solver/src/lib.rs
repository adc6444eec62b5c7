//! Vial solver library for liquid sort puzzles.
//!
//! Given a row of vials holding stacked colors, this crate finds a shortest
//! sequence of pours that sorts them, under either a loose goal (every vial
//! monochrome or empty) or a strict one (every color consolidated into a
//! single vial). Solutions are annotated with the color and quantity each
//! pour moves.

pub mod error;
pub mod goal;
pub mod puzzle;
pub mod replay;
pub mod request;
pub mod rules;
pub mod solver;

// Re-export main types
pub use error::{ReplayError, RequestError};
pub use goal::{is_solved, GoalMode};
pub use puzzle::{
    AnnotatedMove, CanonicalKey, Color, ColorId, Configuration, Move, Palette, TopRun, Vial,
    VIAL_CAPACITY,
};
pub use replay::{annotate, replay, replay_annotated, verify_solution};
pub use request::{
    handle_request, handle_verify, parse_request, GameState, MoveOutput, SolveRequest,
    SolveResponse, VerifyRequest, VerifyResponse,
};
pub use rules::{apply_move, is_valid_move, successors, Pour};
pub use solver::{
    find_shortest_solution, solve, SearchOutcome, SolverConfig, SolverResult, DEFAULT_MAX_STATES,
};
