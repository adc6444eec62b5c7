//! Breadth-first solver for finding shortest pour sequences.
//!
//! The search explores configurations level by level, so the first solved
//! configuration it discovers is reached by a minimum number of pours.
//! Configurations are marked visited when they are discovered rather than
//! when they are expanded, which keeps the frontier free of duplicates.
//!
//! Ties between equally short solutions are broken by the successor order
//! of [`successors`] and FIFO discovery order, so results are deterministic.

use std::collections::{HashSet, VecDeque};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::goal::{is_solved, GoalMode};
use crate::puzzle::{CanonicalKey, Configuration, Move};
use crate::rules::successors;

/// Default exploration budget, in expanded configurations
pub const DEFAULT_MAX_STATES: usize = 100_000;

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum number of configurations to expand before giving up
    pub max_states: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_states: DEFAULT_MAX_STATES,
        }
    }
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The initial configuration already met the goal
    AlreadySolved,
    /// A shortest solution was found
    Solved,
    /// Every reachable configuration was explored; no solution exists
    Exhausted,
    /// The exploration budget ran out first
    BudgetExceeded,
}

/// Result of the solver search
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub outcome: SearchOutcome,
    /// The winning pour sequence, if any (empty when already solved)
    pub moves: Option<Vec<Move>>,
    /// Number of configurations expanded
    pub states_explored: usize,
    /// Number of distinct configurations discovered, including the initial one
    pub states_discovered: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
}

impl SolverResult {
    pub fn is_solved(&self) -> bool {
        self.moves.is_some()
    }
}

/// A configuration and the pours that reached it
#[derive(Debug)]
struct SearchNode {
    configuration: Configuration,
    path: Vec<Move>,
}

/// Find a shortest pour sequence taking `initial` to a configuration that
/// satisfies `mode`.
pub fn find_shortest_solution(
    initial: &Configuration,
    mode: GoalMode,
    config: &SolverConfig,
) -> SolverResult {
    let start_time = Instant::now();

    let finish = |outcome, moves, states_explored, states_discovered| SolverResult {
        outcome,
        moves,
        states_explored,
        states_discovered,
        time_elapsed_ms: start_time.elapsed().as_millis() as u64,
    };

    if is_solved(initial, mode) {
        debug!(?mode, vials = initial.len(), "initial configuration already solved");
        return finish(SearchOutcome::AlreadySolved, Some(Vec::new()), 0, 1);
    }

    debug!(
        ?mode,
        vials = initial.len(),
        units = initial.unit_count(),
        max_states = config.max_states,
        "starting breadth-first search"
    );

    let mut visited: HashSet<CanonicalKey> = HashSet::new();
    visited.insert(initial.key());

    let mut frontier: VecDeque<SearchNode> = VecDeque::new();
    frontier.push_back(SearchNode {
        configuration: initial.clone(),
        path: Vec::new(),
    });

    let mut states_explored: usize = 0;

    while states_explored < config.max_states {
        let Some(node) = frontier.pop_front() else {
            break;
        };
        states_explored += 1;

        for (mv, next) in successors(&node.configuration) {
            if !visited.insert(next.key()) {
                continue;
            }

            let mut path = Vec::with_capacity(node.path.len() + 1);
            path.extend_from_slice(&node.path);
            path.push(mv);

            if is_solved(&next, mode) {
                info!(
                    moves = path.len(),
                    states_explored,
                    states_discovered = visited.len(),
                    "found shortest solution"
                );
                return finish(
                    SearchOutcome::Solved,
                    Some(path),
                    states_explored,
                    visited.len(),
                );
            }

            frontier.push_back(SearchNode {
                configuration: next,
                path,
            });
        }
    }

    if frontier.is_empty() {
        debug!(states_explored, "search space exhausted without a solution");
        finish(SearchOutcome::Exhausted, None, states_explored, visited.len())
    } else {
        warn!(
            states_explored,
            frontier = frontier.len(),
            "exploration budget exceeded before a solution was found"
        );
        finish(
            SearchOutcome::BudgetExceeded,
            None,
            states_explored,
            visited.len(),
        )
    }
}

/// Shortest pour sequence with the default budget, or `None` when no
/// solution was found (either none exists or the budget ran out).
pub fn solve(initial: &Configuration, mode: GoalMode) -> Option<Vec<Move>> {
    find_shortest_solution(initial, mode, &SolverConfig::default()).moves
}
