//! Pour rules: which moves are legal and what they produce.
//!
//! A pour moves the whole top run of the source vial, limited by the free
//! space in the destination. Every function here is pure; configurations
//! are never modified in place.

use crate::puzzle::{ColorId, Configuration, Move};

/// Color and quantity a legal pour would transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pour {
    pub color: ColorId,
    pub units: usize,
}

/// Check whether pouring from `from` into `to` is allowed
pub fn is_valid_move(configuration: &Configuration, from: usize, to: usize) -> bool {
    if from == to {
        return false;
    }
    let (Some(source), Some(dest)) = (configuration.vial(from), configuration.vial(to)) else {
        return false;
    };
    let Some(color) = source.top() else {
        return false;
    };
    if dest.is_full() {
        return false;
    }
    match dest.top() {
        None => true,
        Some(top) => top == color,
    }
}

/// What a legal move transfers, or `None` if the move is not legal
pub fn pour_for(configuration: &Configuration, mv: Move) -> Option<Pour> {
    if !is_valid_move(configuration, mv.from, mv.to) {
        return None;
    }
    let run = configuration.vial(mv.from)?.top_run()?;
    let space = configuration.vial(mv.to)?.free_space();
    Some(Pour {
        color: run.color,
        units: run.count.min(space),
    })
}

/// Apply a move, returning the new configuration.
///
/// # Panics
///
/// Panics if the move is not valid for `configuration`.
pub fn apply_move(configuration: &Configuration, mv: Move) -> Configuration {
    let Some(pour) = pour_for(configuration, mv) else {
        panic!("apply_move called with invalid pour {mv}");
    };
    configuration.transferred(mv.from, mv.to, pour.color, pour.units)
}

/// All legal moves with their results, ordered by source then destination
pub fn successors(configuration: &Configuration) -> impl Iterator<Item = (Move, Configuration)> + '_ {
    let n = configuration.len();
    (0..n)
        .flat_map(move |from| (0..n).map(move |to| Move::new(from, to)))
        .filter_map(move |mv| {
            pour_for(configuration, mv)
                .map(|pour| (mv, configuration.transferred(mv.from, mv.to, pour.color, pour.units)))
        })
}
