//! Move replay: annotating solutions and checking caller-supplied ones.
//!
//! The search only records `(from, to)` pairs. Color and quantity are
//! recovered here by replaying the pours against a fresh copy of the
//! initial configuration.

use crate::error::ReplayError;
use crate::goal::{is_solved, GoalMode};
use crate::puzzle::{AnnotatedMove, Configuration, Move};
use crate::rules::pour_for;

/// Attach color and quantity to each move of a solution.
///
/// # Panics
///
/// Panics if a move is not valid at the point it is replayed. Move lists
/// produced by the solver never trigger this; use [`replay`] for untrusted
/// input.
pub fn annotate(moves: &[Move], initial: &Configuration) -> Vec<AnnotatedMove> {
    let mut state = initial.clone();
    let mut annotated = Vec::with_capacity(moves.len());

    for &mv in moves {
        let Some(pour) = pour_for(&state, mv) else {
            panic!("annotate called with invalid pour {mv}");
        };
        annotated.push(AnnotatedMove {
            from: mv.from,
            to: mv.to,
            color: pour.color,
            units: pour.units,
        });
        state = state.transferred(mv.from, mv.to, pour.color, pour.units);
    }

    annotated
}

/// Apply a sequence of moves, rejecting the first one that is not legal
pub fn replay(initial: &Configuration, moves: &[Move]) -> Result<Configuration, ReplayError> {
    let mut state = initial.clone();
    for (index, &mv) in moves.iter().enumerate() {
        let pour = pour_for(&state, mv).ok_or(ReplayError::InvalidMove {
            index,
            from: mv.from,
            to: mv.to,
        })?;
        state = state.transferred(mv.from, mv.to, pour.color, pour.units);
    }
    Ok(state)
}

/// Apply annotated moves using their recorded quantities rather than
/// recomputing them
pub fn replay_annotated(
    initial: &Configuration,
    moves: &[AnnotatedMove],
) -> Result<Configuration, ReplayError> {
    let mut state = initial.clone();
    for (index, mv) in moves.iter().enumerate() {
        let mismatch = ReplayError::UnitMismatch {
            index,
            from: mv.from,
            to: mv.to,
            units: mv.units,
        };
        let (Some(source), Some(dest)) = (state.vial(mv.from), state.vial(mv.to)) else {
            return Err(mismatch);
        };
        let run_fits = source
            .top_run()
            .is_some_and(|run| run.color == mv.color && run.count >= mv.units);
        if mv.from == mv.to || mv.units == 0 || !run_fits || dest.free_space() < mv.units {
            return Err(mismatch);
        }
        state = state.transferred(mv.from, mv.to, mv.color, mv.units);
    }
    Ok(state)
}

/// Simple verification: do the moves take `initial` to a solved state?
pub fn verify_solution(initial: &Configuration, moves: &[Move], mode: GoalMode) -> bool {
    replay(initial, moves).is_ok_and(|state| is_solved(&state, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{config_from_raw, ColorId};
    use crate::solver::solve;
    use proptest::prelude::*;

    #[test]
    fn test_annotate_records_units() {
        let config = config_from_raw(&[&[0, 0], &[0, 0]]);
        let annotated = annotate(&[Move::new(0, 1)], &config);

        assert_eq!(
            annotated,
            vec![AnnotatedMove {
                from: 0,
                to: 1,
                color: ColorId::from_raw(0),
                units: 2,
            }]
        );
    }

    #[test]
    fn test_annotate_tracks_state_between_moves() {
        let config = config_from_raw(&[&[0, 1], &[1, 0], &[]]);
        let moves = [Move::new(0, 2), Move::new(1, 0), Move::new(1, 2)];
        let annotated = annotate(&moves, &config);

        let summary: Vec<(u16, usize)> = annotated
            .iter()
            .map(|mv| (mv.color.index() as u16, mv.units))
            .collect();
        assert_eq!(summary, vec![(1, 1), (0, 1), (1, 1)]);
        assert_eq!(annotated[2].as_move(), Move::new(1, 2));
    }

    #[test]
    fn test_replay_rejects_invalid_move() {
        let config = config_from_raw(&[&[0], &[1], &[]]);
        let err = replay(&config, &[Move::new(0, 2), Move::new(1, 2)]).unwrap_err();
        assert_eq!(
            err,
            ReplayError::InvalidMove {
                index: 1,
                from: 1,
                to: 2
            }
        );
    }

    #[test]
    fn test_replay_annotated_rejects_wrong_units() {
        let config = config_from_raw(&[&[0, 0], &[]]);
        let bogus = AnnotatedMove {
            from: 0,
            to: 1,
            color: ColorId::from_raw(0),
            units: 3,
        };
        assert!(matches!(
            replay_annotated(&config, &[bogus]),
            Err(ReplayError::UnitMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn test_verify_solution() {
        let config = config_from_raw(&[&[0], &[0], &[]]);
        assert!(verify_solution(&config, &[Move::new(0, 1)], GoalMode::Strict));
        assert!(!verify_solution(&config, &[Move::new(0, 2)], GoalMode::Strict));
        assert!(!verify_solution(&config, &[Move::new(2, 0)], GoalMode::Loose));
    }

    fn small_configuration() -> impl Strategy<Value = Configuration> {
        prop::collection::vec(prop::collection::vec(0u16..3, 0..=4), 2..=4)
            .prop_map(|vials| {
                let slices: Vec<&[u16]> = vials.iter().map(Vec::as_slice).collect();
                config_from_raw(&slices)
            })
    }

    fn valid_walk() -> impl Strategy<Value = (Configuration, Vec<Move>)> {
        (small_configuration(), prop::collection::vec(any::<prop::sample::Index>(), 0..12)).prop_map(
            |(initial, picks)| {
                let mut state = initial.clone();
                let mut moves = Vec::new();
                for pick in picks {
                    let options: Vec<_> = crate::rules::successors(&state).collect();
                    if options.is_empty() {
                        break;
                    }
                    let (mv, next) = options[pick.index(options.len())].clone();
                    moves.push(mv);
                    state = next;
                }
                (initial, moves)
            },
        )
    }

    proptest! {
        #[test]
        fn colors_are_conserved((initial, moves) in valid_walk()) {
            let final_state = replay(&initial, &moves).unwrap();
            prop_assert_eq!(final_state.color_totals(), initial.color_totals());
        }

        #[test]
        fn annotated_replay_matches_raw((initial, moves) in valid_walk()) {
            let annotated = annotate(&moves, &initial);
            prop_assert_eq!(annotated.len(), moves.len());
            prop_assert_eq!(
                replay_annotated(&initial, &annotated).unwrap(),
                replay(&initial, &moves).unwrap()
            );
        }

        #[test]
        fn solutions_verify(initial in small_configuration()) {
            for mode in [GoalMode::Loose, GoalMode::Strict] {
                if let Some(moves) = solve(&initial, mode) {
                    prop_assert!(verify_solution(&initial, &moves, mode));
                }
            }
        }
    }
}
