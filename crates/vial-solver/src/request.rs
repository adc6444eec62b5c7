//! Request and response types matching the JSON format of the solve endpoint.
//!
//! A request carries `{ "gameState": { "vials": [[...]] }, "strictMode": bool }`.
//! Input validation happens here, at the boundary; everything past
//! [`GameState::to_configuration`] assumes well-formed vials.

use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::goal::{is_solved, GoalMode};
use crate::puzzle::{AnnotatedMove, Color, Configuration, Move, Palette, Vial, VIAL_CAPACITY};
use crate::replay::{annotate, replay};
use crate::solver::{find_shortest_solution, SearchOutcome, SolverConfig, SolverResult};

/// Vials as listed by the caller, each bottom-to-top
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub vials: Vec<Vec<Color>>,
}

impl GameState {
    /// Validate the vials and intern their colors
    pub fn to_configuration(&self) -> Result<(Configuration, Palette), RequestError> {
        let mut palette = Palette::new();
        let mut vials = Vec::with_capacity(self.vials.len());

        for (index, colors) in self.vials.iter().enumerate() {
            if colors.len() > VIAL_CAPACITY {
                return Err(RequestError::VialOverCapacity {
                    vial: index,
                    len: colors.len(),
                    capacity: VIAL_CAPACITY,
                });
            }
            let mut units = Vec::with_capacity(colors.len());
            for (position, color) in colors.iter().enumerate() {
                if color.as_str().trim().is_empty() {
                    return Err(RequestError::EmptyColor {
                        vial: index,
                        position,
                    });
                }
                units.push(palette.intern(color)?);
            }
            vials.push(Vial::from_units(units));
        }

        Ok((Configuration::new(vials), palette))
    }
}

/// Body of a solve request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    pub game_state: GameState,
    #[serde(default)]
    pub strict_mode: bool,
}

impl SolveRequest {
    pub fn mode(&self) -> GoalMode {
        GoalMode::from_strict(self.strict_mode)
    }
}

/// One annotated pour as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutput {
    pub from: usize,
    pub to: usize,
    pub color: Color,
    pub units: usize,
}

impl MoveOutput {
    fn from_annotated(mv: &AnnotatedMove, palette: &Palette) -> Self {
        Self {
            from: mv.from,
            to: mv.to,
            color: palette.get(mv.color).cloned().unwrap_or_else(|| Color::new("?")),
            units: mv.units,
        }
    }
}

/// Output format for a solve request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    pub success: bool,
    pub moves: Vec<MoveOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Parse a solve request from JSON
pub fn parse_request(json: &str) -> Result<SolveRequest, RequestError> {
    Ok(serde_json::from_str(json)?)
}

/// Validate, solve and annotate a request.
///
/// A puzzle with no solution is a successful call with `success: false`;
/// `Err` is reserved for input the solver cannot accept.
pub fn handle_request(
    request: &SolveRequest,
    config: &SolverConfig,
) -> Result<SolveResponse, RequestError> {
    let (initial, palette) = request.game_state.to_configuration()?;
    let result = find_shortest_solution(&initial, request.mode(), config);
    Ok(format_result(&result, &initial, &palette, config))
}

fn format_result(
    result: &SolverResult,
    initial: &Configuration,
    palette: &Palette,
    config: &SolverConfig,
) -> SolveResponse {
    let moves: Vec<MoveOutput> = result
        .moves
        .as_deref()
        .map(|moves| {
            annotate(moves, initial)
                .iter()
                .map(|mv| MoveOutput::from_annotated(mv, palette))
                .collect()
        })
        .unwrap_or_default();

    let message = match result.outcome {
        SearchOutcome::AlreadySolved => "Puzzle is already solved".to_string(),
        SearchOutcome::Solved => format!("Found solution in {} moves", moves.len()),
        SearchOutcome::Exhausted => "No solution exists for this configuration".to_string(),
        SearchOutcome::BudgetExceeded => format!(
            "No solution found within {} explored states",
            config.max_states
        ),
    };

    SolveResponse {
        success: result.is_solved(),
        moves,
        message: Some(message),
    }
}

/// Body of a verify request: a puzzle plus a candidate move list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub game_state: GameState,
    #[serde(default)]
    pub strict_mode: bool,
    pub moves: Vec<Move>,
}

/// Output format for a verify request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_state: Option<Vec<Vec<Color>>>,
}

/// Replay a candidate move list and report whether it solves the puzzle
pub fn handle_verify(request: &VerifyRequest) -> Result<VerifyResponse, RequestError> {
    let (initial, palette) = request.game_state.to_configuration()?;
    let mode = GoalMode::from_strict(request.strict_mode);

    let response = match replay(&initial, &request.moves) {
        Err(err) => VerifyResponse {
            valid: false,
            reason: Some(err.to_string()),
            final_state: None,
        },
        Ok(state) => {
            let solved = is_solved(&state, mode);
            VerifyResponse {
                valid: solved,
                reason: (!solved).then(|| "moves do not reach a solved state".to_string()),
                final_state: Some(palette.resolve(&state)),
            }
        }
    };
    Ok(response)
}
