//! Solved-state predicates.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::puzzle::{Configuration, VIAL_CAPACITY};

/// Which goal definition a search is aiming for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalMode {
    /// Every vial is empty or holds a single color
    #[default]
    Loose,
    /// Loose, and each color sits in exactly one vial filled to
    /// `min(total, VIAL_CAPACITY)`
    Strict,
}

impl GoalMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            GoalMode::Strict
        } else {
            GoalMode::Loose
        }
    }
}

/// Check whether `configuration` satisfies the goal for `mode`
pub fn is_solved(configuration: &Configuration, mode: GoalMode) -> bool {
    match mode {
        GoalMode::Loose => is_loosely_solved(configuration),
        GoalMode::Strict => is_strictly_solved(configuration),
    }
}

fn is_loosely_solved(configuration: &Configuration) -> bool {
    configuration.vials().iter().all(|vial| vial.is_monochrome())
}

fn is_strictly_solved(configuration: &Configuration) -> bool {
    if !is_loosely_solved(configuration) {
        return false;
    }

    let totals = configuration.color_totals();
    let mut seen = HashSet::new();
    for vial in configuration.vials() {
        let Some(color) = vial.top() else {
            continue;
        };
        // A color already seen in another vial is split
        if !seen.insert(color) {
            return false;
        }
        if vial.len() != totals[&color].min(VIAL_CAPACITY) {
            return false;
        }
    }
    true
}
