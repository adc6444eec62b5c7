//! Puzzle state types: colors, vials, configurations and moves.
//!
//! Colors arrive from callers as arbitrary string tokens. They are interned
//! into a [`Palette`] up front so that the search only ever touches small
//! integer ids, and mapped back to the caller's tokens for reporting.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::RequestError;

/// Number of units a single vial can hold
pub const VIAL_CAPACITY: usize = 4;

/// Slot value for unused capacity in a [`CanonicalKey`]. Never a valid id.
const EMPTY_SLOT: u16 = u16::MAX;

/// A color token as supplied by the caller ("red", "#ff8800", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Interned color id, dense in first-seen order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorId(u16);

impl ColorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[cfg(test)]
    pub(crate) fn from_raw(raw: u16) -> Self {
        debug_assert_ne!(raw, EMPTY_SLOT);
        Self(raw)
    }
}

/// Two-way mapping between caller colors and interned ids
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: Vec<Color>,
    ids: HashMap<Color, ColorId>,
}

impl Palette {
    /// Largest number of distinct colors a palette can hold
    pub const MAX_COLORS: usize = EMPTY_SLOT as usize;

    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `color`, assigning the next free one if unseen
    pub fn intern(&mut self, color: &Color) -> Result<ColorId, RequestError> {
        if let Some(&id) = self.ids.get(color) {
            return Ok(id);
        }
        if self.colors.len() >= Self::MAX_COLORS {
            return Err(RequestError::TooManyColors {
                limit: Self::MAX_COLORS,
            });
        }
        let id = ColorId(self.colors.len() as u16);
        self.colors.push(color.clone());
        self.ids.insert(color.clone(), id);
        Ok(id)
    }

    /// Look up the caller color behind an id
    pub fn get(&self, id: ColorId) -> Option<&Color> {
        self.colors.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Translate a configuration back into caller colors, vial by vial
    pub fn resolve(&self, configuration: &Configuration) -> Vec<Vec<Color>> {
        configuration
            .vials()
            .iter()
            .map(|vial| {
                vial.units()
                    .iter()
                    .filter_map(|&id| self.get(id).cloned())
                    .collect()
            })
            .collect()
    }
}

/// The contiguous run of one color at the top of a vial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopRun {
    pub color: ColorId,
    pub count: usize,
}

/// A single vial, bottom-to-top
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Vial {
    units: SmallVec<[ColorId; VIAL_CAPACITY]>,
}

impl Vial {
    /// Create an empty vial
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vial from colors listed bottom-to-top.
    /// Callers must not exceed [`VIAL_CAPACITY`].
    pub fn from_units(units: impl IntoIterator<Item = ColorId>) -> Self {
        let units: SmallVec<[ColorId; VIAL_CAPACITY]> = units.into_iter().collect();
        debug_assert!(units.len() <= VIAL_CAPACITY);
        Self { units }
    }

    pub fn units(&self) -> &[ColorId] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.units.len() >= VIAL_CAPACITY
    }

    /// Units of free space left
    pub fn free_space(&self) -> usize {
        VIAL_CAPACITY.saturating_sub(self.units.len())
    }

    pub fn top(&self) -> Option<ColorId> {
        self.units.last().copied()
    }

    /// Color and length of the run of identical colors at the top,
    /// or `None` for an empty vial
    pub fn top_run(&self) -> Option<TopRun> {
        let color = self.top()?;
        let count = self
            .units
            .iter()
            .rev()
            .take_while(|&&unit| unit == color)
            .count();
        Some(TopRun { color, count })
    }

    /// True when every unit has the same color (vacuously true when empty)
    pub fn is_monochrome(&self) -> bool {
        match self.units.first() {
            None => true,
            Some(&first) => self.units.iter().all(|&unit| unit == first),
        }
    }

    fn without_top(&self, units: usize) -> Vial {
        let mut next = self.clone();
        next.units.truncate(self.units.len() - units);
        next
    }

    fn with_added(&self, color: ColorId, units: usize) -> Vial {
        let mut next = self.clone();
        next.units.extend(std::iter::repeat(color).take(units));
        next
    }
}

/// A pour between two vials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

impl Move {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A move together with what it actually transferred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotatedMove {
    pub from: usize,
    pub to: usize,
    pub color: ColorId,
    pub units: usize,
}

impl AnnotatedMove {
    pub fn as_move(&self) -> Move {
        Move::new(self.from, self.to)
    }
}

/// Deduplication identity of a configuration.
///
/// Every vial occupies exactly [`VIAL_CAPACITY`] slots, filled bottom-to-top
/// with color ids and padded with a marker no color can take, so two keys
/// are equal iff both configurations hold the same colors in the same vials.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(Box<[u16]>);

/// An immutable arrangement of vials. Vial order is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Configuration {
    vials: Vec<Vial>,
}

impl Configuration {
    pub fn new(vials: Vec<Vial>) -> Self {
        Self { vials }
    }

    pub fn vials(&self) -> &[Vial] {
        &self.vials
    }

    /// Get a vial by index (bounds-checked)
    pub fn vial(&self, index: usize) -> Option<&Vial> {
        self.vials.get(index)
    }

    /// Number of vials
    pub fn len(&self) -> usize {
        self.vials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vials.is_empty()
    }

    pub fn key(&self) -> CanonicalKey {
        let mut slots = Vec::with_capacity(self.vials.len() * VIAL_CAPACITY);
        for vial in &self.vials {
            slots.extend(vial.units().iter().map(|id| id.0));
            slots.extend(std::iter::repeat(EMPTY_SLOT).take(vial.free_space()));
        }
        CanonicalKey(slots.into_boxed_slice())
    }

    /// Total units of each color across all vials
    pub fn color_totals(&self) -> HashMap<ColorId, usize> {
        let mut totals = HashMap::new();
        for vial in &self.vials {
            for &unit in vial.units() {
                *totals.entry(unit).or_insert(0) += 1;
            }
        }
        totals
    }

    /// Total number of units in all vials
    pub fn unit_count(&self) -> usize {
        self.vials.iter().map(Vial::len).sum()
    }

    /// Copy of this configuration with `units` of `color` moved from the top
    /// of `from` onto `to`. The caller has checked that the transfer fits.
    pub(crate) fn transferred(&self, from: usize, to: usize, color: ColorId, units: usize) -> Self {
        let mut vials = self.vials.clone();
        vials[from] = self.vials[from].without_top(units);
        vials[to] = self.vials[to].with_added(color, units);
        Self { vials }
    }
}

/// Build a configuration from raw ids, one slice per vial
#[cfg(test)]
pub(crate) fn config_from_raw(vials: &[&[u16]]) -> Configuration {
    Configuration::new(
        vials
            .iter()
            .map(|units| Vial::from_units(units.iter().map(|&raw| ColorId::from_raw(raw))))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_run() {
        let config = config_from_raw(&[&[0, 1, 1], &[2], &[], &[0, 0, 0, 0]]);

        assert_eq!(
            config.vials()[0].top_run(),
            Some(TopRun {
                color: ColorId::from_raw(1),
                count: 2
            })
        );
        assert_eq!(config.vials()[1].top_run().map(|run| run.count), Some(1));
        assert_eq!(config.vials()[2].top_run(), None);
        assert_eq!(config.vials()[3].top_run().map(|run| run.count), Some(4));
    }

    #[test]
    fn test_top_run_only_top_differs() {
        let config = config_from_raw(&[&[1, 1, 0]]);
        let run = config.vials()[0].top_run().unwrap();
        assert_eq!(run.color, ColorId::from_raw(0));
        assert_eq!(run.count, 1);
    }

    #[test]
    fn test_key_respects_vial_order() {
        let a = config_from_raw(&[&[0], &[1]]);
        let b = config_from_raw(&[&[1], &[0]]);
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key(), config_from_raw(&[&[0], &[1]]).key());
    }

    #[test]
    fn test_key_distinguishes_vial_boundaries() {
        // Same flattened contents, different split between vials
        let a = config_from_raw(&[&[0, 0], &[0]]);
        let b = config_from_raw(&[&[0], &[0, 0]]);
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_color_totals() {
        let config = config_from_raw(&[&[0, 1, 1], &[1], &[]]);
        let totals = config.color_totals();
        assert_eq!(totals[&ColorId::from_raw(0)], 1);
        assert_eq!(totals[&ColorId::from_raw(1)], 3);
        assert_eq!(totals.len(), 2);
        assert_eq!(config.unit_count(), 4);
    }

    #[test]
    fn test_palette_interns_in_first_seen_order() {
        let mut palette = Palette::new();
        let red = palette.intern(&Color::from("red")).unwrap();
        let blue = palette.intern(&Color::from("blue")).unwrap();
        assert_eq!(palette.intern(&Color::from("red")).unwrap(), red);
        assert_eq!(red.index(), 0);
        assert_eq!(blue.index(), 1);
        assert_eq!(palette.get(blue), Some(&Color::from("blue")));
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn test_palette_resolve() {
        let mut palette = Palette::new();
        let red = palette.intern(&Color::from("red")).unwrap();
        let blue = palette.intern(&Color::from("blue")).unwrap();
        let config = Configuration::new(vec![Vial::from_units([red, blue]), Vial::new()]);

        assert_eq!(
            palette.resolve(&config),
            vec![vec![Color::from("red"), Color::from("blue")], vec![]]
        );
    }

    #[test]
    fn test_vial_monochrome() {
        let config = config_from_raw(&[&[], &[2, 2, 2], &[2, 3]]);
        assert!(config.vials()[0].is_monochrome());
        assert!(config.vials()[1].is_monochrome());
        assert!(!config.vials()[2].is_monochrome());
    }
}
