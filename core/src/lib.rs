#![no_std]

extern crate alloc;

use alloc::collections::BTreeSet;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod types;

/// Side length used when no explicit board size is given.
pub const DEFAULT_BOARD_SIZE: Coord = 20;

/// Per-cell mine probability used when no explicit density is given.
pub const DEFAULT_MINE_CHANCE: f64 = 0.15;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    size: Coord,
    mine_chance: f64,
}

impl FieldConfig {
    pub(crate) const fn new_unchecked(size: Coord, mine_chance: f64) -> Self {
        Self { size, mine_chance }
    }

    /// Builds a config, clamping the side length to at least 1 and the mine
    /// chance into `[0.0, 1.0]`. Out-of-range inputs are logged, not errors.
    pub fn new(size: Coord, mine_chance: f64) -> Self {
        let size = size.clamp(1, Coord::MAX);

        let mine_chance = if !mine_chance.is_finite() {
            log::warn!("Mine chance {mine_chance} is not finite, fallback to 0");
            0.0
        } else if !(0.0..=1.0).contains(&mine_chance) {
            let clamped = mine_chance.clamp(0.0, 1.0);
            log::warn!("Mine chance {mine_chance} out of range, clamped to {clamped}");
            clamped
        } else {
            mine_chance
        };

        Self::new_unchecked(size, mine_chance)
    }

    pub const fn size(&self) -> Coord {
        self.size
    }

    pub const fn mine_chance(&self) -> f64 {
        self.mine_chance
    }

    pub const fn total_cells(&self) -> CellCount {
        area(self.size)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.size && coords.1 < self.size {
            Ok(coords)
        } else {
            Err(FieldError::OutOfBounds)
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_BOARD_SIZE, DEFAULT_MINE_CHANCE)
    }
}

/// Immutable mine placement for one generated board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Wraps a mine mask, rejecting non-square input.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let dim = mine_mask.dim();
        if dim.0 != dim.1 || Coord::try_from(dim.0).is_err() {
            return Err(FieldError::InvalidArgument);
        }

        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();
        Ok(Self {
            mine_mask,
            mine_count,
        })
    }

    /// Builds a layout with mines at exactly the given positions.
    pub fn from_mine_coords(side: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default((side, side).to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= side || coords.1 >= side {
                return Err(FieldError::OutOfBounds);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let side = self.size();
        if coords.0 < side && coords.1 < side {
            Ok(coords)
        } else {
            Err(FieldError::OutOfBounds)
        }
    }

    pub fn size(&self) -> Coord {
        self.mine_mask.dim().0.try_into().unwrap()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap()
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.mine_mask[(x as usize, y as usize)]
    }
}

/// Outcome of a flag command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Outcome of a reveal command, carrying everything the caller needs to
/// render: the freshly revealed squares, the fatal square, or nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed(BTreeSet<Coord2>),
    HitMine(Coord2),
    Won(BTreeSet<Coord2>),
}

impl RevealOutcome {
    pub fn has_update(&self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// The squares newly revealed by this command, if any.
    pub fn revealed(&self) -> Option<&BTreeSet<Coord2>> {
        match self {
            Self::Revealed(set) | Self::Won(set) => Some(set),
            Self::NoChange | Self::HitMine(_) => None,
        }
    }
}
