use alloc::collections::{BTreeSet, VecDeque};
use core::num::Saturating;
use ndarray::Array2;
use rand::prelude::*;

use crate::*;

/// Sentinel neighbor-mine-count reported for mine squares and for queries
/// against an ungenerated grid.
pub const MINE_VALUE: i8 = -1;

/// Grid lifecycle. The board does not exist until the first reveal command
/// births it; `reset` returns here.
#[derive(Clone, Debug)]
enum Phase {
    Unborn,
    Live(LiveField),
}

/// The minefield state engine.
///
/// Owns the grid exclusively. Commands (`reveal`, `set_flag`, `reset`) mutate
/// it and return typed outcomes for the caller to render; queries never
/// mutate. The grid is generated lazily by the first `reveal`, which carves a
/// mine-free zone around the revealed square and its neighbors.
#[derive(Clone, Debug)]
pub struct MinefieldEngine {
    config: FieldConfig,
    rng: SmallRng,
    phase: Phase,
}

impl MinefieldEngine {
    /// Creates an engine with no grid yet. `seed` makes the whole sequence of
    /// games deterministic; every generation draws its own sub-seed.
    pub fn new(config: FieldConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
            phase: Phase::Unborn,
        }
    }

    /// Creates an engine that is already live over a known layout, bypassing
    /// random generation. The config is derived from the layout, so a later
    /// `reset` regenerates at the layout's observed mine density.
    pub fn from_layout(layout: MineLayout, seed: u64) -> Self {
        let chance = f64::from(layout.mine_count()) / f64::from(layout.total_cells());
        Self {
            config: FieldConfig::new_unchecked(layout.size(), chance),
            rng: SmallRng::seed_from_u64(seed),
            phase: Phase::Live(LiveField::new(layout)),
        }
    }

    pub const fn size(&self) -> Coord {
        self.config.size()
    }

    pub const fn mine_chance(&self) -> f64 {
        self.config.mine_chance()
    }

    /// Whether the grid has been generated. Use this, not query defaults, to
    /// detect the lifecycle phase.
    pub const fn is_live(&self) -> bool {
        matches!(self.phase, Phase::Live(_))
    }

    /// Total mines on the live board, `None` while ungenerated.
    pub fn total_mines(&self) -> Option<CellCount> {
        match &self.phase {
            Phase::Unborn => None,
            Phase::Live(field) => Some(field.layout.mine_count()),
        }
    }

    pub fn is_mine(&self, coords: Coord2) -> Result<bool> {
        match &self.phase {
            Phase::Unborn => Ok(false),
            Phase::Live(field) => {
                let coords = field.layout.validate_coords(coords)?;
                Ok(field.layout.contains_mine(coords))
            }
        }
    }

    pub fn is_flagged(&self, coords: Coord2) -> Result<bool> {
        match &self.phase {
            Phase::Unborn => Ok(false),
            Phase::Live(field) => {
                let coords = field.layout.validate_coords(coords)?;
                Ok(field.cells[coords.to_nd_index()].flagged)
            }
        }
    }

    pub fn is_revealed(&self, coords: Coord2) -> Result<bool> {
        match &self.phase {
            Phase::Unborn => Ok(false),
            Phase::Live(field) => {
                let coords = field.layout.validate_coords(coords)?;
                Ok(field.cells[coords.to_nd_index()].revealed)
            }
        }
    }

    /// Number of mines among the Moore-neighbors of `coords`, or [`MINE_VALUE`]
    /// when `coords` itself is a mine (a mine square has no defined value).
    ///
    /// While the grid is ungenerated every query here reports its default --
    /// false, or [`MINE_VALUE`] -- for any position, even an out-of-range one.
    pub fn neighbor_mine_count(&self, coords: Coord2) -> Result<i8> {
        match &self.phase {
            Phase::Unborn => Ok(MINE_VALUE),
            Phase::Live(field) => {
                let coords = field.layout.validate_coords(coords)?;
                if field.layout.contains_mine(coords) {
                    Ok(MINE_VALUE)
                } else {
                    Ok(field.layout.adjacent_mine_count(coords) as i8)
                }
            }
        }
    }

    /// Reveals a square.
    ///
    /// The first reveal ever generates the board, with `coords` and its
    /// neighbors carved mine-free. Revealing a revealed or flagged square is a
    /// no-op; revealing a mine reports [`RevealOutcome::HitMine`] without
    /// touching any state (the fatal square stays unrevealed and the engine
    /// keeps accepting commands). Otherwise the flood fill opens the connected
    /// zero-value region plus its numbered border, reporting
    /// [`RevealOutcome::Won`] when that completes the last non-mine square.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        // Bounds first: a faulting reveal must not generate anything.
        let coords = self.config.validate_coords(coords)?;

        if matches!(self.phase, Phase::Unborn) {
            let seed = self.rng.random();
            log::debug!("First reveal at {coords:?}, generating board with seed {seed}");
            let layout = DensityMinefieldGenerator::new(seed, Some(coords)).generate(self.config);
            self.phase = Phase::Live(LiveField::new(layout));
        }

        let Phase::Live(field) = &mut self.phase else {
            unreachable!("grid generated above");
        };
        Ok(field.reveal(coords))
    }

    /// Sets the flag bit of a square unconditionally, revealed squares
    /// included. No-op while the grid is ungenerated.
    pub fn set_flag(&mut self, coords: Coord2, flagged: bool) -> Result<MarkOutcome> {
        match &mut self.phase {
            Phase::Unborn => Ok(MarkOutcome::NoChange),
            Phase::Live(field) => {
                let coords = field.layout.validate_coords(coords)?;
                Ok(field.set_flag(coords, flagged))
            }
        }
    }

    /// Destroys the grid, returning to the ungenerated phase. Idempotent. The
    /// engine's RNG keeps its state, so the next game gets a fresh layout.
    pub fn reset(&mut self) {
        if self.is_live() {
            log::debug!("Resetting board to the ungenerated phase");
        }
        self.phase = Phase::Unborn;
    }
}

#[derive(Clone, Debug)]
struct LiveField {
    layout: MineLayout,
    cells: Array2<Cell>,
    revealed_count: Saturating<CellCount>,
}

impl LiveField {
    fn new(layout: MineLayout) -> Self {
        let side = layout.size();
        Self {
            layout,
            cells: Array2::default((side, side).to_nd_index()),
            revealed_count: Saturating(0),
        }
    }

    fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.cells[coords.to_nd_index()].can_reveal() {
            return RevealOutcome::NoChange;
        }

        if self.layout.contains_mine(coords) {
            log::debug!("Mine hit at {coords:?}");
            return RevealOutcome::HitMine(coords);
        }

        let revealed = self.flood_reveal(coords);
        if self.revealed_count == Saturating(self.layout.safe_cell_count()) {
            log::debug!("All safe squares revealed");
            RevealOutcome::Won(revealed)
        } else {
            RevealOutcome::Revealed(revealed)
        }
    }

    /// Opens the connected zero-value region containing `origin` plus the
    /// one-cell halo of numbered squares around it.
    fn flood_reveal(&mut self, origin: Coord2) -> BTreeSet<Coord2> {
        let mut revealed = BTreeSet::new();
        let mut to_visit = VecDeque::from([origin]);

        while let Some(coords) = to_visit.pop_front() {
            let nd = coords.to_nd_index();
            if !self.cells[nd].can_reveal() {
                continue;
            }

            // Mark before expanding: the board itself is the visited set, and
            // this ordering is what keeps the traversal from looping.
            self.cells[nd].revealed = true;
            self.revealed_count += 1;
            revealed.insert(coords);

            // Only zero-value squares propagate; their neighbors are never
            // mines, so the worklist cannot reach one past the origin check.
            if self.layout.adjacent_mine_count(coords) == 0 {
                log::trace!("Flood expanding from zero square {coords:?}");
                to_visit.extend(
                    self.layout
                        .iter_neighbors(coords)
                        .filter(|&pos| self.cells[pos.to_nd_index()].can_reveal()),
                );
            }
        }

        revealed
    }

    fn set_flag(&mut self, coords: Coord2, flagged: bool) -> MarkOutcome {
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.flagged == flagged {
            MarkOutcome::NoChange
        } else {
            cell.flagged = flagged;
            MarkOutcome::Changed
        }
    }
}
