use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// Generation strategy that samples every cell independently at the configured
/// mine chance, then carves a safe zone around the starting position.
///
/// Carving runs after full random population as a correction pass, so the
/// starting square and its in-bounds Moore-neighbors are never mines while the
/// rest of the board keeps its unconditioned per-cell distribution.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityMinefieldGenerator {
    seed: u64,
    safe_start: Option<Coord2>,
}

impl DensityMinefieldGenerator {
    /// `safe_start = None` skips carving entirely; normal play always carves.
    pub fn new(seed: u64, safe_start: Option<Coord2>) -> Self {
        Self { seed, safe_start }
    }
}

impl MinefieldGenerator for DensityMinefieldGenerator {
    fn generate(self, config: FieldConfig) -> MineLayout {
        let side = config.size();
        let mut mine_mask: Array2<bool> = Array2::default((side, side).to_nd_index());

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for is_mine in mine_mask.iter_mut() {
            *is_mine = rng.random_bool(config.mine_chance());
        }

        // undo to make safe tiles
        if let Some(start) = self.safe_start {
            mine_mask[start.to_nd_index()] = false;
            for coords in NeighborIter::new(start, side) {
                mine_mask[coords.to_nd_index()] = false;
            }
        }

        let layout = MineLayout::from_mine_mask(mine_mask).expect("generated mask is square");
        log::debug!(
            "Generated {side}x{side} minefield with {} mines (chance {})",
            layout.mine_count(),
            config.mine_chance()
        );
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_generates_the_requested_square_size() {
        for side in [1, 2, 7, 20] {
            let config = FieldConfig::new(side, 0.5);
            let layout = DensityMinefieldGenerator::new(42, None).generate(config);
            assert_eq!(layout.size(), side);
            assert_eq!(layout.total_cells(), area(side));
        }
    }

    #[test]
    fn same_seed_reproduces_the_layout() {
        let config = FieldConfig::new(16, 0.3);

        let first = DensityMinefieldGenerator::new(7, Some((4, 4))).generate(config);
        let second = DensityMinefieldGenerator::new(7, Some((4, 4))).generate(config);
        let other = DensityMinefieldGenerator::new(8, Some((4, 4))).generate(config);

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn safe_zone_is_carved_after_population() {
        // full density: every square is a mine except the carved zone
        let config = FieldConfig::new(5, 1.0);
        let layout = DensityMinefieldGenerator::new(1, Some((2, 2))).generate(config);

        for x in 0u8..5 {
            for y in 0u8..5 {
                let in_zone = x.abs_diff(2) <= 1 && y.abs_diff(2) <= 1;
                assert_eq!(layout.contains_mine((x, y)), !in_zone, "at ({x},{y})");
            }
        }
        assert_eq!(layout.mine_count(), 25 - 9);
    }

    #[test]
    fn corner_safe_zone_is_clipped_at_the_edges() {
        let config = FieldConfig::new(4, 1.0);
        let layout = DensityMinefieldGenerator::new(1, Some((0, 0))).generate(config);

        for coords in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert!(!layout.contains_mine(coords));
        }
        assert_eq!(layout.mine_count(), 16 - 4);
    }

    #[test]
    fn no_safe_start_skips_carving() {
        let config = FieldConfig::new(5, 1.0);
        let layout = DensityMinefieldGenerator::new(1, None).generate(config);
        assert_eq!(layout.mine_count(), 25);
    }

    #[test]
    fn mine_fraction_converges_to_the_configured_chance() {
        let config = FieldConfig::new(20, 0.15);

        let mut mines: u32 = 0;
        let mut cells: u32 = 0;
        for seed in 0..200 {
            let layout = DensityMinefieldGenerator::new(seed, None).generate(config);
            mines += u32::from(layout.mine_count());
            cells += u32::from(layout.total_cells());
        }

        let fraction = f64::from(mines) / f64::from(cells);
        // 80_000 samples; a correct sampler stays well inside this tolerance
        assert!(
            (fraction - 0.15).abs() < 0.02,
            "mine fraction {fraction} too far from 0.15"
        );
    }
}
