//! Grid generation and click-space classification.
//!
//! Every generation produces exactly `target_count` target cells. Cell
//! `i` always lands at row `i / columns`, column `i % columns`; only the
//! display offsets are random. Offsets are drawn independently per cell
//! and may collide, which is fine because scoring never reads them.

use rand::Rng;
use serde::Deserialize;
use tapgrid_types::{CellKind, CellOffset, GridCell, GridLayout};

use crate::config::GridConfig;

/// Inclusive integer range plus a fixed padding, used for display offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OffsetRange {
    /// Smallest raw value.
    pub min: u32,
    /// Largest raw value (inclusive).
    pub max: u32,
    /// Constant added to every sample.
    pub padding: u32,
}

impl OffsetRange {
    /// Draw `uniform(min..=max) + padding`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> u32 {
        let raw = if self.min >= self.max {
            self.min
        } else {
            rng.random_range(self.min..=self.max)
        };
        raw.saturating_add(self.padding)
    }

    /// Whether `value` could have been produced by [`sample`](Self::sample).
    pub const fn contains(&self, value: u32) -> bool {
        value >= self.min.saturating_add(self.padding)
            && value <= self.max.saturating_add(self.padding)
    }
}

/// Structural position of cell `index` in a grid with `columns` per row.
pub const fn position(index: u32, columns: u32) -> (u32, u32) {
    match (index.checked_div(columns), index.checked_rem(columns)) {
        (Some(row), Some(col)) => (row, col),
        _ => (0, index),
    }
}

/// Produces target layouts for each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridGenerator {
    target_count: u32,
    columns: u32,
    danger_rows: u32,
    top: OffsetRange,
    left: OffsetRange,
}

impl GridGenerator {
    /// Build a generator from grid configuration. A zero column count is
    /// treated as one column.
    pub fn new(config: &GridConfig) -> Self {
        Self {
            target_count: config.target_count,
            columns: config.columns.max(1),
            danger_rows: config.danger_rows,
            top: config.top_offset,
            left: config.left_offset,
        }
    }

    /// Shape of the click space.
    pub const fn layout(&self) -> GridLayout {
        GridLayout {
            columns: self.columns,
            target_rows: self.target_count.div_ceil(self.columns),
            danger_rows: self.danger_rows,
        }
    }

    /// Generate a fresh set of target cells.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<GridCell> {
        (0..self.target_count)
            .map(|id| {
                let (row, col) = position(id, self.columns);
                GridCell {
                    id,
                    row,
                    col,
                    kind: CellKind::Target,
                    offset: CellOffset {
                        top: self.top.sample(rng),
                        left: self.left.sample(rng),
                    },
                }
            })
            .collect()
    }

    /// Classify a click coordinate against the current targets.
    ///
    /// A coordinate holding a live target is [`CellKind::Target`]. A
    /// coordinate inside the danger band is [`CellKind::Danger`].
    /// Anything else is [`CellKind::Empty`].
    pub fn classify(&self, targets: &[GridCell], row: u32, col: u32) -> CellKind {
        if targets
            .iter()
            .any(|cell| cell.kind == CellKind::Target && cell.row == row && cell.col == col)
        {
            return CellKind::Target;
        }
        let layout = self.layout();
        if col < layout.columns && row >= layout.danger_start() && row < layout.danger_end() {
            return CellKind::Danger;
        }
        CellKind::Empty
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn generator() -> GridGenerator {
        GridGenerator::new(&GridConfig::default())
    }

    #[test]
    fn generates_configured_count() {
        let mut rng = SmallRng::seed_from_u64(1);
        let grid = generator().generate(&mut rng);
        assert_eq!(grid.len(), 20);
        assert!(grid.iter().all(|c| c.kind == CellKind::Target));
    }

    #[test]
    fn structural_positions_follow_index() {
        let mut rng = SmallRng::seed_from_u64(2);
        let grid = generator().generate(&mut rng);
        for (index, cell) in grid.iter().enumerate() {
            let index = u32::try_from(index).unwrap();
            assert_eq!(cell.id, index);
            assert_eq!(cell.row, index / 10);
            assert_eq!(cell.col, index % 10);
        }
    }

    #[test]
    fn structure_is_independent_of_randomness() {
        let grid_gen = generator();
        let a = grid_gen.generate(&mut SmallRng::seed_from_u64(10));
        let b = grid_gen.generate(&mut SmallRng::seed_from_u64(99));
        let shape = |g: &[GridCell]| g.iter().map(|c| (c.id, c.row, c.col)).collect::<Vec<_>>();
        assert_eq!(shape(&a), shape(&b));
    }

    #[test]
    fn offsets_stay_within_padded_ranges() {
        let config = GridConfig::default();
        let grid_gen = GridGenerator::new(&config);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..50 {
            for cell in grid_gen.generate(&mut rng) {
                assert!(config.top_offset.contains(cell.offset.top), "{cell:?}");
                assert!(config.left_offset.contains(cell.offset.left), "{cell:?}");
            }
        }
    }

    #[test]
    fn same_seed_same_offsets() {
        let grid_gen = generator();
        let a = grid_gen.generate(&mut SmallRng::seed_from_u64(5));
        let b = grid_gen.generate(&mut SmallRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_range_returns_min_plus_padding() {
        let range = OffsetRange {
            min: 7,
            max: 7,
            padding: 3,
        };
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(range.sample(&mut rng), 10);
    }

    #[test]
    fn partial_last_row() {
        let config = GridConfig {
            target_count: 7,
            columns: 3,
            ..GridConfig::default()
        };
        let grid_gen = GridGenerator::new(&config);
        let grid = grid_gen.generate(&mut SmallRng::seed_from_u64(0));
        assert_eq!(grid.len(), 7);
        assert_eq!((grid[6].row, grid[6].col), (2, 0));
        assert_eq!(grid_gen.layout().target_rows, 3);
        assert_eq!(grid_gen.layout().danger_start(), 3);
    }

    #[test]
    fn classify_zones() {
        let grid_gen = generator();
        let grid = grid_gen.generate(&mut SmallRng::seed_from_u64(4));

        assert_eq!(grid_gen.classify(&grid, 0, 3), CellKind::Target);
        assert_eq!(grid_gen.classify(&grid, 1, 9), CellKind::Target);
        assert_eq!(grid_gen.classify(&grid, 2, 0), CellKind::Danger);
        assert_eq!(grid_gen.classify(&grid, 3, 9), CellKind::Danger);
        assert_eq!(grid_gen.classify(&grid, 4, 0), CellKind::Empty);
        assert_eq!(grid_gen.classify(&grid, 2, 10), CellKind::Empty);
        assert_eq!(grid_gen.classify(&grid, 0, 10), CellKind::Empty);
    }

    #[test]
    fn classify_without_targets_never_hits_target() {
        let grid_gen = generator();
        assert_eq!(grid_gen.classify(&[], 0, 0), CellKind::Empty);
        assert_eq!(grid_gen.classify(&[], 2, 0), CellKind::Danger);
    }

    #[test]
    fn position_guards_zero_columns() {
        assert_eq!(position(5, 0), (0, 5));
        assert_eq!(position(13, 10), (1, 3));
    }
}
