use alloc::vec::Vec;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// One entry of the prediction panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prediction {
    /// The cell has been seen; this is its true value.
    Known(CellValue),
    /// A cosmetic guess for a cell never seen.
    Guess(CellValue),
}

impl Prediction {
    pub const fn value(self) -> CellValue {
        match self {
            Self::Known(value) | Self::Guess(value) => value,
        }
    }

    pub const fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }
}

pub type PredictionGrid = Array2<Prediction>;

/// Fill the prediction panel.
///
/// Unseen cells draw without replacement from the values not yet revealed,
/// so the guesses add up to the board's multiset. Cells in the exclusion set
/// draw first and avoid rank 5 while anything else is left in the pool.
pub fn predict<R: Rng>(board: &Board, hints: &HintState, rng: &mut R) -> PredictionGrid {
    let size = usize::from(BOARD_SIZE);
    let mut grid = Array2::from_elem((size, size), Prediction::Guess(CellValue::Neutral));

    let mut pool: Vec<CellValue> = Vec::new();
    let mut excluded: Vec<Coord2> = Vec::new();
    let mut open: Vec<Coord2> = Vec::new();

    for (coords, cell) in board.iter() {
        if cell.revealed {
            grid[coords.to_nd_index()] = Prediction::Known(cell.value);
            continue;
        }
        pool.push(cell.value);
        if hints.excludes_five(coords) {
            excluded.push(coords);
        } else {
            open.push(coords);
        }
    }

    for coords in excluded {
        if let Some(value) = take_from_pool(&mut pool, true, rng) {
            grid[coords.to_nd_index()] = Prediction::Guess(value);
        }
    }
    for coords in open {
        if let Some(value) = take_from_pool(&mut pool, false, rng) {
            grid[coords.to_nd_index()] = Prediction::Guess(value);
        }
    }

    grid
}

fn take_from_pool<R: Rng>(
    pool: &mut Vec<CellValue>,
    avoid_five: bool,
    rng: &mut R,
) -> Option<CellValue> {
    if pool.is_empty() {
        return None;
    }

    if avoid_five {
        let candidates: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_five())
            .map(|(idx, _)| idx)
            .collect();
        if !candidates.is_empty() {
            let pick = candidates[rng.random_range(0..candidates.len())];
            return Some(pool.swap_remove(pick));
        }
    }

    let pick = rng.random_range(0..pool.len());
    Some(pool.swap_remove(pick))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::board_with;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn sorted(values: impl Iterator<Item = CellValue>) -> Vec<CellValue> {
        let mut values: Vec<_> = values.collect();
        values.sort();
        values
    }

    #[test]
    fn revealed_cells_show_their_value() {
        let mut board = board_with(&[((1, 1), CellValue::Rank(4))]);
        board.open((1, 1));
        let hints = HintState::new();

        let grid = predict(&board, &hints, &mut SmallRng::seed_from_u64(3));

        assert_eq!(grid[[1, 1]], Prediction::Known(CellValue::Rank(4)));
        assert_eq!(grid.iter().filter(|p| p.is_known()).count(), 1);
    }

    #[test]
    fn guesses_use_the_unrevealed_multiset() {
        let config = VariantConfig::canonical();
        let mut board = Board::from_values(&config.board_values).unwrap();
        board.open((0, 0));
        board.open((3, 2));
        let hints = HintState::new();

        let grid = predict(&board, &hints, &mut SmallRng::seed_from_u64(11));

        assert_eq!(sorted(grid.iter().map(|p| p.value())), sorted(board.values()));
    }

    #[test]
    fn excluded_cells_avoid_five_when_possible() {
        let mut board = board_with(&[((4, 4), CellValue::FIVE), ((4, 3), CellValue::FIVE)]);
        let mut hints = HintState::new();
        board.open((0, 0));
        hints.record_reveal(&board, (0, 0));

        for seed in 0..32 {
            let grid = predict(&board, &hints, &mut SmallRng::seed_from_u64(seed));
            for coords in [(0, 1), (1, 0), (1, 1)] {
                assert_ne!(grid[coords.to_nd_index()].value(), CellValue::FIVE);
            }
        }
    }

    #[test]
    fn excluded_cell_leaves_the_five_to_others() {
        let mut values = alloc::vec![CellValue::Rank(1); CELL_COUNT];
        values[24] = CellValue::FIVE;
        let mut board = Board::from_values(&values).unwrap();
        let mut hints = HintState::new();

        for coords in iter_coords().filter(|&c| c != (3, 3) && c != (4, 4)) {
            board.open(coords);
        }
        // (2, 2) has no five next to it, so (3, 3) is excluded
        hints.record_reveal(&board, (2, 2));
        assert!(hints.excludes_five((3, 3)));

        let grid = predict(&board, &hints, &mut SmallRng::seed_from_u64(5));
        assert_eq!(grid[[3, 3]], Prediction::Guess(CellValue::Rank(1)));
        assert_eq!(grid[[4, 4]], Prediction::Guess(CellValue::FIVE));
    }

    #[test]
    fn avoiding_five_falls_back_when_only_fives_remain() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut pool = alloc::vec![CellValue::FIVE];

        assert_eq!(take_from_pool(&mut pool, true, &mut rng), Some(CellValue::FIVE));
        assert_eq!(take_from_pool(&mut pool, true, &mut rng), None);
    }
}
