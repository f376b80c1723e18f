use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Positions to flash after a reveal.
pub type Highlights = SmallVec<[Coord2; 8]>;

/// What the revealed cell's surroundings told the player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyHint {
    pub has_five_neighbor: bool,
    pub has_king_neighbor: bool,
}

/// Knowledge accumulated from reveals.
///
/// `no_five_cells` only grows: a position lands there once some reveal proves
/// it cannot hold a rank 5.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HintState {
    five_adjacency: BTreeMap<Coord2, bool>,
    no_five_cells: BTreeSet<Coord2>,
}

impl HintState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reveal of `coords` on `board` and extend the exclusion set.
    pub fn record_reveal(&mut self, board: &Board, coords: Coord2) -> AdjacencyHint {
        let hint = AdjacencyHint {
            has_five_neighbor: board.has_five_neighbor(coords),
            has_king_neighbor: board.has_king_neighbor(coords),
        };

        if hint.has_five_neighbor {
            // cells shared with a five-free site cannot be the five we just sensed
            let around: SmallVec<[Coord2; 8]> = board.iter_neighbors(coords).collect();
            for (&other, &other_has_five) in &self.five_adjacency {
                if other == coords || other_has_five {
                    continue;
                }
                for pos in board.iter_neighbors(other) {
                    if around.contains(&pos) {
                        self.no_five_cells.insert(pos);
                    }
                }
            }
        } else {
            for pos in board.iter_neighbors(coords) {
                if !board[pos].revealed {
                    self.no_five_cells.insert(pos);
                }
            }
        }

        self.five_adjacency.insert(coords, hint.has_five_neighbor);
        log::trace!(
            "Reveal at {coords:?}: five nearby {}, {} cells excluded",
            hint.has_five_neighbor,
            self.no_five_cells.len()
        );
        hint
    }

    /// Whether the cell at `coords` had a rank-5 neighbor when it was revealed.
    pub fn five_adjacency(&self, coords: Coord2) -> Option<bool> {
        self.five_adjacency.get(&coords).copied()
    }

    pub fn no_five_cells(&self) -> &BTreeSet<Coord2> {
        &self.no_five_cells
    }

    pub fn excludes_five(&self, coords: Coord2) -> bool {
        self.no_five_cells.contains(&coords)
    }
}

/// Neighbors of `coords` holding a rank 5 or the King.
pub fn highlight_positions(board: &Board, coords: Coord2) -> Highlights {
    board
        .iter_neighbors(coords)
        .filter(|&pos| {
            let value = board[pos].value;
            value.is_five() || value.is_king()
        })
        .collect()
}

/// Values of the face-down neighbors of `coords`.
pub fn peek_neighbors(board: &Board, coords: Coord2) -> Vec<(Coord2, CellValue)> {
    board
        .neighbors(coords)
        .into_iter()
        .filter(|(_, cell)| !cell.opened)
        .map(|(pos, cell)| (pos, cell.value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::board_with;

    fn reveal(board: &mut Board, hints: &mut HintState, coords: Coord2) -> AdjacencyHint {
        board.open(coords);
        hints.record_reveal(board, coords)
    }

    #[test]
    fn five_free_reveal_excludes_hidden_neighbors() {
        let mut board = board_with(&[((4, 4), CellValue::FIVE)]);
        let mut hints = HintState::new();

        reveal(&mut board, &mut hints, (0, 1));
        let hint = reveal(&mut board, &mut hints, (0, 0));

        assert!(!hint.has_five_neighbor);
        assert_eq!(hints.five_adjacency((0, 0)), Some(false));
        assert!(hints.excludes_five((1, 0)));
        assert!(hints.excludes_five((1, 1)));
        // excluded by the earlier reveal of (0, 1)
        assert!(hints.excludes_five((0, 0)));
        assert!(!hints.excludes_five((4, 4)));
    }

    #[test]
    fn five_sighting_back_propagates_through_shared_neighbors() {
        let mut board = board_with(&[((2, 4), CellValue::FIVE)]);
        let mut hints = HintState::new();

        reveal(&mut board, &mut hints, (1, 2));
        // (1, 2) is already face-up, so this five-free reveal skips it
        reveal(&mut board, &mut hints, (1, 1));
        assert!(!hints.excludes_five((1, 2)));
        let before = hints.no_five_cells().clone();

        // (1, 3) senses the five at (2, 4); what it shares with (1, 1) is clear
        let hint = reveal(&mut board, &mut hints, (1, 3));
        assert!(hint.has_five_neighbor);

        assert!(hints.no_five_cells().is_superset(&before));
        assert!(hints.excludes_five((1, 2)));
        assert!(hints.excludes_five((2, 2)));
        assert!(!hints.excludes_five((2, 4)));
        assert!(!hints.excludes_five((0, 4)));
    }

    #[test]
    fn exclusions_never_shrink() {
        let mut board = board_with(&[((0, 0), CellValue::FIVE), ((3, 3), CellValue::FIVE)]);
        let mut hints = HintState::new();
        let mut previous = 0;

        for coords in [(4, 0), (2, 2), (1, 1), (4, 4), (0, 4)] {
            reveal(&mut board, &mut hints, coords);
            assert!(hints.no_five_cells().len() >= previous);
            previous = hints.no_five_cells().len();
        }
        assert!(!hints.excludes_five((0, 0)));
        assert!(!hints.excludes_five((3, 3)));
    }

    #[test]
    fn highlights_point_at_fives_and_king() {
        let board = board_with(&[
            ((0, 0), CellValue::FIVE),
            ((1, 1), CellValue::King),
            ((2, 2), CellValue::Rank(4)),
        ]);

        let highlights = highlight_positions(&board, (0, 1));
        assert_eq!(highlights.as_slice(), &[(0, 0), (1, 1)]);
        assert!(highlight_positions(&board, (4, 4)).is_empty());
    }

    #[test]
    fn peek_skips_open_neighbors() {
        let mut board = board_with(&[((0, 1), CellValue::Rank(2)), ((1, 0), CellValue::Trap)]);
        board.open((0, 1));

        let peeked = peek_neighbors(&board, (0, 0));
        assert_eq!(
            peeked,
            [((1, 0), CellValue::Trap), ((1, 1), CellValue::Neutral)]
        );
    }
}
