use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Up to eight neighbors, inline.
pub type Neighbors = SmallVec<[(Coord2, Cell); 8]>;

/// The 5×5 grid of hidden cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    /// Lays `values` out in row-major order.
    pub fn from_values(values: &[CellValue]) -> Result<Self> {
        if values.len() != CELL_COUNT {
            return Err(GameError::InvalidBoardSize {
                expected: CELL_COUNT,
                actual: values.len(),
            });
        }

        let cells = values
            .iter()
            .map(|&value| value.validate().map(Cell::new))
            .collect::<Result<Vec<_>>>()?;

        let kings = values.iter().filter(|value| value.is_king()).count();
        if kings > 1 {
            log::warn!("Board holds {kings} Kings, only the first resolved one matters");
        }

        let size = usize::from(BOARD_SIZE);
        let cells = Array2::from_shape_vec((size, size), cells).map_err(|_| {
            GameError::InvalidBoardSize {
                expected: CELL_COUNT,
                actual: values.len(),
            }
        })?;

        Ok(Self { cells })
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    pub fn value_at(&self, coords: Coord2) -> CellValue {
        self[coords].value
    }

    /// Cells in row-major order with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        iter_coords().map(|coords| (coords, self[coords]))
    }

    pub fn values(&self) -> impl Iterator<Item = CellValue> + '_ {
        self.cells.iter().map(|cell| cell.value)
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// The 8-neighborhood of `coords`, clipped at the board edges.
    pub fn neighbors(&self, coords: Coord2) -> Neighbors {
        self.iter_neighbors(coords)
            .map(|pos| (pos, self[pos]))
            .collect()
    }

    pub fn has_five_neighbor(&self, coords: Coord2) -> bool {
        self.iter_neighbors(coords)
            .any(|pos| self[pos].value.is_five())
    }

    pub fn has_king_neighbor(&self, coords: Coord2) -> bool {
        self.iter_neighbors(coords)
            .any(|pos| self[pos].value.is_king())
    }

    pub fn king_position(&self) -> Option<Coord2> {
        self.iter()
            .find(|(_, cell)| cell.value.is_king())
            .map(|(coords, _)| coords)
    }

    pub fn king_revealed(&self) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.value.is_king() && cell.revealed)
    }

    pub fn contains_traps(&self) -> bool {
        self.values().any(|value| value == CellValue::Trap)
    }

    pub fn opened_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.opened).count()
    }

    /// Face the cell up; returns the previous state.
    pub(crate) fn open(&mut self, coords: Coord2) -> Cell {
        let cell = &mut self[coords];
        let before = *cell;
        cell.opened = true;
        cell.revealed = true;
        before
    }

    /// Turn the cell face-down again, keeping `revealed` and `value` untouched.
    pub(crate) fn close(&mut self, coords: Coord2) -> bool {
        let cell = &mut self[coords];
        let was_open = cell.opened;
        cell.opened = false;
        was_open
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
