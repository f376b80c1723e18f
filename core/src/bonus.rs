use alloc::vec::Vec;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::*;

bitflags! {
    /// One bit per creditable line: rows, then columns, then both diagonals.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Lines: u16 {
        const ROW_0 = 1 << 0;
        const ROW_1 = 1 << 1;
        const ROW_2 = 1 << 2;
        const ROW_3 = 1 << 3;
        const ROW_4 = 1 << 4;
        const COL_0 = 1 << 5;
        const COL_1 = 1 << 6;
        const COL_2 = 1 << 7;
        const COL_3 = 1 << 8;
        const COL_4 = 1 << 9;
        const MAIN_DIAGONAL = 1 << 10;
        const ANTI_DIAGONAL = 1 << 11;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusLine {
    Row(Coord),
    Column(Coord),
    MainDiagonal,
    AntiDiagonal,
}

impl BonusLine {
    pub fn all() -> impl Iterator<Item = BonusLine> {
        (0..BOARD_SIZE)
            .map(BonusLine::Row)
            .chain((0..BOARD_SIZE).map(BonusLine::Column))
            .chain([BonusLine::MainDiagonal, BonusLine::AntiDiagonal])
    }

    pub fn flag(self) -> Lines {
        let bit = match self {
            Self::Row(row) => u16::from(row),
            Self::Column(col) => u16::from(BOARD_SIZE) + u16::from(col),
            Self::MainDiagonal => 2 * u16::from(BOARD_SIZE),
            Self::AntiDiagonal => 2 * u16::from(BOARD_SIZE) + 1,
        };
        Lines::from_bits_retain(1 << bit)
    }

    pub const fn is_diagonal(self) -> bool {
        matches!(self, Self::MainDiagonal | Self::AntiDiagonal)
    }

    pub fn cells(self) -> impl Iterator<Item = Coord2> {
        let last = BOARD_SIZE - 1;
        (0..BOARD_SIZE).map(move |i| match self {
            Self::Row(row) => (row, i),
            Self::Column(col) => (i, col),
            Self::MainDiagonal => (i, i),
            Self::AntiDiagonal => (i, last - i),
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusAward {
    pub line: BonusLine,
    pub bonus: i32,
}

/// Lines already paid out. Bits are only ever set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusTracker {
    credited: Lines,
}

impl BonusTracker {
    pub fn new() -> Self {
        Self {
            credited: Lines::empty(),
        }
    }

    pub fn credited(&self) -> Lines {
        self.credited
    }

    pub fn is_credited(&self, line: BonusLine) -> bool {
        self.credited.contains(line.flag())
    }

    /// Credit every fully opened line not paid yet.
    pub fn check(&mut self, board: &Board, rules: &RuleSet) -> Vec<BonusAward> {
        if !rules.bonus_lines {
            return Vec::new();
        }

        let mut awards = Vec::new();
        for line in BonusLine::all() {
            if self.is_credited(line) || !line.cells().all(|coords| board[coords].opened) {
                continue;
            }
            self.credited.insert(line.flag());
            let bonus = if line.is_diagonal() {
                rules.diagonal_bonus
            } else {
                rules.line_bonus
            };
            log::debug!("Completed {line:?}, bonus {bonus}");
            awards.push(BonusAward { line, bonus });
        }
        awards
    }
}

impl Default for BonusTracker {
    fn default() -> Self {
        Self::new()
    }
}
