use alloc::string::{String, ToString};
use core::fmt;
use core::ops::{Index, IndexMut};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Highest rank a cell or a card can carry.
pub const MAX_RANK: u8 = 5;

/// Number of distinct cards: ranks 1 through 5 plus the King.
pub const CARD_KINDS: usize = MAX_RANK as usize + 1;

const fn check_rank(rank: u8) -> Result<u8> {
    if rank >= 1 && rank <= MAX_RANK {
        Ok(rank)
    } else {
        Err(GameError::InvalidRank(rank))
    }
}

/// Hidden content of a board cell.
///
/// Serialized as a short token: `"1"`..`"5"`, `"K"`, `"X"` (trap) or `"0"` (neutral).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CellValue {
    Rank(u8),
    King,
    Trap,
    Neutral,
}

impl CellValue {
    pub const FIVE: Self = Self::Rank(MAX_RANK);

    pub const fn rank(self) -> Option<u8> {
        match self {
            Self::Rank(rank) => Some(rank),
            _ => None,
        }
    }

    pub const fn is_five(self) -> bool {
        matches!(self, Self::Rank(MAX_RANK))
    }

    pub const fn is_king(self) -> bool {
        matches!(self, Self::King)
    }

    pub const fn validate(self) -> Result<Self> {
        match self {
            Self::Rank(rank) => match check_rank(rank) {
                Ok(_) => Ok(self),
                Err(err) => Err(err),
            },
            _ => Ok(self),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rank(rank) => write!(f, "{rank}"),
            Self::King => f.write_str("K"),
            Self::Trap => f.write_str("X"),
            Self::Neutral => f.write_str("0"),
        }
    }
}

impl FromStr for CellValue {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "K" | "k" => Ok(Self::King),
            "X" | "x" => Ok(Self::Trap),
            "0" => Ok(Self::Neutral),
            other => {
                let rank: u8 = other.parse().map_err(|_| GameError::InvalidValue)?;
                Ok(Self::Rank(check_rank(rank)?))
            }
        }
    }
}

impl TryFrom<String> for CellValue {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CellValue> for String {
    fn from(value: CellValue) -> Self {
        value.to_string()
    }
}

/// A probe card. Serialized as `"1"`..`"5"` or `"K"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Card {
    Rank(u8),
    King,
}

impl Card {
    pub const FIVE: Self = Self::Rank(MAX_RANK);

    /// Checked constructor for a numbered card.
    pub const fn from_rank(rank: u8) -> Result<Self> {
        match check_rank(rank) {
            Ok(rank) => Ok(Self::Rank(rank)),
            Err(err) => Err(err),
        }
    }

    pub const fn rank(self) -> Option<u8> {
        match self {
            Self::Rank(rank) => Some(rank),
            Self::King => None,
        }
    }

    pub const fn validate(self) -> Result<Self> {
        match self {
            Self::Rank(rank) => match check_rank(rank) {
                Ok(_) => Ok(self),
                Err(err) => Err(err),
            },
            Self::King => Ok(self),
        }
    }

    /// Slot in [`CardCounts`]. Out of range for unvalidated ranks.
    const fn slot(self) -> usize {
        match self {
            Self::Rank(rank) => (rank as usize).wrapping_sub(1),
            Self::King => MAX_RANK as usize,
        }
    }

    const fn from_slot(slot: usize) -> Self {
        if slot < MAX_RANK as usize {
            Self::Rank(slot as u8 + 1)
        } else {
            Self::King
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rank(rank) => write!(f, "{rank}"),
            Self::King => f.write_str("K"),
        }
    }
}

impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "K" | "k" => Ok(Self::King),
            other => {
                let rank: u8 = other.parse().map_err(|_| GameError::InvalidValue)?;
                Ok(Self::Rank(check_rank(rank)?))
            }
        }
    }
}

impl TryFrom<String> for Card {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Card> for String {
    fn from(value: Card) -> Self {
        value.to_string()
    }
}

/// Per-card counter, one slot for each rank and one for the King.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCounts([u8; CARD_KINDS]);

impl CardCounts {
    /// Count every card; fails on the first invalid rank.
    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Result<Self> {
        let mut counts = Self::default();
        for &card in cards {
            let card = card.validate()?;
            counts[card] = counts[card].saturating_add(1);
        }
        Ok(counts)
    }

    pub fn total(&self) -> u16 {
        self.0.iter().map(|&count| u16::from(count)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&count| count == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Card, u8)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(slot, &count)| (Card::from_slot(slot), count))
    }
}

/// Panics on a card whose rank is outside `1..=5`.
impl Index<Card> for CardCounts {
    type Output = u8;

    fn index(&self, card: Card) -> &Self::Output {
        debug_assert!(card.validate().is_ok(), "invalid card {card:?}");
        &self.0[card.slot()]
    }
}

impl IndexMut<Card> for CardCounts {
    fn index_mut(&mut self, card: Card) -> &mut Self::Output {
        debug_assert!(card.validate().is_ok(), "invalid card {card:?}");
        &mut self.0[card.slot()]
    }
}

impl fmt::Display for CardCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (card, count)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}:{count}")?;
        }
        Ok(())
    }
}

/// A board cell: hidden value plus its visibility flags.
///
/// `opened` means face-up and locked from selection; it toggles back when a
/// reused card re-closes the cell. `revealed` only ever goes from false to true.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub opened: bool,
    pub revealed: bool,
}

impl Cell {
    pub const fn new(value: CellValue) -> Self {
        Self {
            value,
            opened: false,
            revealed: false,
        }
    }

    pub const fn is_selectable(self, lock_revealed: bool) -> bool {
        !self.opened && !(lock_revealed && self.revealed)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(CellValue::Neutral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cell_tokens() {
        assert_eq!("3".parse::<CellValue>(), Ok(CellValue::Rank(3)));
        assert_eq!("K".parse::<CellValue>(), Ok(CellValue::King));
        assert_eq!("x".parse::<CellValue>(), Ok(CellValue::Trap));
        assert_eq!("0".parse::<CellValue>(), Ok(CellValue::Neutral));
        assert_eq!("6".parse::<CellValue>(), Err(GameError::InvalidRank(6)));
        assert_eq!("?".parse::<CellValue>(), Err(GameError::InvalidValue));
    }

    #[test]
    fn card_tokens_round_trip_through_display() {
        for token in ["1", "2", "3", "4", "5", "K"] {
            let card: Card = token.parse().unwrap();
            assert_eq!(card.to_string(), token);
        }
        assert_eq!("X".parse::<Card>(), Err(GameError::InvalidValue));
    }

    #[test]
    fn card_counts_track_each_kind() {
        let cards = [Card::Rank(1), Card::Rank(1), Card::FIVE, Card::King];
        let counts = CardCounts::from_cards(&cards).unwrap();

        assert_eq!(counts[Card::Rank(1)], 2);
        assert_eq!(counts[Card::Rank(2)], 0);
        assert_eq!(counts[Card::FIVE], 1);
        assert_eq!(counts[Card::King], 1);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.to_string(), "1:2 2:0 3:0 4:0 5:1 K:1");
    }

    #[test]
    fn out_of_range_cards_are_rejected() {
        assert_eq!(Card::from_rank(4), Ok(Card::Rank(4)));
        assert_eq!(Card::from_rank(0), Err(GameError::InvalidRank(0)));
        assert_eq!(Card::from_rank(6), Err(GameError::InvalidRank(6)));

        for bad in [Card::Rank(0), Card::Rank(6), Card::Rank(u8::MAX)] {
            let cards = [Card::Rank(1), bad];
            assert_eq!(
                CardCounts::from_cards(&cards),
                Err(GameError::InvalidRank(bad.rank().unwrap()))
            );
        }
    }

    #[test]
    #[should_panic]
    fn indexing_with_an_invalid_card_panics() {
        let counts = CardCounts::default();
        let _ = counts[Card::Rank(0)];
    }

    #[test]
    fn selectable_respects_revealed_lock() {
        let mut cell = Cell::new(CellValue::Rank(2));
        assert!(cell.is_selectable(true));

        cell.opened = true;
        cell.revealed = true;
        assert!(!cell.is_selectable(false));

        cell.opened = false;
        assert!(cell.is_selectable(false));
        assert!(!cell.is_selectable(true));
    }
}
