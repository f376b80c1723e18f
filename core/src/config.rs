use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::iter::repeat_n;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything that distinguishes one variant of the game from another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantConfig {
    /// Exactly 25 values, shuffled onto the board at game start.
    pub board_values: Vec<CellValue>,
    /// Automatic play order.
    pub deck_sequence: Vec<Card>,
    /// Caps on how many copies of a card may be played; defaults to the
    /// number of occurrences in `deck_sequence`.
    pub card_limits: BTreeMap<Card, u8>,
    pub rules: RuleSet,
    /// Cells once seen stay unselectable even after they re-close.
    pub lock_revealed_cells: bool,
    /// Playing a 5 shows the values of the face-down neighbors.
    pub peek_with_five: bool,
    pub history_tail_len: usize,
    pub reclose_delay_ms: u64,
}

fn values(groups: &[(CellValue, usize)]) -> Vec<CellValue> {
    groups
        .iter()
        .flat_map(|&(value, count)| repeat_n(value, count))
        .collect()
}

fn cards(groups: &[(Card, usize)]) -> Vec<Card> {
    groups
        .iter()
        .flat_map(|&(card, count)| repeat_n(card, count))
        .collect()
}

impl VariantConfig {
    /// Full rule set: burn, reuse, 5-card bonus, bonus lines, King card.
    pub fn canonical() -> Self {
        use CellValue::*;
        Self {
            board_values: values(&[
                (Rank(1), 7),
                (Rank(2), 5),
                (Rank(3), 5),
                (Rank(4), 4),
                (Rank(5), 3),
                (King, 1),
            ]),
            deck_sequence: cards(&[
                (Card::Rank(1), 5),
                (Card::Rank(2), 3),
                (Card::Rank(3), 2),
                (Card::Rank(4), 1),
                (Card::Rank(5), 1),
                (Card::King, 1),
            ]),
            card_limits: BTreeMap::new(),
            rules: RuleSet::canonical(),
            lock_revealed_cells: false,
            peek_with_five: false,
            history_tail_len: 5,
            reclose_delay_ms: 800,
        }
    }

    /// Two skulls on the board, no King card; the 5 finds the King.
    pub fn skulls() -> Self {
        use CellValue::*;
        Self {
            board_values: values(&[
                (Rank(1), 7),
                (Rank(2), 4),
                (Rank(3), 4),
                (Rank(4), 4),
                (Rank(5), 3),
                (King, 1),
                (Trap, 2),
            ]),
            deck_sequence: cards(&[
                (Card::Rank(1), 5),
                (Card::Rank(2), 3),
                (Card::Rank(3), 2),
                (Card::Rank(4), 1),
                (Card::Rank(5), 1),
            ]),
            card_limits: BTreeMap::new(),
            rules: RuleSet::skulls(),
            lock_revealed_cells: false,
            peek_with_five: true,
            history_tail_len: 5,
            reclose_delay_ms: 800,
        }
    }

    pub fn reclose_delay(&self) -> Duration {
        Duration::from_millis(self.reclose_delay_ms)
    }

    /// Reject configurations no game can be started from.
    pub fn validate(&self) -> Result<()> {
        if self.board_values.len() != CELL_COUNT {
            return Err(GameError::InvalidBoardSize {
                expected: CELL_COUNT,
                actual: self.board_values.len(),
            });
        }
        for value in &self.board_values {
            value.validate()?;
        }
        if !self.rules.traps && self.board_values.contains(&CellValue::Trap) {
            return Err(GameError::TrapsDisabled);
        }
        self.rules.king_key.validate()?;
        self.build_deck().map(|_| ())
    }

    pub fn build_deck(&self) -> Result<Deck> {
        let mut counts = CardCounts::from_cards(&self.deck_sequence)?;
        for (&card, &limit) in &self.card_limits {
            counts[card.validate()?] = limit;
        }
        Deck::new(self.deck_sequence.clone(), counts)
    }
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self::canonical()
    }
}
