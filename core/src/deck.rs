use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed automatic play order plus the per-card counts still in hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    sequence: Vec<Card>,
    remaining: CardCounts,
    initial_total: u16,
    cursor: usize,
    last_drawn: Option<Card>,
}

impl Deck {
    /// Deck whose counts are exactly the sequence occurrences.
    pub fn from_sequence(sequence: Vec<Card>) -> Result<Self> {
        let remaining = CardCounts::from_cards(&sequence)?;
        Self::new(sequence, remaining)
    }

    /// Deck with explicit counts. A count may be lower than the number of
    /// occurrences in `sequence` (the surplus entries are skipped), never higher.
    pub fn new(sequence: Vec<Card>, remaining: CardCounts) -> Result<Self> {
        let available = CardCounts::from_cards(&sequence)?;
        for (card, limit) in remaining.iter() {
            if limit > available[card] {
                return Err(GameError::CardLimitExceeded {
                    card,
                    limit,
                    available: available[card],
                });
            }
        }

        if remaining.is_empty() {
            return Err(GameError::EmptyDeck);
        }

        Ok(Self {
            sequence,
            initial_total: remaining.total(),
            remaining,
            cursor: 0,
            last_drawn: None,
        })
    }

    /// Next usable card in sequence order, or `None` once the sequence is spent.
    pub fn draw_next(&mut self) -> Option<Card> {
        while let Some(&card) = self.sequence.get(self.cursor) {
            self.cursor += 1;
            if self.remaining[card] > 0 {
                self.remaining[card] -= 1;
                self.last_drawn = Some(card);
                return Some(card);
            }
        }
        self.last_drawn = None;
        None
    }

    /// Put the most recently drawn card back so the next draw yields it again.
    ///
    /// Only the last draw can be returned, and only once.
    pub fn reuse(&mut self) -> Option<Card> {
        let card = self.last_drawn.take()?;
        self.remaining[card] += 1;
        self.cursor = self.cursor.saturating_sub(1);
        Some(card)
    }

    pub fn remaining(&self, card: Card) -> u8 {
        self.remaining[card]
    }

    pub fn remaining_counts(&self) -> CardCounts {
        self.remaining
    }

    pub fn total_remaining(&self) -> u16 {
        self.remaining.total()
    }

    pub fn initial_total(&self) -> u16 {
        self.initial_total
    }

    /// Cards drawn and not returned.
    pub fn consumed(&self) -> u16 {
        self.initial_total.saturating_sub(self.total_remaining())
    }

    pub fn holds_five(&self) -> bool {
        self.remaining[Card::FIVE] > 0
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn cards(tokens: &[&str]) -> Vec<Card> {
        tokens.iter().map(|token| token.parse().unwrap()).collect()
    }

    #[test]
    fn draws_in_sequence_order() {
        let mut deck = Deck::from_sequence(cards(&["1", "1", "2", "K"])).unwrap();

        assert_eq!(deck.draw_next(), Some(Card::Rank(1)));
        assert_eq!(deck.draw_next(), Some(Card::Rank(1)));
        assert_eq!(deck.draw_next(), Some(Card::Rank(2)));
        assert_eq!(deck.draw_next(), Some(Card::King));
        assert_eq!(deck.draw_next(), None);
        assert!(deck.is_exhausted());
    }

    #[test]
    fn skips_exhausted_entries() {
        let sequence = cards(&["1", "1", "1", "3"]);
        let mut limits = CardCounts::from_cards(&sequence).unwrap();
        limits[Card::Rank(1)] = 1;
        let mut deck = Deck::new(sequence, limits).unwrap();

        assert_eq!(deck.draw_next(), Some(Card::Rank(1)));
        assert_eq!(deck.draw_next(), Some(Card::Rank(3)));
        assert_eq!(deck.cursor(), 4);
        assert_eq!(deck.draw_next(), None);
    }

    #[test]
    fn reuse_returns_the_same_card_once() {
        let mut deck = Deck::from_sequence(cards(&["2", "3"])).unwrap();

        assert_eq!(deck.draw_next(), Some(Card::Rank(2)));
        assert_eq!(deck.reuse(), Some(Card::Rank(2)));
        assert_eq!(deck.reuse(), None);
        assert_eq!(deck.remaining(Card::Rank(2)), 1);
        assert_eq!(deck.total_remaining(), 2);

        assert_eq!(deck.draw_next(), Some(Card::Rank(2)));
        assert_eq!(deck.draw_next(), Some(Card::Rank(3)));
    }

    #[test]
    fn reuse_before_any_draw_is_a_no_op() {
        let mut deck = Deck::from_sequence(cards(&["4"])).unwrap();
        assert_eq!(deck.reuse(), None);
        assert_eq!(deck.cursor(), 0);
        assert_eq!(deck.total_remaining(), 1);
    }

    #[test]
    fn conservation_holds_across_draws_and_reuse() {
        let mut deck = Deck::from_sequence(cards(&["1", "1", "2", "5"])).unwrap();
        let mut kept = 0;

        for step in 0..6 {
            if deck.draw_next().is_none() {
                break;
            }
            if step % 2 == 0 {
                deck.reuse();
            } else {
                kept += 1;
            }
            assert_eq!(deck.total_remaining() + kept, deck.initial_total());
            assert_eq!(deck.consumed(), kept);
        }
    }

    #[test]
    fn rejects_limits_beyond_the_sequence() {
        let sequence = cards(&["1", "2"]);
        let mut limits = CardCounts::from_cards(&sequence).unwrap();
        limits[Card::Rank(2)] = 3;

        assert_eq!(
            Deck::new(sequence, limits),
            Err(GameError::CardLimitExceeded {
                card: Card::Rank(2),
                limit: 3,
                available: 1
            })
        );
    }

    #[test]
    fn rejects_empty_deck() {
        assert_eq!(Deck::from_sequence(vec![]), Err(GameError::EmptyDeck));
    }
}
