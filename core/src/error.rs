use thiserror::Error;

use crate::Card;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board needs exactly {expected} values, got {actual}")]
    InvalidBoardSize { expected: usize, actual: usize },
    #[error("Rank {0} is outside 1..=5")]
    InvalidRank(u8),
    #[error("Unrecognized cell or card token")]
    InvalidValue,
    #[error("Deck has no cards to play")]
    EmptyDeck,
    #[error("Card {card} is limited to {limit} but the sequence only holds {available}")]
    CardLimitExceeded { card: Card, limit: u8, available: u8 },
    #[error("Board holds traps but the trap rule is disabled")]
    TrapsDisabled,
}

pub type Result<T> = core::result::Result<T, GameError>;
