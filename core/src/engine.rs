use alloc::boxed::Box;
use alloc::vec::Vec;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    DeckExhausted,
    KingResolved,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    InProgress,
    Ended(EndReason),
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Ended(_))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::InProgress
    }
}

/// One played turn, as kept in the history.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub position: Coord2,
    pub card: Card,
    pub value: CellValue,
    pub resolution: Resolution,
    /// Rule payout plus any bonus lines completed by this turn.
    pub score_delta: i32,
}

impl TurnResult {
    pub const fn label(&self) -> &'static str {
        self.resolution.label()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    score: i32,
    history: Vec<TurnResult>,
}

impl Player {
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Every turn in play order.
    pub fn history(&self) -> &[TurnResult] {
        &self.history
    }

    pub fn history_tail(&self, len: usize) -> &[TurnResult] {
        let start = self.history.len().saturating_sub(len);
        &self.history[start..]
    }

    fn record(&mut self, result: TurnResult) {
        self.score += result.score_delta;
        self.history.push(result);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub final_score: i32,
    pub reason: EndReason,
    pub king_found: bool,
    pub turns: usize,
    /// Cells left face-up at the end.
    pub cells_open: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub score: i32,
    pub remaining: CardCounts,
}

/// Everything the presentation layer needs after a played turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub result: TurnResult,
    pub tone: Tone,
    /// Payout of the rule table alone.
    pub rule_delta: i32,
    pub bonus_awards: Vec<BonusAward>,
    /// The card went back to the deck.
    pub reused: bool,
    /// The cell should be closed again after the configured delay.
    pub reclose: bool,
    pub adjacency: AdjacencyHint,
    pub highlights: Highlights,
    pub peeked: Vec<(Coord2, CellValue)>,
    pub history_tail: Vec<TurnResult>,
    pub predictions: PredictionGrid,
    pub ended: Option<GameSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// Cell already open or game over; nothing happened.
    Ignored,
    /// The deck could not yield a card; nothing happened.
    NoCardsAvailable,
    Played(Box<TurnReport>),
}

impl TurnOutcome {
    pub const fn has_update(&self) -> bool {
        matches!(self, Self::Played(_))
    }

    pub fn report(&self) -> Option<&TurnReport> {
        match self {
            Self::Played(report) => Some(report),
            _ => None,
        }
    }
}

/// The turn engine: board, deck, player and derived knowledge for one game.
#[derive(Clone, Debug)]
pub struct Game {
    config: VariantConfig,
    board: Board,
    deck: Deck,
    player: Player,
    hints: HintState,
    bonus: BonusTracker,
    state: GameState,
    predictions: PredictionGrid,
    rng: SmallRng,
}

impl Game {
    /// Validate `config` and deal a shuffled board from `seed`.
    pub fn new(config: VariantConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let board = RandomBoardGenerator::new(seed).generate(&config.board_values)?;
        Self::with_board(config, board, seed)
    }

    /// Start on a fixed layout; `config.board_values` is not consulted.
    pub fn with_board(config: VariantConfig, board: Board, seed: u64) -> Result<Self> {
        if !config.rules.traps && board.contains_traps() {
            return Err(GameError::TrapsDisabled);
        }
        config.rules.king_key.validate()?;
        let deck = config.build_deck()?;

        let mut rng = SmallRng::seed_from_u64(seed.rotate_left(32));
        let hints = HintState::new();
        let predictions = predict(&board, &hints, &mut rng);

        log::debug!(
            "New game: {} cards, King at {:?}",
            deck.initial_total(),
            board.king_position()
        );

        Ok(Self {
            config,
            board,
            deck,
            player: Player::default(),
            hints,
            bonus: BonusTracker::new(),
            state: GameState::InProgress,
            predictions,
            rng,
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn hints(&self) -> &HintState {
        &self.hints
    }

    pub fn bonus(&self) -> &BonusTracker {
        &self.bonus
    }

    pub fn score(&self) -> i32 {
        self.player.score()
    }

    pub fn history(&self) -> &[TurnResult] {
        self.player.history()
    }

    pub fn predictions(&self) -> &PredictionGrid {
        &self.predictions
    }

    pub fn prediction_at(&self, coords: Coord2) -> Result<Prediction> {
        let coords = self.board.validate_coords(coords)?;
        Ok(self.predictions[coords.to_nd_index()])
    }

    pub fn status(&self) -> Status {
        Status {
            score: self.score(),
            remaining: self.deck.remaining_counts(),
        }
    }

    pub fn summary(&self) -> Option<GameSummary> {
        let GameState::Ended(reason) = self.state else {
            return None;
        };
        Some(GameSummary {
            final_score: self.score(),
            reason,
            king_found: self.board.king_revealed(),
            turns: self.player.history().len(),
            cells_open: self.board.opened_count(),
        })
    }

    /// Play the next card against `coords`.
    ///
    /// Selecting an open cell, or anything after the game ended, is not an
    /// error: it yields [`TurnOutcome::Ignored`] and changes nothing.
    pub fn open_cell(&mut self, coords: Coord2) -> Result<TurnOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.state.is_finished()
            || !self.board[coords].is_selectable(self.config.lock_revealed_cells)
        {
            log::trace!("Ignoring selection at {coords:?}");
            return Ok(TurnOutcome::Ignored);
        }

        let Some(card) = self.deck.draw_next() else {
            log::info!("No cards left to play");
            return Ok(TurnOutcome::NoCardsAvailable);
        };

        self.board.open(coords);
        let value = self.board[coords].value;
        let adjacency = self.hints.record_reveal(&self.board, coords);
        let highlights = highlight_positions(&self.board, coords);

        let ctx = RuleContext {
            has_five_neighbor: adjacency.has_five_neighbor,
            holds_five: self.deck.holds_five(),
            last_card: self.deck.is_exhausted(),
        };
        let verdict = resolve(&self.config.rules, card, value, ctx);

        let bonus_awards = self.bonus.check(&self.board, &self.config.rules);
        let score_delta = verdict.delta + bonus_awards.iter().map(|award| award.bonus).sum::<i32>();
        let result = TurnResult {
            position: coords,
            card,
            value,
            resolution: verdict.resolution,
            score_delta,
        };
        self.player.record(result);

        let peeked = if self.config.peek_with_five && card == Card::FIVE {
            peek_neighbors(&self.board, coords)
        } else {
            Vec::new()
        };

        let reused = verdict.reuse && self.deck.reuse().is_some();
        self.refresh_predictions();

        if verdict.resolves_king && self.config.rules.king_terminal {
            self.end_game(EndReason::KingResolved);
        } else if self.deck.is_exhausted() {
            self.end_game(EndReason::DeckExhausted);
        }

        log::debug!(
            "Card {card} on {coords:?} ({value}): {:?}, {score_delta:+}",
            verdict.resolution
        );

        Ok(TurnOutcome::Played(Box::new(TurnReport {
            result,
            tone: verdict.resolution.tone(),
            rule_delta: verdict.delta,
            bonus_awards,
            reused,
            reclose: verdict.reclose && !self.is_finished(),
            adjacency,
            highlights,
            peeked,
            history_tail: self
                .player
                .history_tail(self.config.history_tail_len)
                .to_vec(),
            predictions: self.predictions.clone(),
            ended: self.summary(),
        })))
    }

    /// Turn an open cell face-down again without forgetting it was seen.
    ///
    /// Returns whether anything changed. After the game ended this is a no-op,
    /// so late timers are harmless.
    pub fn close_cell(&mut self, coords: Coord2) -> Result<bool> {
        let coords = self.board.validate_coords(coords)?;

        if self.state.is_finished() || !self.board.close(coords) {
            return Ok(false);
        }

        self.refresh_predictions();
        Ok(true)
    }

    fn refresh_predictions(&mut self) {
        self.predictions = predict(&self.board, &self.hints, &mut self.rng);
    }

    fn end_game(&mut self, reason: EndReason) {
        if self.state.is_finished() {
            return;
        }

        self.state = GameState::Ended(reason);
        log::info!(
            "Game over ({reason:?}): score {}, King {}",
            self.score(),
            if self.board.king_revealed() {
                "found"
            } else {
                "not found"
            }
        );
    }
}
