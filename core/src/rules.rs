use serde::{Deserialize, Serialize};

use crate::*;

/// Score table and rule switches. Every field toggles or tunes exactly one
/// branch of [`resolve`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Card that matches the King cell.
    pub king_key: Card,
    pub king_bonus: i32,
    /// Pay `king_last_card_bonus` instead of `king_bonus` when the matching
    /// card was the last one in hand.
    pub king_last_card_rule: bool,
    pub king_last_card_bonus: i32,
    pub king_miss_delta: i32,
    /// Resolving the King ends the game.
    pub king_terminal: bool,
    /// Cards below 5 burn next to a rank-5 cell while a 5 is still in hand.
    pub burn_rule: bool,
    /// The rank-5 card burns next to a rank-5 cell and pays `five_bonus` elsewhere.
    pub five_rule: bool,
    pub five_bonus: i32,
    pub lower_delta: i32,
    pub equal_bonus: i32,
    pub higher_bonus: i32,
    /// A card above the cell rank goes back to the deck and the cell re-closes.
    pub reuse_rule: bool,
    /// Trap cells are allowed on the board and pay `trap_delta`.
    pub traps: bool,
    pub trap_delta: i32,
    pub bonus_lines: bool,
    pub line_bonus: i32,
    pub diagonal_bonus: i32,
}

impl RuleSet {
    pub const fn canonical() -> Self {
        Self {
            king_key: Card::King,
            king_bonus: 150,
            king_last_card_rule: true,
            king_last_card_bonus: 300,
            king_miss_delta: 0,
            king_terminal: true,
            burn_rule: true,
            five_rule: true,
            five_bonus: 50,
            lower_delta: 0,
            equal_bonus: 10,
            higher_bonus: 10,
            reuse_rule: true,
            traps: true,
            trap_delta: -5,
            bonus_lines: true,
            line_bonus: 20,
            diagonal_bonus: 100,
        }
    }

    /// Two-skull rules: the 5 card finds the King, plain ±1 rank scoring.
    pub const fn skulls() -> Self {
        Self {
            king_key: Card::FIVE,
            king_bonus: 10,
            king_last_card_rule: false,
            king_last_card_bonus: 0,
            king_miss_delta: -5,
            king_terminal: true,
            burn_rule: false,
            five_rule: false,
            five_bonus: 0,
            lower_delta: -1,
            equal_bonus: 0,
            higher_bonus: 1,
            reuse_rule: false,
            traps: true,
            trap_delta: -5,
            bonus_lines: false,
            line_bonus: 0,
            diagonal_bonus: 0,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Facts about the turn the rule table needs beyond the card and the cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleContext {
    pub has_five_neighbor: bool,
    /// A rank-5 card is still in hand after this draw.
    pub holds_five: bool,
    /// This draw emptied the hand.
    pub last_card: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    KingMatched { last_card: bool },
    KingMissed,
    Trap,
    Burned,
    FiveBonus,
    Lower,
    Tie,
    Higher,
    /// The King card spent on an ordinary cell.
    KingCardWasted,
    Neutral,
}

impl Resolution {
    pub const fn label(self) -> &'static str {
        use Resolution::*;
        match self {
            KingMatched { last_card: true } => "King found with the very last card",
            KingMatched { last_card: false } => "King found with the right card",
            KingMissed => "King opened with the wrong card",
            Trap => "Skull",
            Burned => "Burned next to a 5",
            FiveBonus => "Clean 5",
            Lower => "Card too low",
            Tie => "Tie",
            Higher => "Card higher",
            KingCardWasted => "King card wasted",
            Neutral => "Neutral cell",
        }
    }

    pub const fn tone(self) -> Tone {
        use Resolution::*;
        match self {
            KingMatched { .. } => Tone::Gold,
            KingMissed => Tone::Danger,
            Trap => Tone::Dark,
            FiveBonus | Higher => Tone::Good,
            Lower | KingCardWasted => Tone::Warning,
            Burned | Tie => Tone::Muted,
            Neutral => Tone::Plain,
        }
    }
}

/// Display classification of a resolved cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Gold,
    Danger,
    Dark,
    Good,
    Warning,
    Muted,
    Plain,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub resolution: Resolution,
    pub delta: i32,
    /// Return the card to the deck.
    pub reuse: bool,
    /// Close the cell again after the display delay.
    pub reclose: bool,
    pub resolves_king: bool,
}

impl Verdict {
    const fn settled(resolution: Resolution, delta: i32) -> Self {
        Self {
            resolution,
            delta,
            reuse: false,
            reclose: false,
            resolves_king: false,
        }
    }
}

/// The rule table. Total and deterministic over its inputs.
pub fn resolve(rules: &RuleSet, card: Card, value: CellValue, ctx: RuleContext) -> Verdict {
    match value {
        CellValue::King => {
            let mut verdict = if card == rules.king_key {
                let last_card = ctx.last_card && rules.king_last_card_rule;
                let bonus = if last_card {
                    rules.king_last_card_bonus
                } else {
                    rules.king_bonus
                };
                Verdict::settled(Resolution::KingMatched { last_card }, bonus)
            } else {
                Verdict::settled(Resolution::KingMissed, rules.king_miss_delta)
            };
            verdict.resolves_king = true;
            verdict
        }
        CellValue::Trap if rules.traps => Verdict::settled(Resolution::Trap, rules.trap_delta),
        CellValue::Trap => Verdict::settled(Resolution::Neutral, 0),
        CellValue::Neutral => Verdict::settled(Resolution::Neutral, 0),
        CellValue::Rank(rank) => {
            let Card::Rank(played) = card else {
                return Verdict::settled(Resolution::KingCardWasted, 0);
            };
            resolve_rank(rules, played, rank, ctx)
        }
    }
}

fn resolve_rank(rules: &RuleSet, played: u8, rank: u8, ctx: RuleContext) -> Verdict {
    if rules.five_rule && played == MAX_RANK {
        return if ctx.has_five_neighbor {
            Verdict::settled(Resolution::Burned, 0)
        } else {
            Verdict::settled(Resolution::FiveBonus, rules.five_bonus)
        };
    }

    if rules.burn_rule && played < MAX_RANK && ctx.holds_five && ctx.has_five_neighbor {
        return Verdict::settled(Resolution::Burned, 0);
    }

    match played.cmp(&rank) {
        core::cmp::Ordering::Less => Verdict::settled(Resolution::Lower, rules.lower_delta),
        core::cmp::Ordering::Equal => Verdict::settled(Resolution::Tie, rules.equal_bonus),
        core::cmp::Ordering::Greater => Verdict {
            resolution: Resolution::Higher,
            delta: rules.higher_bonus,
            reuse: rules.reuse_rule,
            reclose: rules.reuse_rule,
            resolves_king: false,
        },
    }
}
