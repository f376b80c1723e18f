use std::str::FromStr;

use anyhow::{Context, bail};
use kingfind_core::{BOARD_SIZE, Coord, Coord2};

/// A line typed at the prompt. Positions are 1-based on input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Open(Coord2),
    Board,
    Status,
    History,
    Predict,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  <row> <col>        play the next card on a cell (1-5, e.g. `3 4` or `3,4`)
  open <row> <col>   same as above
  board              redraw the board
  status             score and cards left
  history            every turn played so far
  predict            the prediction panel
  help               this text
  quit               leave the game";

fn parse_axis(token: &str) -> anyhow::Result<Coord> {
    let value: Coord = token
        .parse()
        .with_context(|| format!("`{token}` is not a number"))?;
    if value == 0 || value > BOARD_SIZE {
        bail!("`{value}` is outside 1..={BOARD_SIZE}");
    }
    Ok(value - 1)
}

fn parse_position(tokens: &[&str]) -> anyhow::Result<Coord2> {
    match tokens {
        [row, col] => Ok((parse_axis(row)?, parse_axis(col)?)),
        _ => bail!("expected a row and a column"),
    }
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let normalized = line.replace(',', " ");
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let Some((&head, rest)) = tokens.split_first() else {
            bail!("empty command");
        };

        Ok(match head.to_ascii_lowercase().as_str() {
            "open" | "o" => Self::Open(parse_position(rest)?),
            "board" | "b" => Self::Board,
            "status" | "s" => Self::Status,
            "history" | "h" => Self::History,
            "predict" | "p" => Self::Predict,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Open(parse_position(&tokens)?),
        })
    }
}
