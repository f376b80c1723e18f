use std::fmt::Write;

use kingfind_core::*;

pub fn position((row, col): Coord2) -> String {
    format!("({},{})", row + 1, col + 1)
}

fn tone_tag(tone: Tone) -> &'static str {
    match tone {
        Tone::Gold => "gold",
        Tone::Danger => "red",
        Tone::Dark => "black",
        Tone::Good => "green",
        Tone::Warning => "orange",
        Tone::Muted => "gray",
        Tone::Plain => "white",
    }
}

fn shown(value: CellValue) -> String {
    match value {
        CellValue::Neutral => " ".to_string(),
        other => other.to_string(),
    }
}

/// Open cells show their value, seen-but-closed ones show it in parentheses.
pub fn board(game: &Game) -> String {
    let mut out = String::from("    1   2   3   4   5\n");
    for row in 0..BOARD_SIZE {
        let _ = write!(out, "{} ", row + 1);
        for col in 0..BOARD_SIZE {
            let cell = game.board().cell_at((row, col));
            let text = if cell.opened {
                format!("[{}]", shown(cell.value))
            } else if cell.revealed {
                format!("({})", shown(cell.value))
            } else {
                " ? ".to_string()
            };
            let _ = write!(out, "{text:<4}");
        }
        out.push('\n');
    }
    out
}

pub fn status(status: &Status) -> String {
    format!("Score: {} | Cards left: {}", status.score, status.remaining)
}

pub fn turn(result: &TurnResult) -> String {
    format!(
        "{} card {} | cell {} | {} ({:+})",
        position(result.position),
        result.card,
        result.value,
        result.label(),
        result.score_delta
    )
}

pub fn history(entries: &[TurnResult]) -> String {
    let mut out = String::from("History:");
    for entry in entries {
        let _ = write!(out, "\n  {}", turn(entry));
    }
    out
}

pub fn predictions(grid: &PredictionGrid) -> String {
    let mut out = String::from("Prediction:\n");
    for row in grid.rows() {
        for prediction in row {
            let text = match prediction {
                Prediction::Known(value) => format!("[{}]", shown(*value)),
                Prediction::Guess(value) => format!(" {} ", shown(*value)),
            };
            let _ = write!(out, "{text:<4}");
        }
        out.push('\n');
    }
    out
}

pub fn summary(summary: &GameSummary) -> String {
    let king = if summary.king_found {
        "King found!"
    } else {
        "King not found."
    };
    format!(
        "Game over after {} turns ({:?}), {} cells face-up.\nFinal score: {}\n{king}",
        summary.turns, summary.reason, summary.cells_open, summary.final_score
    )
}

pub fn report(report: &TurnReport) -> String {
    let mut out = format!("[{}] {}", tone_tag(report.tone), turn(&report.result));

    for award in &report.bonus_awards {
        let _ = write!(out, "\n  line bonus {:?} +{}", award.line, award.bonus);
    }
    if report.reused {
        let _ = write!(out, "\n  card {} returns to the deck", report.result.card);
    }
    if !report.highlights.is_empty() {
        let cells: Vec<_> = report.highlights.iter().map(|&pos| position(pos)).collect();
        let _ = write!(out, "\n  flash: {}", cells.join(" "));
    }
    if !report.peeked.is_empty() {
        let cells: Vec<_> = report
            .peeked
            .iter()
            .map(|&(pos, value)| format!("{}: {value}", position(pos)))
            .collect();
        let _ = write!(out, "\n  neighbors: {}", cells.join(", "));
    }
    out
}
