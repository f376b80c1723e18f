use alloc::vec::Vec;

use crate::*;

/// A game plus the timer queue for its deferred re-closes.
#[derive(Debug)]
pub struct Session<C> {
    game: Game,
    clock: C,
    closes: CloseScheduler,
}

impl<C: Clock> Session<C> {
    pub fn new(game: Game, clock: C) -> Self {
        Self {
            game,
            clock,
            closes: CloseScheduler::new(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn pending_closes(&self) -> usize {
        self.closes.len()
    }

    pub fn next_due(&self) -> Option<core::time::Duration> {
        self.closes.next_due()
    }

    /// Fire the closes that are due, then play `coords`.
    pub fn open_cell(&mut self, coords: Coord2) -> Result<TurnOutcome> {
        self.poll()?;
        let outcome = self.game.open_cell(coords)?;

        if self.game.is_finished() {
            self.closes.cancel_all();
        } else if let Some(report) = outcome.report() {
            if report.reclose {
                let due = self.clock.now() + self.game.config().reclose_delay();
                self.closes.schedule(report.result.position, due);
            }
        }

        Ok(outcome)
    }

    /// Apply every re-close whose delay has elapsed; returns the cells closed.
    pub fn poll(&mut self) -> Result<Vec<Coord2>> {
        let mut closed = Vec::new();
        for close in self.closes.take_due(self.clock.now()) {
            if self.game.close_cell(close.coords)? {
                closed.push(close.coords);
            }
        }
        Ok(closed)
    }
}
