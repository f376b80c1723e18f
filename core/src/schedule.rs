use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::time::Duration;

use crate::*;

/// Source of the current time, measured from an arbitrary fixed origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Hand-driven clock. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<core::cell::Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// A pending re-close of one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduledClose {
    pub coords: Coord2,
    pub due: Duration,
}

/// Timer queue of cell re-closes, at most one per position.
#[derive(Clone, Debug, Default)]
pub struct CloseScheduler {
    pending: BTreeMap<Coord2, Duration>,
}

impl CloseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a close; replaces any close already pending for `coords`.
    pub fn schedule(&mut self, coords: Coord2, due: Duration) {
        self.pending.insert(coords, due);
    }

    pub fn cancel(&mut self, coords: Coord2) -> bool {
        self.pending.remove(&coords).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.values().min().copied()
    }

    /// Remove and return every close due at `now`, earliest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<ScheduledClose> {
        let mut due: Vec<ScheduledClose> = self
            .pending
            .iter()
            .filter(|&(_, &at)| at <= now)
            .map(|(&coords, &at)| ScheduledClose { coords, due: at })
            .collect();
        due.sort_by_key(|close| (close.due, close.coords));

        for close in &due {
            self.pending.remove(&close.coords);
        }
        due
    }
}
