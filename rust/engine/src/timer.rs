//! Cancellable delayed transitions driven by a virtual clock.
//!
//! Nothing here sleeps. The owner advances the clock and pops due timers in
//! deadline order; timers scheduled while handling a fired timer are measured
//! from that timer's deadline, so a chain of delays replays exactly.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The two delayed transitions of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Compare the two revealed cards
    Evaluate,
    /// Turn a mismatched pair face down again
    Conceal,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    /// Scheduling order, breaks deadline ties
    seq: u64,
    kind: TimerKind,
    deadline: Duration,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, kind: TimerKind, after: Duration) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            seq,
            kind,
            deadline: self.now.saturating_add(after),
        });
    }

    /// Cancels every pending timer of `kind`, returning how many were dropped.
    pub fn cancel(&mut self, kind: TimerKind) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.kind != kind);
        before - self.pending.len()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time left until the earliest pending timer.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.earliest()
            .map(|p| p.deadline.saturating_sub(self.now))
    }

    /// Removes the earliest timer due at or before `until` and moves the clock
    /// to its deadline. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerKind> {
        let next = self.earliest()?;
        if next.deadline > until {
            return None;
        }
        let seq = next.seq;
        let deadline = next.deadline;
        let kind = next.kind;
        self.pending.retain(|p| p.seq != seq);
        if deadline > self.now {
            self.now = deadline;
        }
        Some(kind)
    }

    /// Moves the clock forward without firing anything.
    pub fn set_now(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    fn earliest(&self) -> Option<Pending> {
        self.pending
            .iter()
            .min_by_key(|p| (p.deadline, p.seq))
            .copied()
    }
}
