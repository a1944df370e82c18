use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local};

use crate::phase::Phase;

/// A single published phase flip.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The phase the signal switched to.
    pub phase: Phase,
    /// 1-based position of this flip in the signal's lifetime.
    pub sequence: u64,
    /// How long the previous phase was held before this flip.
    pub hold: Duration,

    /// Monotonic publish time, for measuring intervals.
    pub published_at: Instant,
    /// Wall-clock publish time, for display.
    pub timestamp: DateTime<Local>,
}

impl Transition {
    pub fn new(phase: Phase, sequence: u64, hold: Duration) -> Self {
        Self {
            phase,
            sequence,
            hold,
            published_at: Instant::now(),
            timestamp: Local::now(),
        }
    }

    /// Time between `earlier` and this transition.
    pub fn since(&self, earlier: &Transition) -> Duration {
        self.published_at.saturating_duration_since(earlier.published_at)
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} after {}ms",
            self.sequence,
            self.phase,
            self.hold.as_millis()
        )
    }
}
