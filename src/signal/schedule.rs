use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{error::SignalError, Result};

/// Draws per-cycle hold durations from an owned, seeded generator.
///
/// Two schedules built with the same bounds and seed yield the same sequence.
#[derive(Debug, Clone)]
pub struct HoldSchedule {
    rng: StdRng,
    seed: u64,
    min_ms: u64,
    max_ms: u64,
}

impl HoldSchedule {
    /// Holds are whole milliseconds: `min` is rounded up and `max` down, and
    /// the rounded range must still be non-empty and non-zero.
    pub fn new(min: Duration, max: Duration, seed: u64) -> Result<Self> {
        let (min_ms, max_ms) = validate_bounds(min, max)?;
        Ok(Self::with_millis(min_ms, max_ms, seed))
    }

    /// Bounds already known to satisfy `0 < max_ms` and `min_ms <= max_ms`.
    pub(crate) fn with_millis(min_ms: u64, max_ms: u64, seed: u64) -> Self {
        HoldSchedule {
            rng: StdRng::seed_from_u64(seed),
            seed,
            min_ms,
            max_ms,
        }
    }

    /// Uniform whole milliseconds in `[min, max]`, both ends inclusive.
    pub fn next_hold(&mut self) -> Duration {
        Duration::from_millis(self.rng.random_range(self.min_ms..=self.max_ms))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_ms),
            Duration::from_millis(self.max_ms),
        )
    }
}

/// Converts the bounds to the millisecond range actually drawn from.
pub(crate) fn validate_bounds(min: Duration, max: Duration) -> Result<(u64, u64)> {
    let invalid = || SignalError::InvalidCycle { min, max };

    let min_ms = u64::try_from(min.as_nanos().div_ceil(1_000_000)).map_err(|_| invalid())?;
    let max_ms = u64::try_from(max.as_millis()).map_err(|_| invalid())?;

    if max_ms == 0 || min_ms > max_ms {
        return Err(invalid().into());
    }
    Ok((min_ms, max_ms))
}
