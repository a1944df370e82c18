use std::time::Duration;

use crate::{channel::DeliveryOrder, phase::Phase, Result};

mod schedule;
mod subscription;
mod traffic_signal;
mod transition;

pub use schedule::HoldSchedule;
pub use subscription::PhaseSubscription;
pub use traffic_signal::TrafficSignal;
pub use transition::Transition;

const DEFAULT_MIN_CYCLE_MS: u64 = 4000;
const DEFAULT_MAX_CYCLE_MS: u64 = 6000;

pub const DEFAULT_MIN_CYCLE: Duration = Duration::from_millis(DEFAULT_MIN_CYCLE_MS);
pub const DEFAULT_MAX_CYCLE: Duration = Duration::from_millis(DEFAULT_MAX_CYCLE_MS);

#[derive(Debug, Clone)]
pub struct SignalConfig {
    /// Phase the signal shows before its first transition.
    pub initial_phase: Phase,

    /// Shortest hold between two transitions.
    pub min_cycle: Duration,
    /// Longest hold between two transitions.
    pub max_cycle: Duration,

    /// Order in which queued phases are handed to `wait_for` callers.
    pub delivery_order: DeliveryOrder,

    /// Seed for the hold schedule. A random seed is drawn (and logged) when unset.
    pub seed: Option<u64>,

    pub thread_name: String,
}

impl SignalConfig {
    pub fn validate(&self) -> Result<()> {
        schedule::validate_bounds(self.min_cycle, self.max_cycle).map(|_| ())
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            initial_phase: Phase::Red,
            min_cycle: DEFAULT_MIN_CYCLE,
            max_cycle: DEFAULT_MAX_CYCLE,
            delivery_order: DeliveryOrder::Fifo,
            seed: None,
            thread_name: "traffic-signal".to_string(),
        }
    }
}
