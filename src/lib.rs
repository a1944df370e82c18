mod channel;
mod error;
mod phase;
mod signal;
mod stop_latch;

#[cfg(feature = "subscriber")]
pub mod logging;

#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(test)]
mod tests;

pub use channel::{BlockingChannel, DeliveryOrder};
pub use error::SignalError;
pub use phase::Phase;
pub use signal::{
    HoldSchedule, PhaseSubscription, SignalConfig, TrafficSignal, Transition, DEFAULT_MAX_CYCLE,
    DEFAULT_MIN_CYCLE,
};
pub use stop_latch::StopLatch;

pub type Result<T> = color_eyre::Result<T>;
