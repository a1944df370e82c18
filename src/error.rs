use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("signal loop is already running")]
    AlreadyStarted,

    #[error("signal has been stopped")]
    Stopped,

    #[error("invalid cycle bounds {min:?}..={max:?}: no non-zero whole millisecond in range")]
    InvalidCycle { min: Duration, max: Duration },

    #[error("unable to spawn signal thread")]
    Spawn(#[source] std::io::Error),

    #[error("signal thread panicked")]
    WorkerPanicked,
}
