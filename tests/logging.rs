#![cfg(feature = "subscriber")]

use std::time::Duration;

use color_eyre::eyre::Result;
use traffic_signal::{logging::init_logging, Phase, SignalConfig, TrafficSignal};

#[test]
fn test_init_logging_is_repeatable() -> Result<()> {
    init_logging("traffic_signal=debug")?;
    init_logging("traffic_signal=trace")?;

    let signal = TrafficSignal::with_config(SignalConfig {
        min_cycle: Duration::from_millis(10),
        max_cycle: Duration::from_millis(20),
        ..SignalConfig::default()
    })?;
    signal.simulate()?;
    signal.wait_for(Phase::Green)?;
    signal.stop()?;

    Ok(())
}

#[test]
fn test_invalid_default_filter_rejected() {
    // RUST_LOG takes precedence over the default filter
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }

    assert!(init_logging("traffic_signal=notalevel").is_err());
}
