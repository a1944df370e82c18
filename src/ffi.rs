//! C ABI over [`TrafficSignal`]. Handles are opaque, owned boxes that must be
//! released with [`traffic_signal_free`].

use std::ops::Deref;
use std::ptr;
use std::time::Duration;

use tracing::error;

use crate::{Phase, SignalConfig, TrafficSignal};

#[repr(C)]
#[derive(Clone, Copy)]
pub struct TrafficSignalFfi(*mut std::ffi::c_void);

/// Creates a red signal with the default 4-6 second cycle.
#[no_mangle]
pub extern "C" fn traffic_signal_new() -> TrafficSignalFfi {
    Box::into_raw(Box::new(TrafficSignal::new())).into()
}

/// Creates a signal with custom cycle bounds. `seeded` selects whether `seed`
/// is used. Returns a null handle if the bounds are invalid.
#[no_mangle]
pub extern "C" fn traffic_signal_new_with_cycle(
    min_ms: u64,
    max_ms: u64,
    seed: u64,
    seeded: bool,
) -> TrafficSignalFfi {
    let config = SignalConfig {
        min_cycle: Duration::from_millis(min_ms),
        max_cycle: Duration::from_millis(max_ms),
        seed: seeded.then_some(seed),
        ..SignalConfig::default()
    };

    match TrafficSignal::with_config(config) {
        Ok(signal) => Box::into_raw(Box::new(signal)).into(),
        Err(e) => {
            error!("Unable to create traffic signal: {e}");
            TrafficSignalFfi::null()
        }
    }
}

/// Reads a phase passed from C as its raw value (0 = red, 1 = green).
fn checked_phase(raw: u8) -> Option<Phase> {
    match Phase::try_from(raw) {
        Ok(phase) => Some(phase),
        Err(raw) => {
            error!("Invalid phase value {raw}");
            None
        }
    }
}

#[no_mangle]
pub extern "C" fn traffic_signal_simulate(signal: TrafficSignalFfi) -> bool {
    if signal.is_null() {
        return false;
    }

    match signal.simulate() {
        Ok(()) => true,
        Err(e) => {
            error!("Unable to start traffic signal: {e}");
            false
        }
    }
}

/// Returns red for a null handle.
#[no_mangle]
pub extern "C" fn traffic_signal_current_phase(signal: TrafficSignalFfi) -> Phase {
    if signal.is_null() {
        return Phase::Red;
    }

    signal.current_phase()
}

/// Blocks until `phase` is published. False if the signal stopped first or
/// `phase` is not a valid phase value.
#[no_mangle]
pub extern "C" fn traffic_signal_wait_for(signal: TrafficSignalFfi, phase: u8) -> bool {
    if signal.is_null() {
        return false;
    }
    let Some(phase) = checked_phase(phase) else {
        return false;
    };

    signal.wait_for(phase).is_ok()
}

/// False on timeout, stop, an invalid phase value, or a null handle.
#[no_mangle]
pub extern "C" fn traffic_signal_wait_for_timeout(
    signal: TrafficSignalFfi,
    phase: u8,
    timeout_ms: u64,
) -> bool {
    if signal.is_null() {
        return false;
    }
    let Some(phase) = checked_phase(phase) else {
        return false;
    };

    signal
        .wait_for_timeout(phase, Duration::from_millis(timeout_ms))
        .unwrap_or(false)
}

#[no_mangle]
pub extern "C" fn traffic_signal_stop(signal: TrafficSignalFfi) -> bool {
    if signal.is_null() {
        return false;
    }

    signal.stop().is_ok()
}

/// Stops the signal and releases the handle.
#[no_mangle]
pub extern "C" fn traffic_signal_free(signal: TrafficSignalFfi) {
    if signal.is_null() {
        return;
    }

    if let Err(e) = signal.stop() {
        error!("Traffic signal did not stop cleanly: {e}");
    }

    let raw: *mut TrafficSignal = signal.into();
    unsafe {
        drop(Box::from_raw(raw));
    }
}

impl From<*mut TrafficSignal> for TrafficSignalFfi {
    fn from(ptr: *mut TrafficSignal) -> Self {
        Self(ptr as *mut std::ffi::c_void)
    }
}

impl From<TrafficSignalFfi> for *mut TrafficSignal {
    fn from(ffi: TrafficSignalFfi) -> Self {
        ffi.0 as *mut TrafficSignal
    }
}

impl Deref for TrafficSignalFfi {
    type Target = TrafficSignal;

    fn deref(&self) -> &Self::Target {
        if self.0.is_null() {
            panic!("Attempted to dereference a null signal handle");
        }

        unsafe { &*(self.0 as *const TrafficSignal) }
    }
}

impl TrafficSignalFfi {
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    pub fn null() -> Self {
        Self(ptr::null_mut())
    }
}
