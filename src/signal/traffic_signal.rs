use std::{
    io,
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering},
        Arc, Weak,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use rand::Rng;
use tracing::{debug, error, info, trace, warn};

use crate::{
    channel::BlockingChannel, error::SignalError, phase::Phase, stop_latch::StopLatch, Result,
};

use super::{
    schedule::HoldSchedule, subscription::PhaseSubscription, transition::Transition, SignalConfig,
    DEFAULT_MAX_CYCLE_MS, DEFAULT_MIN_CYCLE_MS,
};

/// State shared between every handle of a signal and its background thread.
#[derive(Debug)]
struct SignalShared {
    config: SignalConfig,
    seed: u64,

    /// Current phase, stored as `Phase as u8`. Only the loop writes it.
    phase: AtomicU8,

    /// Drain-once queue backing `wait_for`
    queue: BlockingChannel<Phase>,

    /// Broadcast subscribers. Dropped subscriptions are pruned on publish.
    subscribers: Mutex<Vec<Weak<BlockingChannel<Transition>>>>,

    last_transition: Mutex<Option<Transition>>,
    transitions: AtomicU64,

    /// Taken by the loop when it starts, put back if the spawn fails
    schedule: Mutex<Option<HoldSchedule>>,
    started: AtomicBool,
    stop: StopLatch,
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// A signal that flips between red and green on a randomized schedule.
///
/// `TrafficSignal` is a handle: clones share the same phase, queue and
/// background thread, so it can be handed to any number of waiting threads.
///
/// ```no_run
/// use traffic_signal::{Phase, TrafficSignal};
///
/// let signal = TrafficSignal::new();
/// signal.simulate()?;
///
/// signal.wait_for(Phase::Green)?;
/// println!("light is {}", signal.current_phase());
/// # Ok::<(), color_eyre::Report>(())
/// ```
#[derive(Debug, Clone)]
pub struct TrafficSignal {
    shared: Arc<SignalShared>,
}

impl TrafficSignal {
    /// A red signal cycling every 4 to 6 seconds once started.
    pub fn new() -> Self {
        let config = SignalConfig::default();
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());

        let schedule = HoldSchedule::with_millis(DEFAULT_MIN_CYCLE_MS, DEFAULT_MAX_CYCLE_MS, seed);
        Self::from_parts(config, seed, schedule)
    }

    pub fn with_config(config: SignalConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let schedule = HoldSchedule::new(config.min_cycle, config.max_cycle, seed)?;

        Ok(Self::from_parts(config, seed, schedule))
    }

    fn from_parts(config: SignalConfig, seed: u64, schedule: HoldSchedule) -> Self {
        let shared = SignalShared {
            phase: AtomicU8::new(config.initial_phase as u8),
            queue: BlockingChannel::with_order(config.delivery_order),
            subscribers: Mutex::new(Vec::new()),
            last_transition: Mutex::new(None),
            transitions: AtomicU64::new(0),
            schedule: Mutex::new(Some(schedule)),
            started: AtomicBool::new(false),
            stop: StopLatch::new(),
            worker: Mutex::new(None),
            config,
            seed,
        };

        TrafficSignal {
            shared: Arc::new(shared),
        }
    }

    /// Starts the background loop. Can only succeed once per signal.
    ///
    /// If the thread cannot be spawned the signal is left unstarted and the
    /// call may be retried.
    pub fn simulate(&self) -> Result<()> {
        self.start_with(|builder, body| builder.spawn(body))
    }

    pub(crate) fn start_with<F>(&self, spawn: F) -> Result<()>
    where
        F: FnOnce(thread::Builder, Box<dyn FnOnce() + Send + 'static>) -> io::Result<JoinHandle<()>>,
    {
        if self.shared.stop.is_tripped() {
            return Err(SignalError::Stopped.into());
        }
        if self.shared.started.swap(true, Ordering::SeqCst) {
            return Err(SignalError::AlreadyStarted.into());
        }

        let mut pending = self.shared.schedule.lock();
        let schedule = pending.take().ok_or(SignalError::AlreadyStarted)?;

        let config = &self.shared.config;
        info!(
            seed = self.shared.seed,
            min_ms = config.min_cycle.as_millis() as u64,
            max_ms = config.max_cycle.as_millis() as u64,
            initial = %config.initial_phase,
            "Starting traffic signal"
        );

        // hold the slot so a concurrent stop() waits for the handle
        let mut worker = self.shared.worker.lock();
        let shared = Arc::clone(&self.shared);
        let loop_schedule = schedule.clone();
        let builder = thread::Builder::new().name(config.thread_name.clone());

        match spawn(builder, Box::new(move || Self::run_loop(shared, loop_schedule))) {
            Ok(handle) => {
                *worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                error!("Unable to spawn signal thread: {e}");
                *pending = Some(schedule);
                self.shared.started.store(false, Ordering::SeqCst);
                Err(SignalError::Spawn(e).into())
            }
        }
    }

    /// The loop run by the background thread.
    /// Each cycle holds the current phase, flips it, then publishes the flip.
    /// Exits only when the stop latch trips.
    fn run_loop(shared: Arc<SignalShared>, mut schedule: HoldSchedule) {
        loop {
            let hold = schedule.next_hold();
            if shared.stop.wait_timeout(hold) {
                break;
            }

            let next = Phase::from_raw(shared.phase.load(Ordering::SeqCst)).complement();
            shared.phase.store(next as u8, Ordering::SeqCst);

            let sequence = shared.transitions.fetch_add(1, Ordering::SeqCst) + 1;
            let transition = Transition::new(next, sequence, hold);
            *shared.last_transition.lock() = Some(transition.clone());

            shared.queue.send(next);
            shared.broadcast(&transition);

            debug!(%transition, "Signal changed phase");
        }

        info!(
            transitions = shared.transitions.load(Ordering::SeqCst),
            "Signal loop stopped"
        );
    }

    /// The most recently settled phase. Never blocks.
    pub fn current_phase(&self) -> Phase {
        Phase::from_raw(self.shared.phase.load(Ordering::SeqCst))
    }

    /// Blocks until a transition to `target` is received from the shared queue.
    ///
    /// Every published phase is delivered to exactly one caller. When several
    /// threads wait at once they race for each transition; a caller that loses
    /// the race keeps waiting for the next transition to `target`, which may be
    /// a full cycle later. A transition that happened before the call and was
    /// already consumed is not seen either. Use [`subscribe`](Self::subscribe)
    /// when every waiter must observe every transition.
    ///
    /// Returns [`SignalError::Stopped`] once the signal is stopped and no
    /// queued `target` remains.
    pub fn wait_for(&self, target: Phase) -> Result<()> {
        loop {
            match self.shared.queue.receive() {
                Some(phase) if phase == target => return Ok(()),
                Some(phase) => trace!(%phase, %target, "Discarding phase"),
                None => return Err(SignalError::Stopped.into()),
            }
        }
    }

    /// [`wait_for`](Self::wait_for) with an upper bound.
    /// Returns `Ok(false)` if `timeout` elapsed first.
    pub fn wait_for_timeout(&self, target: Phase, timeout: Duration) -> Result<bool> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait_for(target).map(|()| true);
        };
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.shared.queue.receive_timeout(remaining) {
                Some(phase) if phase == target => return Ok(true),
                Some(phase) => trace!(%phase, %target, "Discarding phase"),
                None if self.shared.queue.is_closed() => {
                    return Err(SignalError::Stopped.into())
                }
                None => return Ok(false),
            }
        }
    }

    pub fn wait_for_green(&self) -> Result<()> {
        self.wait_for(Phase::Green)
    }

    /// Registers a private feed that receives every transition from now on.
    pub fn subscribe(&self) -> PhaseSubscription {
        let channel = Arc::new(BlockingChannel::new());

        {
            let mut subscribers = self.shared.subscribers.lock();
            if self.shared.stop.is_tripped() {
                channel.close();
            } else {
                subscribers.push(Arc::downgrade(&channel));
            }
        }

        PhaseSubscription::new(channel)
    }

    pub fn last_transition(&self) -> Option<Transition> {
        self.shared.last_transition.lock().clone()
    }

    pub fn transition_count(&self) -> u64 {
        self.shared.transitions.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.shared.started.load(Ordering::SeqCst) && !self.shared.stop.is_tripped()
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stop.is_tripped()
    }

    /// Seed of the hold schedule, for replaying a run.
    pub fn seed(&self) -> u64 {
        self.shared.seed
    }

    pub fn config(&self) -> &SignalConfig {
        &self.shared.config
    }

    /// Stops the background loop and wakes every waiter.
    ///
    /// Waiters still receive phases queued before the stop, then get
    /// [`SignalError::Stopped`]. Calling this more than once is harmless.
    pub fn stop(&self) -> Result<()> {
        if !self.shared.stop.is_tripped() {
            info!("Stopping traffic signal");
        }
        self.shared.stop.trip();

        let handle = self.shared.worker.lock().take();
        let joined = match handle {
            Some(handle) if handle.thread().id() != thread::current().id() => {
                handle.join().map_err(|_| {
                    warn!("Signal thread panicked");
                    SignalError::WorkerPanicked
                })
            }
            _ => Ok(()),
        };

        self.shared.close_channels();
        joined?;

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn queue(&self) -> &BlockingChannel<Phase> {
        &self.shared.queue
    }
}

impl Default for TrafficSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalShared {
    fn broadcast(&self, transition: &Transition) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|subscriber| match subscriber.upgrade() {
            Some(channel) => {
                channel.send(transition.clone());
                true
            }
            None => {
                debug!("Dropping closed subscription");
                false
            }
        });
    }

    fn close_channels(&self) {
        self.queue.close();

        let mut subscribers = self.subscribers.lock();
        for subscriber in subscribers.drain(..) {
            if let Some(channel) = subscriber.upgrade() {
                channel.close();
            }
        }
    }
}
