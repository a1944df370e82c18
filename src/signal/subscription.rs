use std::{sync::Arc, time::Duration};

use tracing::trace;

use crate::{channel::BlockingChannel, error::SignalError, phase::Phase, Result};

use super::transition::Transition;

/// A private feed of every transition published after subscribing.
///
/// Unlike [`TrafficSignal::wait_for`](super::TrafficSignal::wait_for), which
/// drains a queue shared by all callers, each subscription has its own
/// buffer, so concurrent subscribers all observe the same transitions.
/// Dropping the subscription unregisters it on the next publish.
#[derive(Debug)]
pub struct PhaseSubscription {
    channel: Arc<BlockingChannel<Transition>>,
}

impl PhaseSubscription {
    pub(crate) fn new(channel: Arc<BlockingChannel<Transition>>) -> Self {
        Self { channel }
    }

    /// Blocks for the next transition. `None` once the signal is stopped and
    /// everything buffered has been received.
    pub fn recv(&self) -> Option<Transition> {
        self.channel.receive()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Transition> {
        self.channel.receive_timeout(timeout)
    }

    pub fn try_recv(&self) -> Option<Transition> {
        self.channel.try_receive()
    }

    /// Blocks until a transition to `target` arrives and returns it.
    pub fn wait_for(&self, target: Phase) -> Result<Transition> {
        loop {
            match self.channel.receive() {
                Some(transition) if transition.phase == target => return Ok(transition),
                Some(transition) => trace!(%transition, %target, "subscriber skipping transition"),
                None => return Err(SignalError::Stopped.into()),
            }
        }
    }

    /// Number of transitions buffered and not yet received.
    pub fn pending(&self) -> usize {
        self.channel.len()
    }

    pub fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }
}
