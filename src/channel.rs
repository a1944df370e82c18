use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};

/// Which end of the buffer a receive pulls from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryOrder {
    /// Oldest value first. Insertion order is delivery order.
    #[default]
    Fifo,
    /// Most recently sent value first.
    Lifo,
}

#[derive(Debug)]
struct ChannelState<T> {
    buffer: VecDeque<T>,
    closed: bool,
}

/// A thread-safe message box with blocking receives.
///
/// Any number of producers may `send` and any number of consumers may
/// `receive`. Each value is delivered to exactly one consumer; a value sent
/// while nobody is waiting stays buffered until someone receives it.
///
/// The buffer is only touched while its mutex is held. Consumers wait on the
/// condition variable, which releases the mutex while blocked and re-checks
/// the buffer after every wake.
#[derive(Debug)]
pub struct BlockingChannel<T> {
    state: Mutex<ChannelState<T>>,
    available: Condvar,
    order: DeliveryOrder,
}

impl<T> BlockingChannel<T> {
    pub fn new() -> Self {
        Self::with_order(DeliveryOrder::default())
    }

    pub fn with_order(order: DeliveryOrder) -> Self {
        BlockingChannel {
            state: Mutex::new(ChannelState {
                buffer: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
            order,
        }
    }

    pub fn order(&self) -> DeliveryOrder {
        self.order
    }

    /// Buffers `value` and wakes one waiting consumer.
    ///
    /// Never fails. Values sent after [`close`](Self::close) are still
    /// buffered and delivered.
    pub fn send(&self, value: T) {
        let mut state = self.state.lock();
        state.buffer.push_back(value);
        self.available.notify_one();
    }

    /// Blocks until a value is available and removes it.
    ///
    /// Returns `None` only once the channel is closed and drained.
    pub fn receive(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(value) = self.pop(&mut state) {
                return Some(value);
            }
            if state.closed {
                return None;
            }

            self.available.wait(&mut state);
        }
    }

    /// Like [`receive`](Self::receive) but gives up after `timeout`.
    pub fn receive_timeout(&self, timeout: Duration) -> Option<T> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.receive();
        };
        let mut state = self.state.lock();
        loop {
            if let Some(value) = self.pop(&mut state) {
                return Some(value);
            }
            if state.closed {
                return None;
            }

            if self.available.wait_until(&mut state, deadline).timed_out() {
                return self.pop(&mut state);
            }
        }
    }

    /// Removes a value if one is buffered, without blocking.
    pub fn try_receive(&self) -> Option<T> {
        let mut state = self.state.lock();
        self.pop(&mut state)
    }

    /// Closes the channel and wakes every blocked consumer.
    ///
    /// Buffered values remain receivable; consumers only see `None` once the
    /// buffer is empty.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().buffer.is_empty()
    }

    fn pop(&self, state: &mut ChannelState<T>) -> Option<T> {
        match self.order {
            DeliveryOrder::Fifo => state.buffer.pop_front(),
            DeliveryOrder::Lifo => state.buffer.pop_back(),
        }
    }
}

impl<T> Default for BlockingChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}
