use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use proptest::prelude::*;

use crate::{BlockingChannel, DeliveryOrder};

#[test]
fn test_receive_blocks_until_send() {
    let channel = Arc::new(BlockingChannel::<u32>::new());

    let c = channel.clone();
    let handle = thread::spawn(move || {
        let start = Instant::now();
        let value = c.receive();
        (value, start.elapsed())
    });

    // give the consumer a moment to block
    thread::sleep(Duration::from_millis(30));
    channel.send(7);

    let (value, waited) = handle.join().expect("thread panicked");
    assert_eq!(value, Some(7));
    assert!(waited >= Duration::from_millis(25));
}

#[test]
fn test_send_without_waiter_is_buffered() {
    let channel = BlockingChannel::new();

    channel.send("queued");
    assert_eq!(channel.len(), 1);

    assert_eq!(channel.receive(), Some("queued"));
    assert!(channel.is_empty());
}

#[test]
fn test_no_loss_before_receive() {
    let channel = BlockingChannel::new();
    let k = 25;

    for i in 0..k {
        channel.send(i);
    }
    assert_eq!(channel.len(), k);

    let mut drained = 0;
    while channel.try_receive().is_some() {
        drained += 1;
    }

    assert_eq!(drained, k);
    assert!(channel.try_receive().is_none());
}

#[test]
fn test_fifo_delivers_in_send_order() {
    let channel = BlockingChannel::with_order(DeliveryOrder::Fifo);
    assert_eq!(channel.order(), DeliveryOrder::Fifo);

    for i in 1..=3 {
        channel.send(i);
    }

    let received: Vec<_> = (0..3).filter_map(|_| channel.receive()).collect();
    assert_eq!(received, vec![1, 2, 3]);
}

#[test]
fn test_lifo_delivers_most_recent_first() {
    // With values queued before any receive the two orders differ observably.
    let channel = BlockingChannel::with_order(DeliveryOrder::Lifo);
    assert_eq!(channel.order(), DeliveryOrder::Lifo);

    for i in 1..=3 {
        channel.send(i);
    }

    let received: Vec<_> = (0..3).filter_map(|_| channel.receive()).collect();
    assert_eq!(received, vec![3, 2, 1]);
}

#[test]
fn test_default_order_is_fifo() {
    let channel: BlockingChannel<u8> = BlockingChannel::default();
    assert_eq!(channel.order(), DeliveryOrder::Fifo);
}

#[test]
fn test_each_value_delivered_once_across_consumers() {
    let channel = Arc::new(BlockingChannel::<u32>::new());
    let total = 200u32;

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let c = channel.clone();
            thread::spawn(move || {
                let mut seen = Vec::new();
                while let Some(value) = c.receive() {
                    seen.push(value);
                }
                seen
            })
        })
        .collect();

    for i in 0..total {
        channel.send(i);
    }

    // wait for the consumers to drain, then release them
    let start = Instant::now();
    while !channel.is_empty() && start.elapsed() < Duration::from_secs(5) {
        thread::sleep(Duration::from_millis(5));
    }
    channel.close();

    let mut all = Vec::new();
    for consumer in consumers {
        all.extend(consumer.join().expect("thread panicked"));
    }

    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(all.len(), total as usize, "a value was lost or duplicated");
    assert_eq!(unique.len(), total as usize);
}

#[test]
fn test_receive_timeout_without_value() {
    let channel: BlockingChannel<u8> = BlockingChannel::new();

    let start = Instant::now();
    assert_eq!(channel.receive_timeout(Duration::from_millis(40)), None);
    assert!(start.elapsed() >= Duration::from_millis(40));
}

#[test]
fn test_receive_timeout_with_value() {
    let channel = Arc::new(BlockingChannel::<u8>::new());

    let c = channel.clone();
    let handle = thread::spawn(move || c.receive_timeout(Duration::from_secs(5)));

    thread::sleep(Duration::from_millis(20));
    channel.send(3);

    assert_eq!(handle.join().expect("thread panicked"), Some(3));
}

#[test]
fn test_close_wakes_blocked_receivers() {
    let channel: Arc<BlockingChannel<u8>> = Arc::new(BlockingChannel::new());

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let c = channel.clone();
            thread::spawn(move || c.receive())
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    channel.close();

    for handle in handles {
        assert_eq!(handle.join().expect("thread panicked"), None);
    }
    assert!(channel.is_closed());
}

#[test]
fn test_close_keeps_buffered_values() {
    let channel = BlockingChannel::new();
    channel.send(1);
    channel.close();
    channel.send(2);

    assert_eq!(channel.receive(), Some(1));
    assert_eq!(channel.receive(), Some(2));
    assert_eq!(channel.receive(), None);
    assert_eq!(channel.receive_timeout(Duration::from_secs(5)), None);
}

proptest! {
    #[test]
    fn prop_fifo_drains_everything_in_order(values in prop::collection::vec(any::<u32>(), 0..64)) {
        let channel = BlockingChannel::with_order(DeliveryOrder::Fifo);
        for value in &values {
            channel.send(*value);
        }

        let drained: Vec<u32> = std::iter::from_fn(|| channel.try_receive()).collect();
        prop_assert_eq!(drained, values);
    }

    #[test]
    fn prop_lifo_drains_everything_reversed(values in prop::collection::vec(any::<u32>(), 0..64)) {
        let channel = BlockingChannel::with_order(DeliveryOrder::Lifo);
        for value in &values {
            channel.send(*value);
        }

        let drained: Vec<u32> = std::iter::from_fn(|| channel.try_receive()).collect();
        let mut expected = values.clone();
        expected.reverse();
        prop_assert_eq!(drained, expected);
    }
}
