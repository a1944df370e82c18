use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::thread;
use std::time::{Duration, Instant};

use crate::StopLatch;

#[test]
fn test_trip_wakes_waiter() {
    let latch = Arc::new(StopLatch::new());

    let l = latch.clone();
    let handle = thread::spawn(move || l.wait_timeout(Duration::from_secs(10)));

    // give the thread a moment to block on wait
    thread::sleep(Duration::from_millis(20));
    let start = Instant::now();
    latch.trip();

    let tripped = handle.join().expect("thread panicked");
    assert!(tripped);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_wait_timeout_elapses() {
    let latch = StopLatch::new();

    let start = Instant::now();
    let tripped = latch.wait_timeout(Duration::from_millis(50));
    let elapsed = start.elapsed();

    assert!(!tripped);
    assert!(elapsed >= Duration::from_millis(50));
}

#[test]
fn test_trip_before_wait() {
    let latch = StopLatch::new();

    latch.trip();
    let start = Instant::now();
    assert!(latch.wait_timeout(Duration::from_secs(10)));

    // already tripped, so no waiting at all
    assert!(start.elapsed() < Duration::from_millis(10));
}

#[test]
fn test_trip_wakes_every_waiter() {
    // A latch never resets, so one trip releases all waiters, past and future.
    let latch = Arc::new(StopLatch::new());
    let woken = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let l = latch.clone();
            let w = woken.clone();
            thread::spawn(move || {
                if l.wait_timeout(Duration::from_secs(10)) {
                    w.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    latch.trip();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert_eq!(woken.load(Ordering::SeqCst), 3);
    assert!(latch.is_tripped());
    assert!(latch.wait_timeout(Duration::from_secs(10)));
}
