//! Two-thread stress test
//!
//! One producer pushes a million sequential integers while one consumer
//! drains concurrently; the consumer must observe every value exactly once,
//! in order. Any missing acquire/release pairing shows up here as a gap or
//! a stale slot value.

use std::thread;

use spsc::ring;

const ITEMS: u64 = 1_000_000;
const CAPACITY: usize = 65_536;

#[test]
fn test_million_items_arrive_in_order() {
    let (mut tx, mut rx) = ring::<u64>(CAPACITY);

    let producer = thread::spawn(move || {
        for i in 0..ITEMS {
            while !tx.try_push(i) {
                thread::yield_now();
            }
        }
    });

    let consumer = thread::spawn(move || {
        let mut expected = 0u64;
        while expected < ITEMS {
            match rx.try_pop() {
                Some(value) => {
                    assert_eq!(value, expected, "out-of-order item");
                    expected += 1;
                }
                None => thread::yield_now(),
            }
        }
        assert_eq!(rx.try_pop(), None, "queue must be drained");
    });

    producer.join().unwrap();
    consumer.join().unwrap();
}

#[test]
fn test_concurrent_interleaving_preserves_count() {
    let (mut tx, mut rx) = ring::<u64>(8);

    let producer = thread::spawn(move || {
        for i in 0..10_000u64 {
            while !tx.try_push(i) {
                thread::yield_now();
            }
        }
    });

    let mut received = 0u64;
    while received < 10_000 {
        if rx.try_pop().is_some() {
            received += 1;
        } else {
            thread::yield_now();
        }
    }

    producer.join().unwrap();
    assert_eq!(received, 10_000);
}
