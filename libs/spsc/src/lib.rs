//! Bounded lock-free SPSC ring buffer
//!
//! Couples exactly two threads: one owns the [`Producer`] handle and pushes,
//! the other owns the [`Consumer`] handle and pops. The handles are not
//! cloneable and their operations take `&mut self`, so the
//! single-producer/single-consumer discipline is enforced by the type
//! system rather than by convention.
//!
//! Head and tail live on separate cache lines (`CachePadded`) so the two
//! threads never invalidate each other's line on their own counter. The
//! producer publishes a slot with a release store of the head; the consumer
//! observes it with an acquire load, and symmetrically for the tail. No
//! sequentially consistent fences anywhere.
//!
//! Capacity must be a power of two and at least 2. One slot is sacrificed
//! to distinguish full from empty, so a ring of capacity `N` holds `N - 1`
//! items.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_utils::CachePadded;

struct Inner<T> {
    /// Next slot the producer will write. Producer-owned; consumer reads.
    head: CachePadded<AtomicUsize>,
    /// Next slot the consumer will read. Consumer-owned; producer reads.
    tail: CachePadded<AtomicUsize>,
    mask: usize,
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

// The producer touches only the slot at head, the consumer only the slot at
// tail, and head/tail publication is acquire/release paired.
unsafe impl<T: Send> Sync for Inner<T> {}
unsafe impl<T: Send> Send for Inner<T> {}

impl<T> Inner<T> {
    fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        head.wrapping_sub(tail) & self.mask
    }
}

/// Create a ring of the given capacity and split it into its two endpoints.
///
/// # Panics
/// Panics if `capacity` is not a power of two or is smaller than 2.
pub fn ring<T: Copy>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    assert!(
        capacity.is_power_of_two() && capacity >= 2,
        "SPSC capacity must be a power of two >= 2, got {capacity}"
    );

    let slots = (0..capacity)
        .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
        .collect::<Vec<_>>()
        .into_boxed_slice();

    let inner = Arc::new(Inner {
        head: CachePadded::new(AtomicUsize::new(0)),
        tail: CachePadded::new(AtomicUsize::new(0)),
        mask: capacity - 1,
        slots,
    });

    (
        Producer {
            inner: Arc::clone(&inner),
        },
        Consumer { inner },
    )
}

/// Push endpoint. Exactly one thread may hold this.
pub struct Producer<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Copy> Producer<T> {
    /// Write `item` at the head slot and advance, unless the ring is full.
    ///
    /// Returns `false` when full; the caller decides whether to spin, yield,
    /// or drop.
    pub fn try_push(&mut self, item: T) -> bool {
        let inner = &*self.inner;
        let head = inner.head.load(Ordering::Relaxed);
        let next = (head + 1) & inner.mask;

        if next == inner.tail.load(Ordering::Acquire) {
            return false;
        }

        unsafe {
            (*inner.slots[head].get()).write(item);
        }
        inner.head.store(next, Ordering::Release);
        true
    }

    /// Approximate number of items currently queued.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pop endpoint. Exactly one thread may hold this.
pub struct Consumer<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Copy> Consumer<T> {
    /// Read the tail slot and advance, unless the ring is empty.
    pub fn try_pop(&mut self) -> Option<T> {
        let inner = &*self.inner;
        let tail = inner.tail.load(Ordering::Relaxed);

        if tail == inner.head.load(Ordering::Acquire) {
            return None;
        }

        let item = unsafe { (*inner.slots[tail].get()).assume_init_read() };
        inner.tail.store((tail + 1) & inner.mask, Ordering::Release);
        Some(item)
    }

    /// Approximate number of items currently queued.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
