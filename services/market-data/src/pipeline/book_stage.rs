//! Stage 3: book engine
//!
//! The only thread that touches the order store and the books. Applies
//! each decoded message and, when a book actually changed, samples the
//! monotonic clock and emits a top-of-book update carrying both timestamps
//! so the sink can measure end-to-end latency.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use spsc::{Consumer, Producer};
use types::clock::Clock;

use crate::book::BookEngine;

use super::messages::{BookUpdate, TimestampedMessage};
use super::PipelineCounters;

pub struct BookStage {
    engine: BookEngine,
    rx: Consumer<TimestampedMessage>,
    tx: Producer<BookUpdate>,
    counters: Arc<PipelineCounters>,
    running: Arc<AtomicBool>,
}

impl BookStage {
    pub fn new(
        engine: BookEngine,
        rx: Consumer<TimestampedMessage>,
        tx: Producer<BookUpdate>,
        counters: Arc<PipelineCounters>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            engine,
            rx,
            tx,
            counters,
            running,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        thread::Builder::new()
            .name("feed-book".into())
            .spawn(move || self.run())
            .expect("spawn book thread")
    }

    fn run(mut self) {
        while self.running.load(Ordering::Acquire) {
            match self.rx.try_pop() {
                Some(message) => self.process(&message),
                None => thread::yield_now(),
            }
        }

        let counters = self.engine.counters();
        debug!(
            live_orders = self.engine.live_orders(),
            unknown_orders = counters.unknown_orders,
            trades_seen = counters.trades_seen,
            "book loop exited"
        );
    }

    fn process(&mut self, message: &TimestampedMessage) {
        self.counters
            .messages_processed
            .fetch_add(1, Ordering::Relaxed);

        let Some(symbol) = self.engine.apply(&message.message) else {
            return;
        };

        let book_update_ts = Clock::monotonic_ns();
        let (best_bid, best_bid_qty, best_ask, best_ask_qty) = self.engine.top_of_book(symbol);

        let update = BookUpdate {
            symbol,
            best_bid,
            best_bid_qty,
            best_ask,
            best_ask_qty,
            receive_ts: message.receive_ts,
            book_update_ts,
        };
        self.counters.updates_emitted.fetch_add(1, Ordering::Relaxed);

        while !self.tx.try_push(update) {
            if !self.running.load(Ordering::Acquire) {
                return;
            }
            thread::yield_now();
        }
    }
}
