//! Stage 4: stats sink
//!
//! Drains Q3, records end-to-end latencies, and once per reporting interval
//! hands a quantile report plus the freshest top-of-book rows to the
//! display. The sample buffer and the per-symbol rows are owned by this
//! thread alone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ahash::AHashMap;
use tracing::debug;

use spsc::Consumer;
use types::clock::Clock;
use types::symbol::Symbol;

use crate::display::FeedDisplay;
use crate::stats::LatencyStats;

use super::messages::BookUpdate;
use super::PipelineCounters;

pub struct Sink {
    rx: Consumer<BookUpdate>,
    display: FeedDisplay,
    report_interval: Duration,
    counters: Arc<PipelineCounters>,
    running: Arc<AtomicBool>,
}

impl Sink {
    pub fn new(
        rx: Consumer<BookUpdate>,
        display: FeedDisplay,
        report_interval: Duration,
        counters: Arc<PipelineCounters>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            rx,
            display,
            report_interval,
            counters,
            running,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        thread::Builder::new()
            .name("feed-sink".into())
            .spawn(move || self.run())
            .expect("spawn sink thread")
    }

    fn run(mut self) {
        let interval_ns = self.report_interval.as_nanos() as u64;
        let mut stats = LatencyStats::new(Clock::monotonic_ns());
        let mut tops: AHashMap<Symbol, BookUpdate> = AHashMap::new();
        let mut messages_at_last_report = 0u64;

        while self.running.load(Ordering::Acquire) {
            match self.rx.try_pop() {
                Some(update) => {
                    stats.record(update.latency_ns());
                    tops.insert(update.symbol, update);
                }
                None => thread::yield_now(),
            }

            let now = Clock::monotonic_ns();
            if stats.interval_elapsed(now, interval_ns) {
                let messages_total = self.counters.messages_processed.load(Ordering::Relaxed);
                let report = stats.report(now, messages_total - messages_at_last_report);
                messages_at_last_report = messages_total;

                let mut rows: Vec<&BookUpdate> = tops.values().collect();
                rows.sort_by_key(|update| update.symbol.as_key());
                self.display.render(&report, &rows);
            }
        }
        debug!("sink loop exited");
    }
}
