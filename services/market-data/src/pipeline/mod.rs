//! Pipeline wiring and lifecycle
//!
//! Four stages, one OS thread each, linked by SPSC rings. Construction
//! order is fixed: sockets and queues exist before any stage starts, and
//! shutdown stops stages front to back (receiver first, sink last) so
//! in-flight work drains forward.

pub mod book_stage;
pub mod messages;
pub mod parser;
pub mod receiver;
pub mod sink;

use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::info;

use crate::book::BookEngine;
use crate::display::FeedDisplay;
use crate::error::FeedError;
use crate::socket;

pub use messages::{BookUpdate, RawPacket, TimestampedMessage, MAX_DATAGRAM};

/// Everything the consumer needs to run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub group: Ipv4Addr,
    pub port: u16,
    pub listen: Ipv4Addr,
    /// Q1 capacity (datagrams). Power of two.
    pub packet_queue_capacity: usize,
    /// Q2 capacity (decoded records). Power of two.
    pub message_queue_capacity: usize,
    /// Q3 capacity (book updates). Power of two.
    pub update_queue_capacity: usize,
    pub report_interval: Duration,
    /// Render the per-symbol top-of-book table in addition to stats lines.
    pub display_enabled: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            group: Ipv4Addr::new(239, 1, 1, 1),
            port: 12345,
            listen: Ipv4Addr::UNSPECIFIED,
            packet_queue_capacity: 4_096,
            message_queue_capacity: 65_536,
            update_queue_capacity: 65_536,
            report_interval: Duration::from_secs(1),
            display_enabled: true,
        }
    }
}

/// Shared monotonic counters, written by their owning stages and read by
/// anyone (sink report, shutdown summary).
#[derive(Debug, Default)]
pub struct PipelineCounters {
    pub packets_received: AtomicU64,
    pub packets_dropped: AtomicU64,
    pub bytes_received: AtomicU64,
    pub records_parsed: AtomicU64,
    pub parse_errors: AtomicU64,
    pub messages_processed: AtomicU64,
    pub updates_emitted: AtomicU64,
}

impl PipelineCounters {
    /// Point-in-time copy for reporting.
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            packets_received: self.packets_received.load(Ordering::Relaxed),
            packets_dropped: self.packets_dropped.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            records_parsed: self.records_parsed.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
            messages_processed: self.messages_processed.load(Ordering::Relaxed),
            updates_emitted: self.updates_emitted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountersSnapshot {
    pub packets_received: u64,
    pub packets_dropped: u64,
    pub bytes_received: u64,
    pub records_parsed: u64,
    pub parse_errors: u64,
    pub messages_processed: u64,
    pub updates_emitted: u64,
}

/// A running consumer pipeline.
pub struct Pipeline {
    running: Arc<AtomicBool>,
    counters: Arc<PipelineCounters>,
    // Joined in push order on stop: receiver, parser, book, sink.
    handles: Vec<JoinHandle<()>>,
}

impl Pipeline {
    /// Build sockets and queues, then start all four stage threads.
    ///
    /// Fails only on startup: socket bind, group join, or reactor
    /// construction.
    pub fn start(config: PipelineConfig) -> Result<Self, FeedError> {
        let udp = socket::join_multicast(config.group, config.port, config.listen)?;
        let reactor = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()
            .map_err(FeedError::Runtime)?;

        let running = Arc::new(AtomicBool::new(true));
        let counters = Arc::new(PipelineCounters::default());

        let (q1_tx, q1_rx) = spsc::ring::<RawPacket>(config.packet_queue_capacity);
        let (q2_tx, q2_rx) = spsc::ring::<TimestampedMessage>(config.message_queue_capacity);
        let (q3_tx, q3_rx) = spsc::ring::<BookUpdate>(config.update_queue_capacity);

        let receiver = receiver::Receiver::new(
            reactor,
            udp,
            q1_tx,
            Arc::clone(&counters),
            Arc::clone(&running),
        );
        let parser = parser::Parser::new(
            q1_rx,
            q2_tx,
            Arc::clone(&counters),
            Arc::clone(&running),
        );
        let book_stage = book_stage::BookStage::new(
            BookEngine::new(),
            q2_rx,
            q3_tx,
            Arc::clone(&counters),
            Arc::clone(&running),
        );
        let sink = sink::Sink::new(
            q3_rx,
            FeedDisplay::new(config.display_enabled),
            config.report_interval,
            Arc::clone(&counters),
            Arc::clone(&running),
        );

        let handles = vec![
            receiver.spawn(),
            parser.spawn(),
            book_stage.spawn(),
            sink.spawn(),
        ];

        info!(
            group = %config.group,
            port = config.port,
            report_interval_ms = config.report_interval.as_millis() as u64,
            "pipeline started"
        );

        Ok(Self {
            running,
            counters,
            handles,
        })
    }

    /// Flip the running flag and join the stages front to back.
    pub fn stop(self) -> CountersSnapshot {
        self.running.store(false, Ordering::Release);
        for handle in self.handles {
            let _ = handle.join();
        }

        let snapshot = self.counters.snapshot();
        info!(
            packets = snapshot.packets_received,
            dropped = snapshot.packets_dropped,
            records = snapshot.records_parsed,
            parse_errors = snapshot.parse_errors,
            updates = snapshot.updates_emitted,
            "pipeline stopped"
        );
        snapshot
    }

    pub fn counters(&self) -> &PipelineCounters {
        &self.counters
    }
}
