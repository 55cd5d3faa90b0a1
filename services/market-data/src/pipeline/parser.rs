//! Stage 2: datagram parser
//!
//! Drains Q1 and walks each datagram's back-to-back records. A malformed
//! record abandons the rest of that datagram only; drops never happen at
//! the record boundary, so a partially-applied datagram is impossible. Q2
//! pushes spin-yield; the parser is expected to outrun the receiver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, trace};

use protocol::RecordWalker;
use spsc::{Consumer, Producer};

use super::messages::{RawPacket, TimestampedMessage};
use super::PipelineCounters;

pub struct Parser {
    rx: Consumer<RawPacket>,
    tx: Producer<TimestampedMessage>,
    counters: Arc<PipelineCounters>,
    running: Arc<AtomicBool>,
}

impl Parser {
    pub fn new(
        rx: Consumer<RawPacket>,
        tx: Producer<TimestampedMessage>,
        counters: Arc<PipelineCounters>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            rx,
            tx,
            counters,
            running,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        thread::Builder::new()
            .name("feed-parser".into())
            .spawn(move || self.run())
            .expect("spawn parser thread")
    }

    fn run(mut self) {
        while self.running.load(Ordering::Acquire) {
            match self.rx.try_pop() {
                Some(packet) => self.parse_packet(&packet),
                None => thread::yield_now(),
            }
        }
        debug!("parser loop exited");
    }

    fn parse_packet(&mut self, packet: &RawPacket) {
        let mut walker = RecordWalker::new(packet.payload());

        for decoded in walker.by_ref() {
            self.counters.records_parsed.fetch_add(1, Ordering::Relaxed);

            let message = TimestampedMessage {
                message: decoded.message,
                receive_ts: packet.receive_ts,
                protocol_ts: decoded.timestamp,
            };

            // Spin-yield on a full Q2; bail out only on shutdown.
            while !self.tx.try_push(message) {
                if !self.running.load(Ordering::Acquire) {
                    return;
                }
                thread::yield_now();
            }
        }

        if let Some(err) = walker.error() {
            self.counters.parse_errors.fetch_add(1, Ordering::Relaxed);
            trace!(%err, abandoned = walker.abandoned(), "abandoning rest of datagram");
        }
    }
}
