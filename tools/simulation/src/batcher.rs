//! Datagram batching and rate pacing
//!
//! The batcher packs back-to-back records into one send buffer until the
//! next record might not fit; the pacer turns a target event rate into an
//! absolute monotonic deadline per batch. Deadlines accumulate, so a tick
//! that runs late is compensated by a tighter one after it.

use std::thread;
use std::time::Duration;

use protocol::messages::{MessageBody, TradeMessage};
use types::clock::{Clock, Timestamp};

use crate::generator::EventGenerator;

/// Target datagram payload; comfortably under a 1500-byte MTU.
pub const MAX_DATAGRAM_PAYLOAD: usize = 1_400;

/// Largest record on the wire; the batcher stops filling once less than
/// this remains.
const MAX_RECORD_SIZE: usize = TradeMessage::WIRE_SIZE;

/// Packs generator output into datagram-sized buffers.
pub struct Batcher {
    buf: [u8; MAX_DATAGRAM_PAYLOAD],
}

impl Batcher {
    pub fn new() -> Self {
        Self {
            buf: [0; MAX_DATAGRAM_PAYLOAD],
        }
    }

    /// Fill one datagram with records, stamping each with the protocol
    /// clock. Returns the payload and the number of events packed.
    pub fn fill(&mut self, generator: &mut EventGenerator) -> (&[u8], u32) {
        let mut len = 0;
        let mut events = 0;

        while len + MAX_RECORD_SIZE <= MAX_DATAGRAM_PAYLOAD {
            let written = generator.emit(Clock::nanos_since_midnight(), &mut self.buf[len..]);
            if written == 0 {
                break;
            }
            len += written;
            events += 1;
        }

        (&self.buf[..len], events)
    }
}

impl Default for Batcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Absolute-deadline pacer for a target events-per-second rate.
pub struct Pacer {
    interval_ns: u64,
    next_send: Timestamp,
}

impl Pacer {
    pub fn new(events_per_second: u32, now: Timestamp) -> Self {
        Self {
            interval_ns: 1_000_000_000 / events_per_second as u64,
            next_send: now,
        }
    }

    /// Advance the deadline by `events` ticks and sleep until it. Returns
    /// immediately when the deadline is already behind us.
    pub fn pace(&mut self, events: u32) {
        self.next_send += self.interval_ns * events as u64;
        let now = Clock::monotonic_ns();
        if self.next_send > now {
            thread::sleep(Duration::from_nanos(self.next_send - now));
        }
    }

    /// The current deadline.
    pub fn next_send(&self) -> Timestamp {
        self.next_send
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use protocol::RecordWalker;
    use std::collections::HashMap;
    use std::net::Ipv4Addr;
    use types::symbol::Symbol;

    fn test_generator() -> EventGenerator {
        EventGenerator::new(&SimConfig {
            multicast_address: Ipv4Addr::new(239, 1, 1, 1),
            port: 12345,
            symbols: vec![Symbol::new("AAPL")],
            messages_per_second: 1_000,
            duration_seconds: 1,
            seed: 42,
            initial_prices: HashMap::new(),
        })
    }

    #[test]
    fn test_fill_packs_multiple_records() {
        let mut generator = test_generator();
        let mut batcher = Batcher::new();

        let (payload, events) = batcher.fill(&mut generator);
        // Smallest record is 19 bytes, largest 43: a 1400-byte buffer takes
        // dozens of records.
        assert!(events >= (MAX_DATAGRAM_PAYLOAD / MAX_RECORD_SIZE) as u32);
        assert!(payload.len() <= MAX_DATAGRAM_PAYLOAD);
        assert!(payload.len() > MAX_DATAGRAM_PAYLOAD - MAX_RECORD_SIZE);
    }

    #[test]
    fn test_fill_produces_walkable_datagram() {
        let mut generator = test_generator();
        let mut batcher = Batcher::new();

        let (payload, events) = batcher.fill(&mut generator);
        let mut walker = RecordWalker::new(payload);
        let decoded = walker.by_ref().count();

        assert_eq!(decoded as u32, events);
        assert!(walker.error().is_none());
        assert_eq!(walker.abandoned(), 0);
    }

    #[test]
    fn test_pacer_accumulates_deadlines() {
        let mut pacer = Pacer::new(1_000_000, 0); // 1 µs per event
        assert_eq!(pacer.next_send(), 0);

        pacer.pace(100);
        assert_eq!(pacer.next_send(), 100_000);
        pacer.pace(50);
        assert_eq!(pacer.next_send(), 150_000);
    }

    #[test]
    fn test_pacer_sleeps_toward_target_rate() {
        use std::time::Instant;

        // 100k events/sec, batches of 1000 → ~10ms per batch.
        let start_ns = Clock::monotonic_ns();
        let mut pacer = Pacer::new(100_000, start_ns);

        let started = Instant::now();
        for _ in 0..5 {
            pacer.pace(1_000);
        }
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(40), "paced too fast: {elapsed:?}");
    }
}
