//! Values that flow between pipeline stages
//!
//! Everything here is `Copy` with no heap pointers so it can live directly
//! in an SPSC ring slot.

use protocol::messages::ParsedMessage;
use types::clock::Timestamp;
use types::numeric::Price;
use types::symbol::Symbol;

/// Largest datagram the receiver accepts (MTU bound).
pub const MAX_DATAGRAM: usize = 1500;

/// One received datagram plus its arrival timestamp. Q1 payload.
#[derive(Clone, Copy)]
pub struct RawPacket {
    pub bytes: [u8; MAX_DATAGRAM],
    pub len: u16,
    /// Monotonic arrival timestamp taken in the receiver.
    pub receive_ts: Timestamp,
}

impl RawPacket {
    pub fn empty() -> Self {
        Self {
            bytes: [0; MAX_DATAGRAM],
            len: 0,
            receive_ts: 0,
        }
    }

    /// The valid portion of the buffer.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

/// One decoded record plus both of its timestamps. Q2 payload.
#[derive(Debug, Clone, Copy)]
pub struct TimestampedMessage {
    pub message: ParsedMessage,
    /// Monotonic arrival timestamp of the carrying datagram.
    pub receive_ts: Timestamp,
    /// Midnight-relative timestamp from the record header.
    pub protocol_ts: Timestamp,
}

/// Top-of-book snapshot emitted after each book mutation. Q3 payload.
#[derive(Debug, Clone, Copy)]
pub struct BookUpdate {
    pub symbol: Symbol,
    pub best_bid: Price,
    pub best_bid_qty: u64,
    pub best_ask: Price,
    pub best_ask_qty: u64,
    pub receive_ts: Timestamp,
    /// Monotonic timestamp sampled right after the mutation.
    pub book_update_ts: Timestamp,
}

impl BookUpdate {
    /// End-to-end pipeline latency for the event behind this update.
    pub fn latency_ns(&self) -> u64 {
        self.book_update_ts.saturating_sub(self.receive_ts)
    }
}
