//! Binary wire protocol for the multicast feed
//!
//! Every record is an 11-byte header (length, type tag, protocol timestamp)
//! followed by a packed little-endian payload. Multiple records ride
//! back-to-back in one datagram; the consumer walks them in order and
//! abandons the remainder of a datagram at the first malformed record.
//!
//! # Modules
//! - `messages`: Typed record structs and the closed `ParsedMessage` union
//! - `codec`: Field-wise encoder/decoder and the per-datagram `RecordWalker`

pub mod codec;
pub mod messages;

pub use codec::{encode, parse, Decoded, ProtocolError, RecordWalker, HEADER_SIZE};
pub use messages::{
    AddOrder, CancelOrder, ExecuteOrder, MessageBody, ParsedMessage, ReplaceOrder, TradeMessage,
};
