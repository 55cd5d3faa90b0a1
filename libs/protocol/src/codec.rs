//! Encoder, decoder, and datagram record walker
//!
//! Encoding writes the header then the payload field by field in little
//! endian; decoding copies field-wise back out of the buffer. No typed
//! pointer is ever aliased over raw bytes, so the codec is sound under
//! strict aliasing and independent of host struct layout.

use thiserror::Error;
use types::clock::Timestamp;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::side::Side;
use types::symbol::{Symbol, SYMBOL_LENGTH};

use crate::messages::{
    AddOrder, CancelOrder, ExecuteOrder, MessageBody, ParsedMessage, ReplaceOrder, TradeMessage,
};

/// Header: length (u16) + tag (u8) + protocol timestamp (u64).
pub const HEADER_SIZE: usize = 11;

/// Decode-time failures. Any of these abandons the rest of the datagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("record length {length} exceeds remaining buffer ({remaining} bytes)")]
    Truncated { length: usize, remaining: usize },

    #[error("unknown record tag 0x{0:02x}")]
    UnknownType(u8),

    #[error("invalid side byte 0x{0:02x}")]
    InvalidSide(u8),
}

/// One decoded record: the typed message, its protocol timestamp, and how
/// many buffer bytes it occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub message: ParsedMessage,
    pub timestamp: Timestamp,
    pub consumed: usize,
}

/// Encode a record into `buf` at offset 0.
///
/// Returns the record's wire size, or 0 when the buffer is too small; the
/// caller closes the current datagram and starts a new one.
pub fn encode<M: MessageBody>(msg: &M, ts: Timestamp, buf: &mut [u8]) -> usize {
    let wire_size = M::WIRE_SIZE;
    if buf.len() < wire_size {
        return 0;
    }

    buf[0..2].copy_from_slice(&(wire_size as u16).to_le_bytes());
    buf[2] = M::TAG;
    buf[3..11].copy_from_slice(&ts.to_le_bytes());
    msg.write_payload(&mut buf[HEADER_SIZE..wire_size]);

    wire_size
}

/// Parse one record from the start of `buf`.
///
/// Validates that the header fits, that the advertised length is at least a
/// header and no longer than the remaining buffer, and that the tag and any
/// side byte are legal.
pub fn parse(buf: &[u8]) -> Result<Decoded, ProtocolError> {
    if buf.len() < HEADER_SIZE {
        return Err(ProtocolError::Truncated {
            length: HEADER_SIZE,
            remaining: buf.len(),
        });
    }

    let length = u16::from_le_bytes([buf[0], buf[1]]) as usize;
    let tag = buf[2];
    let timestamp = u64::from_le_bytes(buf[3..11].try_into().unwrap());

    if length < HEADER_SIZE || length > buf.len() {
        return Err(ProtocolError::Truncated {
            length,
            remaining: buf.len(),
        });
    }

    let payload = &buf[HEADER_SIZE..length];
    let message = match tag {
        AddOrder::TAG => {
            expect_len(payload, AddOrder::WIRE_SIZE - HEADER_SIZE, length, buf.len())?;
            let side_byte = payload[8];
            let side = Side::from_wire_byte(side_byte)
                .ok_or(ProtocolError::InvalidSide(side_byte))?;
            ParsedMessage::Add(AddOrder {
                order_id: read_order_id(&payload[0..8]),
                side,
                symbol: read_symbol(&payload[9..17]),
                price: read_price(&payload[17..21]),
                quantity: read_quantity(&payload[21..25]),
            })
        }
        CancelOrder::TAG => {
            expect_len(payload, CancelOrder::WIRE_SIZE - HEADER_SIZE, length, buf.len())?;
            ParsedMessage::Cancel(CancelOrder {
                order_id: read_order_id(&payload[0..8]),
            })
        }
        ExecuteOrder::TAG => {
            expect_len(payload, ExecuteOrder::WIRE_SIZE - HEADER_SIZE, length, buf.len())?;
            ParsedMessage::Execute(ExecuteOrder {
                order_id: read_order_id(&payload[0..8]),
                exec_quantity: read_quantity(&payload[8..12]),
            })
        }
        ReplaceOrder::TAG => {
            expect_len(payload, ReplaceOrder::WIRE_SIZE - HEADER_SIZE, length, buf.len())?;
            ParsedMessage::Replace(ReplaceOrder {
                order_id: read_order_id(&payload[0..8]),
                new_price: read_price(&payload[8..12]),
                new_quantity: read_quantity(&payload[12..16]),
            })
        }
        TradeMessage::TAG => {
            expect_len(payload, TradeMessage::WIRE_SIZE - HEADER_SIZE, length, buf.len())?;
            ParsedMessage::Trade(TradeMessage {
                symbol: read_symbol(&payload[0..8]),
                price: read_price(&payload[8..12]),
                quantity: read_quantity(&payload[12..16]),
                buy_order_id: read_order_id(&payload[16..24]),
                sell_order_id: read_order_id(&payload[24..32]),
            })
        }
        other => return Err(ProtocolError::UnknownType(other)),
    };

    Ok(Decoded {
        message,
        timestamp,
        consumed: length,
    })
}

fn expect_len(
    payload: &[u8],
    expected: usize,
    length: usize,
    remaining: usize,
) -> Result<(), ProtocolError> {
    if payload.len() != expected {
        return Err(ProtocolError::Truncated { length, remaining });
    }
    Ok(())
}

fn read_order_id(bytes: &[u8]) -> OrderId {
    OrderId::new(u64::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_price(bytes: &[u8]) -> Price {
    Price::from_raw(u32::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_quantity(bytes: &[u8]) -> Quantity {
    Quantity::new(u32::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_symbol(bytes: &[u8]) -> Symbol {
    let mut field = [0u8; SYMBOL_LENGTH];
    field.copy_from_slice(bytes);
    Symbol::from_bytes(field)
}

/// Walks back-to-back records in one datagram.
///
/// Yields decoded records until the buffer is exhausted or a record is
/// malformed; the first error stops the walk and everything after it counts
/// as abandoned.
pub struct RecordWalker<'a> {
    buf: &'a [u8],
    pos: usize,
    error: Option<ProtocolError>,
}

impl<'a> RecordWalker<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            error: None,
        }
    }

    /// The error that stopped the walk, if any.
    pub fn error(&self) -> Option<&ProtocolError> {
        self.error.as_ref()
    }

    /// Bytes not consumed as well-formed records.
    pub fn abandoned(&self) -> usize {
        self.buf.len() - self.pos
    }
}

impl Iterator for RecordWalker<'_> {
    type Item = Decoded;

    fn next(&mut self) -> Option<Decoded> {
        if self.error.is_some() || self.pos >= self.buf.len() {
            return None;
        }
        match parse(&self.buf[self.pos..]) {
            Ok(decoded) => {
                self.pos += decoded.consumed;
                Some(decoded)
            }
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_add() -> AddOrder {
        AddOrder {
            order_id: OrderId::new(12345),
            side: Side::Buy,
            symbol: Symbol::new("AAPL"),
            price: Price::from_raw(1_850_500),
            quantity: Quantity::new(300),
        }
    }

    #[test]
    fn test_encode_add_order_layout() {
        let mut buf = [0u8; 64];
        let written = encode(&sample_add(), 7777, &mut buf);

        assert_eq!(written, 36);
        // length = 0x0024 little-endian, then the 'A' tag
        assert_eq!(buf[0], 0x24);
        assert_eq!(buf[1], 0x00);
        assert_eq!(buf[2], b'A');
    }

    #[test]
    fn test_encode_buffer_too_small_writes_nothing() {
        let mut buf = [0xAAu8; 35];
        let written = encode(&sample_add(), 1, &mut buf);
        assert_eq!(written, 0);
        assert!(buf.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_add_order_roundtrip() {
        let msg = sample_add();
        let mut buf = [0u8; 64];
        let written = encode(&msg, 424242, &mut buf);

        let decoded = parse(&buf[..written]).unwrap();
        assert_eq!(decoded.message, ParsedMessage::Add(msg));
        assert_eq!(decoded.timestamp, 424242);
        assert_eq!(decoded.consumed, 36);
    }

    #[test]
    fn test_cancel_roundtrip() {
        let msg = CancelOrder {
            order_id: OrderId::new(99),
        };
        let mut buf = [0u8; 32];
        let written = encode(&msg, 5, &mut buf);
        assert_eq!(written, 19);

        let decoded = parse(&buf[..written]).unwrap();
        assert_eq!(decoded.message, ParsedMessage::Cancel(msg));
    }

    #[test]
    fn test_execute_roundtrip() {
        let msg = ExecuteOrder {
            order_id: OrderId::new(7),
            exec_quantity: Quantity::new(150),
        };
        let mut buf = [0u8; 32];
        let written = encode(&msg, 5, &mut buf);
        assert_eq!(written, 23);
        let decoded = parse(&buf[..written]).unwrap();
        assert_eq!(decoded.message, ParsedMessage::Execute(msg));
    }

    #[test]
    fn test_replace_roundtrip() {
        let msg = ReplaceOrder {
            order_id: OrderId::new(8),
            new_price: Price::from_raw(2_000_000),
            new_quantity: Quantity::new(75),
        };
        let mut buf = [0u8; 32];
        let written = encode(&msg, 5, &mut buf);
        assert_eq!(written, 27);
        let decoded = parse(&buf[..written]).unwrap();
        assert_eq!(decoded.message, ParsedMessage::Replace(msg));
    }

    #[test]
    fn test_trade_roundtrip() {
        let msg = TradeMessage {
            symbol: Symbol::new("TSLA"),
            price: Price::from_raw(2_500_000),
            quantity: Quantity::new(10),
            buy_order_id: OrderId::new(1),
            sell_order_id: OrderId::new(2),
        };
        let mut buf = [0u8; 64];
        let written = encode(&msg, 5, &mut buf);
        assert_eq!(written, 43);
        let decoded = parse(&buf[..written]).unwrap();
        assert_eq!(decoded.message, ParsedMessage::Trade(msg));
    }

    #[test]
    fn test_parse_unknown_tag() {
        let mut buf = [0u8; 19];
        buf[0..2].copy_from_slice(&19u16.to_le_bytes());
        buf[2] = b'Z';
        assert_eq!(parse(&buf), Err(ProtocolError::UnknownType(b'Z')));
    }

    #[test]
    fn test_parse_invalid_side() {
        let mut buf = [0u8; 64];
        let written = encode(&sample_add(), 1, &mut buf);
        buf[HEADER_SIZE + 8] = 0x07; // corrupt the side byte
        assert_eq!(
            parse(&buf[..written]),
            Err(ProtocolError::InvalidSide(0x07))
        );
    }

    #[test]
    fn test_parse_truncated_header() {
        let buf = [0u8; 5];
        assert!(matches!(
            parse(&buf),
            Err(ProtocolError::Truncated { remaining: 5, .. })
        ));
    }

    #[test]
    fn test_parse_length_past_buffer() {
        let mut buf = [0u8; 20];
        buf[0..2].copy_from_slice(&36u16.to_le_bytes());
        buf[2] = b'A';
        assert!(matches!(
            parse(&buf),
            Err(ProtocolError::Truncated {
                length: 36,
                remaining: 20
            })
        ));
    }

    #[test]
    fn test_walker_two_records_in_order() {
        let add = sample_add();
        let cancel = CancelOrder {
            order_id: OrderId::new(12345),
        };

        let mut buf = [0u8; 128];
        let first = encode(&add, 1, &mut buf);
        let second = encode(&cancel, 2, &mut buf[first..]);

        let walker = RecordWalker::new(&buf[..first + second]);
        let records: Vec<_> = walker.collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, ParsedMessage::Add(add));
        assert_eq!(records[1].message, ParsedMessage::Cancel(cancel));
    }

    #[test]
    fn test_walker_discards_trailing_garbage() {
        // AddOrder (36) + CancelOrder (19) + 5 trailing bytes = 60
        let mut buf = [0u8; 60];
        let first = encode(&sample_add(), 1, &mut buf);
        let second = encode(
            &CancelOrder {
                order_id: OrderId::new(6),
            },
            2,
            &mut buf[first..],
        );
        assert_eq!(first + second, 55);

        let mut walker = RecordWalker::new(&buf);
        let records: Vec<_> = walker.by_ref().collect();

        assert_eq!(records.len(), 2);
        assert_eq!(walker.abandoned(), 5);
        assert!(walker.error().is_some());
    }

    #[test]
    fn test_walker_empty_buffer() {
        let mut walker = RecordWalker::new(&[]);
        assert!(walker.next().is_none());
        assert_eq!(walker.abandoned(), 0);
        assert!(walker.error().is_none());
    }
}
