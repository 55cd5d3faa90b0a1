//! Order side and its single-byte wire encoding

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (bid or ask).
///
/// The discriminants are the wire bytes; decoding any other byte is a
/// protocol error handled by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Side {
    /// Buy order (bid)
    Buy = 0x01,
    /// Sell order (ask)
    Sell = 0x02,
}

impl Side {
    /// The byte this side is encoded as on the wire.
    pub const fn wire_byte(self) -> u8 {
        self as u8
    }

    /// Decode a wire byte. Returns `None` for anything but 0x01/0x02.
    pub const fn from_wire_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Side::Buy),
            0x02 => Some(Side::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_byte_values() {
        assert_eq!(Side::Buy.wire_byte(), 0x01);
        assert_eq!(Side::Sell.wire_byte(), 0x02);
    }

    #[test]
    fn test_from_wire_byte() {
        assert_eq!(Side::from_wire_byte(0x01), Some(Side::Buy));
        assert_eq!(Side::from_wire_byte(0x02), Some(Side::Sell));
        assert_eq!(Side::from_wire_byte(0x00), None);
        assert_eq!(Side::from_wire_byte(0xFF), None);
    }
}
