//! Fixed-width ticker symbols
//!
//! A symbol is exactly 8 bytes on the wire, NUL right-padded. Equality and
//! hashing reinterpret those bytes as one `u64`, which keeps symbol-keyed
//! map lookups O(1) with a single integer compare.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Wire width of a symbol field.
pub const SYMBOL_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("symbol {0:?} exceeds {SYMBOL_LENGTH} bytes")]
    TooLong(String),

    #[error("symbol is empty")]
    Empty,
}

/// Fixed 8-byte ticker symbol, NUL right-padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Symbol {
    bytes: [u8; SYMBOL_LENGTH],
}

impl Symbol {
    /// Build from a string, truncating anything past 8 bytes.
    pub fn new(s: &str) -> Self {
        let mut bytes = [0u8; SYMBOL_LENGTH];
        let src = s.as_bytes();
        let len = src.len().min(SYMBOL_LENGTH);
        bytes[..len].copy_from_slice(&src[..len]);
        Self { bytes }
    }

    /// Build from a string, rejecting empty or over-length input.
    ///
    /// Config loading uses this; the wire path uses `from_bytes`.
    pub fn try_new(s: &str) -> Result<Self, SymbolError> {
        if s.is_empty() {
            return Err(SymbolError::Empty);
        }
        if s.len() > SYMBOL_LENGTH {
            return Err(SymbolError::TooLong(s.to_string()));
        }
        Ok(Self::new(s))
    }

    /// Build from the raw wire field.
    pub const fn from_bytes(bytes: [u8; SYMBOL_LENGTH]) -> Self {
        Self { bytes }
    }

    /// The raw wire field.
    pub const fn as_bytes(&self) -> &[u8; SYMBOL_LENGTH] {
        &self.bytes
    }

    /// The 8 bytes reinterpreted as one little-endian integer.
    ///
    /// Two symbols are equal iff their keys are equal, so this is the value
    /// maps hash and compare.
    pub const fn as_key(&self) -> u64 {
        u64::from_le_bytes(self.bytes)
    }

    /// The symbol text without trailing padding.
    pub fn as_str(&self) -> &str {
        let end = self
            .bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(SYMBOL_LENGTH);
        std::str::from_utf8(&self.bytes[..end]).unwrap_or("")
    }
}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_key().hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::try_new(&s).map_err(serde::de::Error::custom)
    }
}
