//! Identifier types for feed entities
//!
//! Order ids are assigned monotonically by the producer and are unique
//! within a session, so a plain `u64` newtype is all the consumer needs for
//! O(1) store lookups.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an order within one producer session.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id the producer hands out after this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
