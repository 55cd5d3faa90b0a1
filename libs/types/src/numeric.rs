//! Fixed-point price and quantity types
//!
//! Prices travel on the wire as unsigned 32-bit integers scaled by 10,000
//! (four implied decimal places), so every protocol and book comparison is
//! plain integer arithmetic. Floating point appears only at display
//! boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Implied decimal scale: raw price = dollars × 10,000.
pub const PRICE_SCALE: u32 = 10_000;

/// Fixed-point price with four implied decimal places.
///
/// `Price::from_raw(1_850_500)` is $185.0500. Ordering and equality compare
/// the raw integer, which makes `Price` usable directly as an ordered map
/// key on the book's hot path.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u32);

impl Price {
    /// Price of zero, used as the "empty side" sentinel in top-of-book queries.
    pub const ZERO: Price = Price(0);

    /// Construct from a raw fixed-point value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw fixed-point value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Construct from a dollar amount. Display/config boundary only.
    pub fn from_f64(dollars: f64) -> Self {
        Self((dollars * PRICE_SCALE as f64) as u32)
    }

    /// Dollar amount as a float. Display boundary only.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }

    /// Shift the price by a signed raw offset, saturating at the u32 bounds.
    pub fn offset(self, delta: i64) -> Self {
        let shifted = (self.0 as i64).saturating_add(delta);
        Self(shifted.clamp(0, u32::MAX as i64) as u32)
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:04}", self.0 / PRICE_SCALE, self.0 % PRICE_SCALE)
    }
}

/// Share count.
///
/// Remaining quantities in the consumer's order store are mutated with the
/// saturating helpers so a malformed execute can never underflow.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub const fn new(shares: u32) -> Self {
        Self(shares)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Subtract a fill, flooring at zero.
    pub fn saturating_sub(self, rhs: Quantity) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// The smaller of the two quantities.
    pub fn min(self, rhs: Quantity) -> Self {
        Self(self.0.min(rhs.0))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_raw_roundtrip() {
        let price = Price::from_raw(1_850_500);
        assert_eq!(price.raw(), 1_850_500);
        assert_eq!(price.to_f64(), 185.05);
    }

    #[test]
    fn test_price_from_f64() {
        assert_eq!(Price::from_f64(185.05), Price::from_raw(1_850_500));
        assert_eq!(Price::from_f64(0.0), Price::ZERO);
    }

    #[test]
    fn test_price_display_pads_decimals() {
        assert_eq!(Price::from_raw(1_850_500).to_string(), "185.0500");
        assert_eq!(Price::from_raw(25).to_string(), "0.0025");
    }

    #[test]
    fn test_price_ordering_is_raw_integer() {
        assert!(Price::from_raw(1_851_000) > Price::from_raw(1_850_000));
        assert_eq!(Price::from_raw(42), Price::from_raw(42));
    }

    #[test]
    fn test_price_offset_saturates() {
        assert_eq!(Price::from_raw(100).offset(-200), Price::ZERO);
        assert_eq!(Price::from_raw(100).offset(50), Price::from_raw(150));
        assert_eq!(Price::from_raw(u32::MAX).offset(10), Price::from_raw(u32::MAX));
    }

    #[test]
    fn test_quantity_saturating_sub() {
        let qty = Quantity::new(100);
        assert_eq!(qty.saturating_sub(Quantity::new(30)), Quantity::new(70));
        assert_eq!(qty.saturating_sub(Quantity::new(300)), Quantity::ZERO);
    }

    #[test]
    fn test_serde_transparent_raw() {
        let json = serde_json::to_string(&Price::from_raw(1_850_500)).unwrap();
        assert_eq!(json, "1850500");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Price::from_raw(1_850_500));
    }
}
