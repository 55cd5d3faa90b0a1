//! Per-symbol price-level book
//!
//! Two `BTreeMap`s keyed by raw price, one per side, both ascending: best
//! bid is the last bid key, best ask the first ask key. Levels carry
//! additively-maintained totals; a level whose total reaches zero is
//! deleted so it can never be observed through a top-of-book query.

use std::collections::BTreeMap;

use serde::Serialize;

use types::numeric::{Price, Quantity};
use types::side::Side;
use types::symbol::Symbol;

/// Aggregate of all resting quantity at one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceLevel {
    pub price: Price,
    pub total_quantity: u64,
    pub order_count: u32,
}

impl PriceLevel {
    fn new(price: Price, quantity: Quantity) -> Self {
        Self {
            price,
            total_quantity: quantity.get() as u64,
            order_count: 1,
        }
    }
}

/// Order book for a single symbol.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    bids: BTreeMap<Price, PriceLevel>,
    asks: BTreeMap<Price, PriceLevel>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn side(&self, side: Side) -> &BTreeMap<Price, PriceLevel> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BTreeMap<Price, PriceLevel> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Credit `qty` to the level at `price`, creating the level if absent.
    pub fn add_qty(&mut self, side: Side, price: Price, qty: Quantity) {
        self.side_mut(side)
            .entry(price)
            .and_modify(|level| {
                level.total_quantity += qty.get() as u64;
                level.order_count += 1;
            })
            .or_insert_with(|| PriceLevel::new(price, qty));
    }

    /// Charge `qty` against the level at `price`, clamped at zero, and
    /// delete the level once empty. Unknown prices are ignored.
    pub fn remove_qty(&mut self, side: Side, price: Price, qty: Quantity) {
        let levels = self.side_mut(side);
        if let Some(level) = levels.get_mut(&price) {
            level.total_quantity = level.total_quantity.saturating_sub(qty.get() as u64);
            level.order_count = level.order_count.saturating_sub(1);
            if level.total_quantity == 0 {
                levels.remove(&price);
            }
        }
    }

    /// Best bid price, or zero when the bid side is empty.
    pub fn best_bid_price(&self) -> Price {
        self.bids
            .keys()
            .next_back()
            .copied()
            .unwrap_or(Price::ZERO)
    }

    /// Quantity at the best bid, or zero.
    pub fn best_bid_qty(&self) -> u64 {
        self.bids
            .values()
            .next_back()
            .map(|level| level.total_quantity)
            .unwrap_or(0)
    }

    /// Best ask price, or zero when the ask side is empty.
    pub fn best_ask_price(&self) -> Price {
        self.asks.keys().next().copied().unwrap_or(Price::ZERO)
    }

    /// Quantity at the best ask, or zero.
    pub fn best_ask_qty(&self) -> u64 {
        self.asks
            .values()
            .next()
            .map(|level| level.total_quantity)
            .unwrap_or(0)
    }

    /// Up to `n` bid levels, best (highest price) first.
    pub fn bid_levels(&self, n: usize) -> Vec<PriceLevel> {
        self.bids.values().rev().take(n).copied().collect()
    }

    /// Up to `n` ask levels, best (lowest price) first.
    pub fn ask_levels(&self, n: usize) -> Vec<PriceLevel> {
        self.asks.values().take(n).copied().collect()
    }

    pub fn bid_depth(&self) -> usize {
        self.bids.len()
    }

    pub fn ask_depth(&self) -> usize {
        self.asks.len()
    }

    /// The level at `(side, price)`, if present.
    pub fn level(&self, side: Side, price: Price) -> Option<&PriceLevel> {
        self.side(side).get(&price)
    }

    /// Point-in-time snapshot of the top `max_levels` of both sides.
    pub fn depth_snapshot(&self, symbol: Symbol, max_levels: usize) -> DepthSnapshot {
        DepthSnapshot {
            symbol,
            bids: self.bid_levels(max_levels),
            asks: self.ask_levels(max_levels),
        }
    }
}

/// Serializable depth snapshot; bids best-first descending, asks best-first
/// ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepthSnapshot {
    pub symbol: Symbol,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}
