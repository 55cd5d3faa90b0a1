//! Stateful event generator
//!
//! Keeps an inventory of every order it has added and not yet retired, so
//! Cancel/Execute/Replace always name a live order and the consumer's store
//! never sees an id it cannot resolve (absent packet loss). Event types are
//! drawn from a weighted distribution; all randomness flows from one seeded
//! ChaCha8 stream.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use protocol::codec::encode;
use protocol::messages::{AddOrder, CancelOrder, ExecuteOrder, ReplaceOrder, TradeMessage};
use types::clock::Timestamp;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::side::Side;
use types::symbol::Symbol;

use crate::config::SimConfig;
use crate::metrics::GenMetrics;

/// Add price jitter around the symbol's current price: ±0.5000.
const PRICE_JITTER_RAW: i64 = 5_000;
/// Random walk applied to a symbol's current price after each trade: ±0.0050.
const PRICE_WALK_RAW: i64 = 50;
/// Order quantity bounds, shares.
const MIN_QTY: u32 = 10;
const MAX_QTY: u32 = 1_000;

/// Event type weights out of 100: Add 40, Cancel 25, Execute 20,
/// Replace 10, Trade 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Add,
    Cancel,
    Execute,
    Replace,
    Trade,
}

/// A producer-side live order.
#[derive(Debug, Clone, Copy)]
struct LiveOrder {
    id: OrderId,
    side: Side,
    symbol_index: usize,
    price: Price,
    remaining: u32,
}

/// Weighted random event source with internal order inventory.
pub struct EventGenerator {
    rng: ChaCha8Rng,
    symbols: Vec<Symbol>,
    /// Current price per symbol, parallel to `symbols`.
    prices: Vec<Price>,
    inventory: Vec<LiveOrder>,
    next_id: OrderId,
    metrics: GenMetrics,
}

impl EventGenerator {
    pub fn new(config: &SimConfig) -> Self {
        let symbols = config.symbols.clone();
        let prices = symbols
            .iter()
            .map(|&symbol| config.initial_price(symbol))
            .collect();

        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            symbols,
            prices,
            inventory: Vec::with_capacity(4_096),
            next_id: OrderId::new(1),
            metrics: GenMetrics::default(),
        }
    }

    /// Generate one event and encode it into `buf`.
    ///
    /// Returns the record's wire size, or 0 when `buf` cannot hold it; in
    /// that case no state changed and the caller should close the current
    /// datagram.
    pub fn emit(&mut self, ts: Timestamp, buf: &mut [u8]) -> usize {
        match self.pick_kind() {
            EventKind::Add => self.emit_add(ts, buf),
            EventKind::Cancel => self.emit_cancel(ts, buf),
            EventKind::Execute => self.emit_execute(ts, buf),
            EventKind::Replace => self.emit_replace(ts, buf),
            EventKind::Trade => self.emit_trade(ts, buf),
        }
    }

    /// Weighted category draw, falling back to Add when the drawn type
    /// needs a live order and the inventory is empty.
    fn pick_kind(&mut self) -> EventKind {
        let roll = self.rng.gen_range(0u32..100);
        let kind = match roll {
            0..=39 => EventKind::Add,
            40..=64 => EventKind::Cancel,
            65..=84 => EventKind::Execute,
            85..=94 => EventKind::Replace,
            _ => EventKind::Trade,
        };

        match kind {
            EventKind::Cancel | EventKind::Execute | EventKind::Replace
                if self.inventory.is_empty() =>
            {
                EventKind::Add
            }
            kind => kind,
        }
    }

    fn emit_add(&mut self, ts: Timestamp, buf: &mut [u8]) -> usize {
        let symbol_index = self.rng.gen_range(0..self.symbols.len());
        let side = if self.rng.gen_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };
        let jitter = self.rng.gen_range(-PRICE_JITTER_RAW..=PRICE_JITTER_RAW);
        let price = self.prices[symbol_index].offset(jitter);
        let quantity = self.rng.gen_range(MIN_QTY..=MAX_QTY);

        let msg = AddOrder {
            order_id: self.next_id,
            side,
            symbol: self.symbols[symbol_index],
            price,
            quantity: Quantity::new(quantity),
        };

        let written = encode(&msg, ts, buf);
        if written > 0 {
            self.inventory.push(LiveOrder {
                id: self.next_id,
                side,
                symbol_index,
                price,
                remaining: quantity,
            });
            self.next_id = self.next_id.next();
            self.metrics.record(EventKind::Add);
        }
        written
    }

    fn emit_cancel(&mut self, ts: Timestamp, buf: &mut [u8]) -> usize {
        let index = self.rng.gen_range(0..self.inventory.len());
        let msg = CancelOrder {
            order_id: self.inventory[index].id,
        };

        let written = encode(&msg, ts, buf);
        if written > 0 {
            self.inventory.swap_remove(index);
            self.metrics.record(EventKind::Cancel);
        }
        written
    }

    fn emit_execute(&mut self, ts: Timestamp, buf: &mut [u8]) -> usize {
        let index = self.rng.gen_range(0..self.inventory.len());
        let remaining = self.inventory[index].remaining;
        let fill = self.rng.gen_range(1..=remaining);
        let msg = ExecuteOrder {
            order_id: self.inventory[index].id,
            exec_quantity: Quantity::new(fill),
        };

        let written = encode(&msg, ts, buf);
        if written > 0 {
            if fill == remaining {
                self.inventory.swap_remove(index);
            } else {
                self.inventory[index].remaining -= fill;
            }
            self.metrics.record(EventKind::Execute);
        }
        written
    }

    fn emit_replace(&mut self, ts: Timestamp, buf: &mut [u8]) -> usize {
        let index = self.rng.gen_range(0..self.inventory.len());
        let jitter = self.rng.gen_range(-PRICE_JITTER_RAW..=PRICE_JITTER_RAW);
        let new_price = self.inventory[index].price.offset(jitter);
        let new_quantity = self.rng.gen_range(MIN_QTY..=MAX_QTY);
        let msg = ReplaceOrder {
            order_id: self.inventory[index].id,
            new_price,
            new_quantity: Quantity::new(new_quantity),
        };

        let written = encode(&msg, ts, buf);
        if written > 0 {
            let order = &mut self.inventory[index];
            order.price = new_price;
            order.remaining = new_quantity;
            self.metrics.record(EventKind::Replace);
        }
        written
    }

    fn emit_trade(&mut self, ts: Timestamp, buf: &mut [u8]) -> usize {
        let symbol_index = self.rng.gen_range(0..self.symbols.len());
        let quantity = self.rng.gen_range(MIN_QTY..=MAX_QTY);
        let buy_order_id = self.random_inventory_id();
        let sell_order_id = self.random_inventory_id();

        let msg = TradeMessage {
            symbol: self.symbols[symbol_index],
            price: self.prices[symbol_index],
            quantity: Quantity::new(quantity),
            buy_order_id,
            sell_order_id,
        };

        let written = encode(&msg, ts, buf);
        if written > 0 {
            let walk = self.rng.gen_range(-PRICE_WALK_RAW..=PRICE_WALK_RAW);
            self.prices[symbol_index] = self.prices[symbol_index].offset(walk);
            self.metrics.record(EventKind::Trade);
        }
        written
    }

    /// A live order id for trade prints, or zero when nothing rests.
    fn random_inventory_id(&mut self) -> OrderId {
        if self.inventory.is_empty() {
            return OrderId::new(0);
        }
        let index = self.rng.gen_range(0..self.inventory.len());
        self.inventory[index].id
    }

    /// Orders currently live in the generator's inventory.
    pub fn live_orders(&self) -> usize {
        self.inventory.len()
    }

    pub fn metrics(&self) -> &GenMetrics {
        &self.metrics
    }
}
