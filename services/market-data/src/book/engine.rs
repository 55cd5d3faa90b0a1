//! Book engine: applies decoded events to the store and the books
//!
//! Single-threaded: the pipeline's book stage is the only caller. Cancel/Execute/Replace of an id the store does not know are
//! silent no-ops (the feed has no retransmission, so unknown ids are
//! expected after a drop); they are counted for diagnostics.

use ahash::AHashMap;

use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::side::Side;
use types::symbol::Symbol;

use protocol::messages::ParsedMessage;

use super::order_book::OrderBook;
use super::order_store::{Order, OrderStore};

/// Diagnostic counters maintained by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineCounters {
    /// Events that mutated a book.
    pub events_applied: u64,
    /// Cancel/Execute/Replace events whose id was not in the store.
    pub unknown_orders: u64,
    /// Trade prints seen (never mutate the book).
    pub trades_seen: u64,
}

/// Process-wide book state: every live order plus one book per symbol.
pub struct BookEngine {
    orders: OrderStore,
    books: AHashMap<Symbol, OrderBook>,
    counters: EngineCounters,
}

impl BookEngine {
    pub fn new() -> Self {
        Self {
            orders: OrderStore::new(),
            books: AHashMap::new(),
            counters: EngineCounters::default(),
        }
    }

    /// Apply one decoded message.
    ///
    /// Returns the symbol whose book changed, or `None` when nothing did
    /// (unknown order, trade print). The pipeline emits a top-of-book
    /// update iff this returns a symbol.
    pub fn apply(&mut self, message: &ParsedMessage) -> Option<Symbol> {
        match message {
            ParsedMessage::Add(msg) => Some(self.add_order(
                msg.order_id,
                msg.side,
                msg.symbol,
                msg.price,
                msg.quantity,
            )),
            ParsedMessage::Cancel(msg) => self.cancel_order(msg.order_id),
            ParsedMessage::Execute(msg) => self.execute_order(msg.order_id, msg.exec_quantity),
            ParsedMessage::Replace(msg) => {
                self.replace_order(msg.order_id, msg.new_price, msg.new_quantity)
            }
            ParsedMessage::Trade(_) => {
                self.counters.trades_seen += 1;
                None
            }
        }
    }

    /// Store a new order and credit its quantity to the book.
    pub fn add_order(
        &mut self,
        id: OrderId,
        side: Side,
        symbol: Symbol,
        price: Price,
        qty: Quantity,
    ) -> Symbol {
        self.orders.insert(Order {
            id,
            side,
            symbol,
            price,
            remaining: qty,
        });
        self.books
            .entry(symbol)
            .or_default()
            .add_qty(side, price, qty);
        self.counters.events_applied += 1;
        symbol
    }

    /// Remove an order entirely, charging its full remaining quantity off
    /// its level.
    pub fn cancel_order(&mut self, id: OrderId) -> Option<Symbol> {
        let order = match self.orders.remove(id) {
            Some(order) => order,
            None => {
                self.counters.unknown_orders += 1;
                return None;
            }
        };

        if let Some(book) = self.books.get_mut(&order.symbol) {
            book.remove_qty(order.side, order.price, order.remaining);
        }
        self.counters.events_applied += 1;
        Some(order.symbol)
    }

    /// Apply a fill. A fill at or above the remaining quantity is a full
    /// fill: the order is erased.
    pub fn execute_order(&mut self, id: OrderId, fill_qty: Quantity) -> Option<Symbol> {
        let order = match self.orders.get_mut(id) {
            Some(order) => order,
            None => {
                self.counters.unknown_orders += 1;
                return None;
            }
        };

        let charged = fill_qty.min(order.remaining);
        let (side, symbol, price) = (order.side, order.symbol, order.price);
        let fully_filled = fill_qty >= order.remaining;

        if fully_filled {
            self.orders.remove(id);
        } else {
            order.remaining = order.remaining.saturating_sub(fill_qty);
        }

        if let Some(book) = self.books.get_mut(&symbol) {
            book.remove_qty(side, price, charged);
        }
        self.counters.events_applied += 1;
        Some(symbol)
    }

    /// Move an order to a new price and quantity.
    ///
    /// The old level is charged the order's current remaining; the new
    /// level is credited the replacement quantity. A replace for an unknown
    /// id does not create an order.
    pub fn replace_order(
        &mut self,
        id: OrderId,
        new_price: Price,
        new_qty: Quantity,
    ) -> Option<Symbol> {
        let order = match self.orders.get_mut(id) {
            Some(order) => order,
            None => {
                self.counters.unknown_orders += 1;
                return None;
            }
        };

        let (side, symbol, old_price, old_remaining) =
            (order.side, order.symbol, order.price, order.remaining);
        order.price = new_price;
        order.remaining = new_qty;

        let book = self.books.entry(symbol).or_default();
        book.remove_qty(side, old_price, old_remaining);
        book.add_qty(side, new_price, new_qty);
        self.counters.events_applied += 1;
        Some(symbol)
    }

    /// Resolve the symbol an event would touch without applying it.
    ///
    /// Used by callers that need the symbol of a Cancel before the order is
    /// erased.
    pub fn symbol_of(&self, id: OrderId) -> Option<Symbol> {
        self.orders.get(id).map(|order| order.symbol)
    }

    /// The book for `symbol`, if any event has touched it.
    pub fn book(&self, symbol: Symbol) -> Option<&OrderBook> {
        self.books.get(&symbol)
    }

    /// Top of book for `symbol`: (best_bid, bid_qty, best_ask, ask_qty),
    /// zeros for empty sides or an unknown symbol.
    pub fn top_of_book(&self, symbol: Symbol) -> (Price, u64, Price, u64) {
        match self.books.get(&symbol) {
            Some(book) => (
                book.best_bid_price(),
                book.best_bid_qty(),
                book.best_ask_price(),
                book.best_ask_qty(),
            ),
            None => (Price::ZERO, 0, Price::ZERO, 0),
        }
    }

    /// Symbols with a book, in no particular order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.books.keys().copied()
    }

    pub fn live_orders(&self) -> usize {
        self.orders.len()
    }

    pub fn counters(&self) -> EngineCounters {
        self.counters
    }
}

impl Default for BookEngine {
    fn default() -> Self {
        Self::new()
    }
}
