//! Order store and per-symbol book reconstruction
//!
//! The store answers "which order is this id" in O(1); each symbol's book
//! aggregates live orders into price-sorted levels per side. Both are owned
//! exclusively by the book-engine pipeline stage, so nothing here is
//! thread-safe and nothing needs to be.

mod engine;
mod order_book;
mod order_store;

pub use engine::{BookEngine, EngineCounters};
pub use order_book::{DepthSnapshot, OrderBook, PriceLevel};
pub use order_store::{Order, OrderStore};
