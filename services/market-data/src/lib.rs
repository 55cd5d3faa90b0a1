//! Feed Consumer Service
//!
//! Joins a multicast group, decodes the binary feed, rebuilds per-symbol
//! limit order books, and reports end-to-end latency quantiles and
//! top-of-book quotes.
//!
//! # Architecture
//!
//! ```text
//!  multicast datagrams
//!         │
//!    ┌────▼─────┐   Q1    ┌────────┐   Q2    ┌──────┐   Q3    ┌──────┐
//!    │ Receiver ├────────►│ Parser ├────────►│ Book ├────────►│ Sink │
//!    └──────────┘ packets └────────┘ records └──────┘ updates └──────┘
//! ```
//!
//! Each stage owns one OS thread; the queues between them are SPSC rings,
//! the only shared mutable state in the process. The receiver drops (and
//! counts) packets when Q1 is full; interior stages spin-yield.

pub mod book;
pub mod display;
pub mod error;
pub mod pipeline;
pub mod socket;
pub mod stats;

pub use error::FeedError;
