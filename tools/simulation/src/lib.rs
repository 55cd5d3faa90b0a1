//! Feed Producer
//!
//! Fabricates a protocol-legal stream of order-lifecycle events and
//! broadcasts it over UDP multicast. The generator keeps its own inventory
//! of live orders so every Cancel/Execute/Replace references a real order,
//! and every choice it makes comes from one seeded RNG, so the same seed
//! reproduces the exact datagram stream.
//!
//! # Modules
//! - `config` — `SimConfig` TOML loader and validation
//! - `generator` — Weighted event generation over the order inventory
//! - `batcher` — Datagram filling and absolute-deadline rate pacing
//! - `transport` — UDP multicast sender (and in-memory capture for tests)
//! - `metrics` — Per-event-type emission counters
//! - `runner` — The produce/pace/send loop

pub mod batcher;
pub mod config;
pub mod generator;
pub mod metrics;
pub mod runner;
pub mod transport;
