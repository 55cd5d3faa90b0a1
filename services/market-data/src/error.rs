//! Consumer error taxonomy
//!
//! Only startup and shutdown can fail fatally. Hot-path conditions (queue
//! full, truncated record, unknown order) are counters, never errors.

use std::io;
use std::net::Ipv4Addr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to bind {addr}:{port}: {source}")]
    Bind {
        addr: Ipv4Addr,
        port: u16,
        source: io::Error,
    },

    #[error("failed to join multicast group {group}: {source}")]
    JoinGroup { group: Ipv4Addr, source: io::Error },

    #[error("socket configuration failed: {0}")]
    Socket(#[from] io::Error),

    #[error("async runtime construction failed: {0}")]
    Runtime(io::Error),
}
