//! The two clocks of the feed
//!
//! Protocol timestamps count nanoseconds since local midnight and ride the
//! wire. Measurement timestamps count nanoseconds since a process-local
//! monotonic epoch and never leave the process. Latency math must only ever
//! subtract timestamps taken from the same clock.

use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Nanosecond timestamp. Which clock it came from is contextual.
pub type Timestamp = u64;

const NANOS_PER_DAY: u64 = 86_400 * 1_000_000_000;

fn monotonic_epoch() -> Instant {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    *EPOCH.get_or_init(Instant::now)
}

/// Clock access for both timestamp domains.
pub struct Clock;

impl Clock {
    /// Nanoseconds since the process monotonic epoch.
    ///
    /// Receive and book-update timestamps use this; differences between two
    /// values are wall-clock-drift-free latencies.
    pub fn monotonic_ns() -> Timestamp {
        monotonic_epoch().elapsed().as_nanos() as u64
    }

    /// Nanoseconds since the most recent UTC midnight, for protocol headers.
    pub fn nanos_since_midnight() -> Timestamp {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        (since_epoch.as_nanos() as u64) % NANOS_PER_DAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_never_goes_backwards() {
        let a = Clock::monotonic_ns();
        let b = Clock::monotonic_ns();
        assert!(b >= a);
    }

    #[test]
    fn test_nanos_since_midnight_bounded() {
        let ts = Clock::nanos_since_midnight();
        assert!(ts < NANOS_PER_DAY);
    }
}
