//! The produce → batch → pace → send loop

use std::io;

use tracing::info;

use types::clock::Clock;

use crate::batcher::{Batcher, Pacer};
use crate::config::SimConfig;
use crate::generator::EventGenerator;
use crate::metrics::GenMetrics;
use crate::transport::Transport;

/// What a finished run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub datagrams: u64,
    pub bytes: u64,
    pub elapsed_ns: u64,
    pub metrics: GenMetrics,
}

impl RunSummary {
    pub fn events_per_sec(&self) -> f64 {
        if self.elapsed_ns == 0 {
            return 0.0;
        }
        self.metrics.total() as f64 / (self.elapsed_ns as f64 / 1e9)
    }
}

/// Run the producer until the configured duration elapses.
///
/// There is no drain of the inventory at the end: the stream just stops,
/// and consumers are expected to tolerate that.
pub fn run(config: &SimConfig, transport: &mut dyn Transport) -> io::Result<RunSummary> {
    let mut generator = EventGenerator::new(config);
    let mut batcher = Batcher::new();

    let start = Clock::monotonic_ns();
    let end = start + config.duration_seconds * 1_000_000_000;
    let mut pacer = Pacer::new(config.messages_per_second, start);

    let mut datagrams = 0u64;
    let mut bytes = 0u64;

    info!(
        rate = config.messages_per_second,
        duration_s = config.duration_seconds,
        seed = config.seed,
        symbols = config.symbols.len(),
        "producer run starting"
    );

    while Clock::monotonic_ns() < end {
        let (payload, events) = batcher.fill(&mut generator);
        if events == 0 {
            break;
        }

        transport.send(payload)?;
        datagrams += 1;
        bytes += payload.len() as u64;

        pacer.pace(events);
    }

    let summary = RunSummary {
        datagrams,
        bytes,
        elapsed_ns: Clock::monotonic_ns() - start,
        metrics: *generator.metrics(),
    };

    info!(
        datagrams = summary.datagrams,
        bytes = summary.bytes,
        events = summary.metrics.total(),
        live_orders = generator.live_orders(),
        "producer run finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::CaptureTransport;
    use std::collections::HashMap;
    use std::net::Ipv4Addr;
    use types::symbol::Symbol;

    #[test]
    fn test_short_run_sends_datagrams() {
        let config = SimConfig {
            multicast_address: Ipv4Addr::new(239, 1, 1, 1),
            port: 12345,
            symbols: vec![Symbol::new("AAPL"), Symbol::new("TSLA")],
            messages_per_second: 100_000,
            duration_seconds: 1,
            seed: 42,
            initial_prices: HashMap::new(),
        };

        let mut transport = CaptureTransport::new();
        let summary = run(&config, &mut transport).unwrap();

        assert!(summary.datagrams > 0);
        assert_eq!(summary.datagrams as usize, transport.datagrams.len());
        assert_eq!(summary.bytes as usize, transport.total_bytes());
        // Rate-limited to ~100k events over one second; allow wide slack
        // for a loaded test machine.
        assert!(summary.metrics.total() >= 50_000);
        assert!(summary.metrics.total() <= 150_000);
    }
}
