//! Per-interval latency accounting
//!
//! The sink records one end-to-end latency sample per book update. Once per
//! reporting interval the sample buffer is sorted in place, quantiles are
//! read at `⌊n·p⌋`, and everything resets. Each report describes only its
//! own interval.

use serde::Serialize;

use types::clock::Timestamp;

/// Quantiles sampled per report.
const QUANTILES: [f64; 4] = [0.50, 0.95, 0.99, 0.999];

/// One interval's worth of pipeline statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsReport {
    /// Interval length actually covered, nanoseconds.
    pub interval_ns: u64,
    /// Messages processed by the book stage this interval.
    pub messages: u64,
    /// Book updates that reached the sink this interval.
    pub updates: u64,
    pub messages_per_sec: f64,
    pub updates_per_sec: f64,
    /// Latency quantiles in microseconds, zero when no samples arrived.
    pub p50_us: f64,
    pub p95_us: f64,
    pub p99_us: f64,
    pub p999_us: f64,
}

impl StatsReport {
    /// The one-line form printed every interval.
    pub fn line(&self) -> String {
        format!(
            "msgs/s {:>9.0} | updates/s {:>9.0} | latency µs p50 {:.1} p95 {:.1} p99 {:.1} p999 {:.1}",
            self.messages_per_sec,
            self.updates_per_sec,
            self.p50_us,
            self.p95_us,
            self.p99_us,
            self.p999_us,
        )
    }
}

/// Latency sample buffer, reset on every report.
pub struct LatencyStats {
    latencies_ns: Vec<u64>,
    updates: u64,
    interval_start: Timestamp,
}

impl LatencyStats {
    pub fn new(now: Timestamp) -> Self {
        Self {
            latencies_ns: Vec::with_capacity(1 << 16),
            updates: 0,
            interval_start: now,
        }
    }

    /// Record one end-to-end latency sample.
    pub fn record(&mut self, latency_ns: u64) {
        self.latencies_ns.push(latency_ns);
        self.updates += 1;
    }

    /// Whether a full reporting interval has elapsed.
    pub fn interval_elapsed(&self, now: Timestamp, interval_ns: u64) -> bool {
        now.saturating_sub(self.interval_start) >= interval_ns
    }

    pub fn samples(&self) -> usize {
        self.latencies_ns.len()
    }

    /// Produce the interval report and reset.
    ///
    /// `messages` is the count of messages the book stage processed during
    /// this interval (the sink tracks the delta of a shared counter).
    pub fn report(&mut self, now: Timestamp, messages: u64) -> StatsReport {
        let interval_ns = now.saturating_sub(self.interval_start).max(1);
        let secs = interval_ns as f64 / 1e9;

        self.latencies_ns.sort_unstable();
        let [p50, p95, p99, p999] = QUANTILES.map(|p| self.quantile_us(p));

        let report = StatsReport {
            interval_ns,
            messages,
            updates: self.updates,
            messages_per_sec: messages as f64 / secs,
            updates_per_sec: self.updates as f64 / secs,
            p50_us: p50,
            p95_us: p95,
            p99_us: p99,
            p999_us: p999,
        };

        self.latencies_ns.clear();
        self.updates = 0;
        self.interval_start = now;
        report
    }

    /// Quantile of the (sorted) buffer at index `⌊n·p⌋`, clamped to the
    /// last sample.
    fn quantile_us(&self, p: f64) -> f64 {
        let n = self.latencies_ns.len();
        if n == 0 {
            return 0.0;
        }
        let index = ((n as f64 * p) as usize).min(n - 1);
        self.latencies_ns[index] as f64 / 1_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_interval_reports_zeros() {
        let mut stats = LatencyStats::new(0);
        let report = stats.report(1_000_000_000, 0);

        assert_eq!(report.updates, 0);
        assert_eq!(report.p50_us, 0.0);
        assert_eq!(report.p999_us, 0.0);
    }

    #[test]
    fn test_single_sample_hits_every_quantile() {
        let mut stats = LatencyStats::new(0);
        stats.record(42_000); // 42 µs

        let report = stats.report(1_000_000_000, 1);
        assert_eq!(report.p50_us, 42.0);
        assert_eq!(report.p95_us, 42.0);
        assert_eq!(report.p999_us, 42.0);
    }

    #[test]
    fn test_quantiles_on_uniform_ramp() {
        let mut stats = LatencyStats::new(0);
        // 1000 samples: 1µs, 2µs, ..., 1000µs, recorded out of order.
        for i in (1..=1000u64).rev() {
            stats.record(i * 1_000);
        }

        let report = stats.report(1_000_000_000, 1000);
        assert_eq!(report.p50_us, 501.0); // index ⌊1000·0.5⌋ = 500
        assert_eq!(report.p95_us, 951.0);
        assert_eq!(report.p99_us, 991.0);
        assert_eq!(report.p999_us, 1000.0); // index 999 clamped to n−1
    }

    #[test]
    fn test_report_resets_buffer_and_counts() {
        let mut stats = LatencyStats::new(0);
        stats.record(10_000);
        stats.record(20_000);

        let first = stats.report(1_000_000_000, 2);
        assert_eq!(first.updates, 2);
        assert_eq!(stats.samples(), 0);

        let second = stats.report(2_000_000_000, 0);
        assert_eq!(second.updates, 0);
        assert_eq!(second.p50_us, 0.0);
    }

    #[test]
    fn test_rates_use_actual_interval() {
        let mut stats = LatencyStats::new(0);
        for _ in 0..500 {
            stats.record(1_000);
        }

        // Two-second interval halves the rate.
        let report = stats.report(2_000_000_000, 1000);
        assert_eq!(report.messages_per_sec, 500.0);
        assert_eq!(report.updates_per_sec, 250.0);
    }

    #[test]
    fn test_interval_elapsed() {
        let stats = LatencyStats::new(5_000_000_000);
        assert!(!stats.interval_elapsed(5_500_000_000, 1_000_000_000));
        assert!(stats.interval_elapsed(6_000_000_000, 1_000_000_000));
    }
}
