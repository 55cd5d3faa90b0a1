//! Emission counters for the producer

use serde::Serialize;

use crate::generator::EventKind;

/// Per-event-type counts for one producer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenMetrics {
    pub adds: u64,
    pub cancels: u64,
    pub executes: u64,
    pub replaces: u64,
    pub trades: u64,
}

impl GenMetrics {
    pub fn record(&mut self, kind: EventKind) {
        match kind {
            EventKind::Add => self.adds += 1,
            EventKind::Cancel => self.cancels += 1,
            EventKind::Execute => self.executes += 1,
            EventKind::Replace => self.replaces += 1,
            EventKind::Trade => self.trades += 1,
        }
    }

    /// Total events emitted.
    pub fn total(&self) -> u64 {
        self.adds + self.cancels + self.executes + self.replaces + self.trades
    }

    /// One-line run summary.
    pub fn summary(&self) -> String {
        format!(
            "events: {} (adds {} | cancels {} | executes {} | replaces {} | trades {})",
            self.total(),
            self.adds,
            self.cancels,
            self.executes,
            self.replaces,
            self.trades,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_total() {
        let mut metrics = GenMetrics::default();
        metrics.record(EventKind::Add);
        metrics.record(EventKind::Add);
        metrics.record(EventKind::Trade);

        assert_eq!(metrics.adds, 2);
        assert_eq!(metrics.trades, 1);
        assert_eq!(metrics.total(), 3);
    }

    #[test]
    fn test_summary_contains_totals() {
        let mut metrics = GenMetrics::default();
        metrics.record(EventKind::Cancel);
        assert!(metrics.summary().contains("cancels 1"));
    }
}
