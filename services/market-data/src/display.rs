//! Terminal output for stats lines and the top-of-book table
//!
//! The stats line always goes to stdout; the per-symbol table is optional
//! (`--no-display` suppresses it). This is deliberately plain `println!`
//! output; the observable contract is a line per interval, not a TUI.

use crate::pipeline::messages::BookUpdate;
use crate::stats::StatsReport;

pub struct FeedDisplay {
    table_enabled: bool,
}

impl FeedDisplay {
    pub fn new(table_enabled: bool) -> Self {
        Self { table_enabled }
    }

    /// Print one interval's stats line, and the book table when enabled.
    pub fn render(&self, report: &StatsReport, tops: &[&BookUpdate]) {
        println!("{}", report.line());

        if self.table_enabled && !tops.is_empty() {
            println!(
                "{:<8} {:>12} {:>10} {:>12} {:>10}",
                "symbol", "bid", "bid qty", "ask", "ask qty"
            );
            for update in tops {
                println!(
                    "{:<8} {:>12} {:>10} {:>12} {:>10}",
                    update.symbol,
                    update.best_bid,
                    update.best_bid_qty,
                    update.best_ask,
                    update.best_ask_qty,
                );
            }
        }
    }
}
