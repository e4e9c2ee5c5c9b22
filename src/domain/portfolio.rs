//! Equal-dollar portfolio simulation over one return column.
//!
//! Unlike sorting and statistics, an absent return counts as 0% here: the
//! position is held and neither gains nor loses.

use crate::domain::row::{Metric, PerfMetric};

/// Notional invested per row when no other amount is configured.
pub const DEFAULT_NOTIONAL: f64 = 100.0;

/// Horizons summarised under the performance table, longest first.
pub const DEFAULT_HORIZONS: [PerfMetric; 2] = [PerfMetric::Perf60d, PerfMetric::Perf20d];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioSummary {
    pub holdings: usize,
    pub invested: f64,
    pub total_value: f64,
    pub profit: f64,
    pub pct: f64,
}

pub fn simulate<R, M: Metric<R>>(rows: &[R], metric: M, notional: f64) -> PortfolioSummary {
    let invested = notional * rows.len() as f64;
    let total_value: f64 = rows
        .iter()
        .map(|row| {
            let pct = metric.value(row).unwrap_or(0.0);
            notional * (1.0 + pct / 100.0)
        })
        .sum();
    let profit = total_value - invested;
    let pct = if invested > 0.0 {
        profit / invested * 100.0
    } else {
        0.0
    };
    PortfolioSummary {
        holdings: rows.len(),
        invested,
        total_value,
        profit,
        pct,
    }
}

/// One summary per requested column, in request order.
pub fn simulate_horizons<R, M: Metric<R>>(
    rows: &[R],
    metrics: &[M],
    notional: f64,
) -> Vec<(M, PortfolioSummary)> {
    metrics
        .iter()
        .map(|&metric| (metric, simulate(rows, metric, notional)))
        .collect()
}
