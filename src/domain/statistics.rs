//! Column statistics over a raw snapshot.
//!
//! Only present values take part. The standard deviation is the sample form
//! (divisor n-1), reported as 0 for a single value and absent for none.

use crate::domain::row::Metric;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

impl ColumnStats {
    pub const EMPTY: ColumnStats = ColumnStats {
        count: 0,
        mean: None,
        std_dev: None,
    };

    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self::EMPTY;
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        let std_dev = if n == 1 {
            0.0
        } else {
            let sum_sq: f64 = values
                .iter()
                .map(|v| {
                    let diff = v - mean;
                    diff * diff
                })
                .sum();
            (sum_sq / (n - 1) as f64).sqrt()
        };
        ColumnStats {
            count: n,
            mean: Some(mean),
            std_dev: Some(std_dev),
        }
    }

    /// Rescales for presentation; the deviation scales by the magnitude.
    pub fn scaled(self, factor: f64) -> Self {
        ColumnStats {
            count: self.count,
            mean: self.mean.map(|m| m * factor),
            std_dev: self.std_dev.map(|s| s * factor.abs()),
        }
    }
}

pub fn column_stats<R, M: Metric<R>>(rows: &[R], metric: M) -> ColumnStats {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|row| metric.value(row))
        .filter(|v| v.is_finite())
        .collect();
    ColumnStats::from_values(&values)
}

/// Stats for each metric, computed independently, in the order given.
pub fn compute_stats<R, M: Metric<R>>(rows: &[R], metrics: &[M]) -> Vec<(M, ColumnStats)> {
    metrics
        .iter()
        .map(|&metric| (metric, column_stats(rows, metric)))
        .collect()
}

pub fn lookup<M: PartialEq>(stats: &[(M, ColumnStats)], metric: M) -> Option<ColumnStats> {
    stats
        .iter()
        .find(|(m, _)| *m == metric)
        .map(|(_, s)| *s)
}
