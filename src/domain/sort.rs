//! Sort engine: per-key comparator strategies and a stable ordered pass.

use crate::domain::error::PicksError;
use crate::domain::row::{CurveShape, Metric, PerfMetric, PerformanceRow, ReboundMetric, ReboundRow};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = PicksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(PicksError::InvalidArgument {
                name: "sort direction".into(),
                value: s.to_string(),
            }),
        }
    }
}

/// A selectable sort column for rows of type `R`.
pub trait SortKey<R>: Copy + PartialEq + fmt::Debug {
    /// Ascending comparator; the engine reverses it for descending order.
    fn compare(self, a: &R, b: &R) -> Ordering;

    /// Direction applied when this key is first selected.
    fn initial_direction(self) -> SortDirection {
        SortDirection::Descending
    }
}

/// Numeric comparator with absent values equal to negative infinity.
///
/// `-0.0` and `0.0` compare equal, so they stay in input order.
pub fn compare_nullable(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.unwrap_or(f64::NEG_INFINITY);
    let b = b.unwrap_or(f64::NEG_INFINITY);
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Orders by the fixed curve display order; absent shapes come first.
pub fn compare_curve(a: Option<CurveShape>, b: Option<CurveShape>) -> Ordering {
    CurveShape::order_rank(a).cmp(&CurveShape::order_rank(b))
}

pub type PerfSortKey = PerfMetric;

impl SortKey<PerformanceRow> for PerfMetric {
    fn compare(self, a: &PerformanceRow, b: &PerformanceRow) -> Ordering {
        compare_nullable(self.value(a), self.value(b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReboundSortKey {
    Rank,
    CurveShape,
    Metric(ReboundMetric),
}

impl SortKey<ReboundRow> for ReboundSortKey {
    fn compare(self, a: &ReboundRow, b: &ReboundRow) -> Ordering {
        match self {
            ReboundSortKey::Rank => a.rank.cmp(&b.rank),
            ReboundSortKey::CurveShape => compare_curve(a.curve_shape, b.curve_shape),
            ReboundSortKey::Metric(metric) => compare_nullable(metric.value(a), metric.value(b)),
        }
    }

    fn initial_direction(self) -> SortDirection {
        match self {
            ReboundSortKey::CurveShape => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }
}

impl FromStr for ReboundSortKey {
    type Err = PicksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        match key.as_str() {
            "rank" => Ok(ReboundSortKey::Rank),
            "curve" | "curve_shape" => Ok(ReboundSortKey::CurveShape),
            _ => ReboundMetric::ALL
                .into_iter()
                .find(|m| m.wire_name() == key)
                .map(ReboundSortKey::Metric)
                .ok_or_else(|| PicksError::InvalidArgument {
                    name: "rebound sort key".into(),
                    value: s.to_string(),
                }),
        }
    }
}

/// Stable sort of an already filtered collection.
///
/// `None` returns the input unchanged. Ties keep their input order in both
/// directions.
pub fn sort_rows<'a, R, K>(mut rows: Vec<&'a R>, sort: Option<(K, SortDirection)>) -> Vec<&'a R>
where
    K: SortKey<R>,
{
    let Some((key, direction)) = sort else {
        return rows;
    };
    match direction {
        SortDirection::Ascending => rows.sort_by(|a, b| key.compare(a, b)),
        SortDirection::Descending => rows.sort_by(|a, b| key.compare(b, a)),
    }
    rows
}
