//! Row types for the performance and rebound datasets.
//!
//! Rows are immutable once decoded. Numeric fields are `Option<f64>`; an
//! absent value is carried as `None` and each consumer applies its own null
//! policy (sorting and statistics exclude it, the portfolio simulator treats
//! it as 0%).

use crate::domain::error::PicksError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Which of the two independent datasets a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Performance,
    Rebound,
}

impl DatasetKind {
    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::Performance => "Perf",
            DatasetKind::Rebound => "Rebound",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::Performance => write!(f, "performance"),
            DatasetKind::Rebound => write!(f, "rebound"),
        }
    }
}

impl FromStr for DatasetKind {
    type Err = PicksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "perf" | "performance" => Ok(DatasetKind::Performance),
            "rebound" | "ri" => Ok(DatasetKind::Rebound),
            _ => Err(PicksError::InvalidArgument {
                name: "dataset".into(),
                value: s.to_string(),
            }),
        }
    }
}

/// Fields shared by every row kind: identity plus the two searchable fields.
pub trait Row {
    fn rank(&self) -> u32;
    fn symbol(&self) -> &str;
    fn name(&self) -> Option<&str>;
}

/// A numeric column of row type `R`, selected statically rather than by name.
pub trait Metric<R>: Copy + PartialEq + fmt::Debug {
    fn value(self, row: &R) -> Option<f64>;

    /// Column header used by the exporter and the stats listing.
    fn header(self) -> &'static str;

    /// Multiplier applied when the value is presented (ratios shown as %).
    fn display_scale(self) -> f64 {
        1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    pub rank: u32,
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub perf1d: Option<f64>,
    pub perf5d: Option<f64>,
    pub perf20d: Option<f64>,
    pub perf60d: Option<f64>,
    pub rsi_14: Option<f64>,
}

impl Row for PerformanceRow {
    fn rank(&self) -> u32 {
        self.rank
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Benchmark row shown next to the performance table, outside its pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub symbol: String,
    pub perf1d: Option<f64>,
    pub perf5d: Option<f64>,
    pub perf20d: Option<f64>,
    pub perf60d: Option<f64>,
}

/// What one performance fetch delivers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerformanceSnapshot {
    pub rows: Vec<PerformanceRow>,
    pub reference: Option<ReferenceRow>,
}

/// Shape of the last five closes. Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveShape {
    VShape,
    WayUp,
    AShape,
    WayDown,
}

impl CurveShape {
    pub const ORDER: [CurveShape; 4] = [
        CurveShape::VShape,
        CurveShape::WayUp,
        CurveShape::AShape,
        CurveShape::WayDown,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "v_shape" => Some(CurveShape::VShape),
            "way_up" => Some(CurveShape::WayUp),
            "a_shape" => Some(CurveShape::AShape),
            "way_down" => Some(CurveShape::WayDown),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            CurveShape::VShape => "v_shape",
            CurveShape::WayUp => "way_up",
            CurveShape::AShape => "a_shape",
            CurveShape::WayDown => "way_down",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            CurveShape::VShape => "V",
            CurveShape::WayUp => "↗",
            CurveShape::AShape => "Λ",
            CurveShape::WayDown => "↘",
        }
    }

    /// Position in the fixed display order; absent shapes rank -1.
    pub fn order_rank(shape: Option<CurveShape>) -> i32 {
        match shape {
            Some(s) => s as i32,
            None => -1,
        }
    }
}

fn deserialize_curve_shape<'de, D>(deserializer: D) -> Result<Option<CurveShape>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag: Option<String> = Option::deserialize(deserializer)?;
    Ok(tag.as_deref().and_then(CurveShape::from_tag))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReboundRow {
    pub rank: u32,
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub ri: Option<f64>,
    pub p1_pl: Option<f64>,
    pub p5_pl: Option<f64>,
    pub d5_d1_gain_ratio: Option<f64>,
    pub rsi_14: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_curve_shape")]
    pub curve_shape: Option<CurveShape>,
}

impl Row for ReboundRow {
    fn rank(&self) -> u32 {
        self.rank
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerfMetric {
    Perf1d,
    Perf5d,
    Perf20d,
    Perf60d,
    Rsi14,
}

impl PerfMetric {
    pub const ALL: [PerfMetric; 5] = [
        PerfMetric::Perf1d,
        PerfMetric::Perf5d,
        PerfMetric::Perf20d,
        PerfMetric::Perf60d,
        PerfMetric::Rsi14,
    ];

    pub const RETURNS: [PerfMetric; 4] = [
        PerfMetric::Perf1d,
        PerfMetric::Perf5d,
        PerfMetric::Perf20d,
        PerfMetric::Perf60d,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            PerfMetric::Perf1d => "perf1d",
            PerfMetric::Perf5d => "perf5d",
            PerfMetric::Perf20d => "perf20d",
            PerfMetric::Perf60d => "perf60d",
            PerfMetric::Rsi14 => "rsi_14",
        }
    }

    /// Short horizon label, e.g. `60D`.
    pub fn horizon(self) -> &'static str {
        match self {
            PerfMetric::Perf1d => "1D",
            PerfMetric::Perf5d => "5D",
            PerfMetric::Perf20d => "20D",
            PerfMetric::Perf60d => "60D",
            PerfMetric::Rsi14 => "RSI",
        }
    }
}

impl Metric<PerformanceRow> for PerfMetric {
    fn value(self, row: &PerformanceRow) -> Option<f64> {
        match self {
            PerfMetric::Perf1d => row.perf1d,
            PerfMetric::Perf5d => row.perf5d,
            PerfMetric::Perf20d => row.perf20d,
            PerfMetric::Perf60d => row.perf60d,
            PerfMetric::Rsi14 => row.rsi_14,
        }
    }

    fn header(self) -> &'static str {
        match self {
            PerfMetric::Perf1d => "1D (%)",
            PerfMetric::Perf5d => "5D (%)",
            PerfMetric::Perf20d => "20D (%)",
            PerfMetric::Perf60d => "60D (%)",
            PerfMetric::Rsi14 => "RSI (14)",
        }
    }
}

impl FromStr for PerfMetric {
    type Err = PicksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        PerfMetric::ALL
            .into_iter()
            .find(|m| m.wire_name() == key || m.horizon().eq_ignore_ascii_case(&key))
            .ok_or_else(|| PicksError::InvalidArgument {
                name: "performance column".into(),
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReboundMetric {
    Ri,
    P1Pl,
    P5Pl,
    D5D1GainRatio,
    Rsi14,
}

impl ReboundMetric {
    pub const ALL: [ReboundMetric; 5] = [
        ReboundMetric::Ri,
        ReboundMetric::P1Pl,
        ReboundMetric::P5Pl,
        ReboundMetric::D5D1GainRatio,
        ReboundMetric::Rsi14,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            ReboundMetric::Ri => "ri",
            ReboundMetric::P1Pl => "p1_pl",
            ReboundMetric::P5Pl => "p5_pl",
            ReboundMetric::D5D1GainRatio => "d5_d1_gain_ratio",
            ReboundMetric::Rsi14 => "rsi_14",
        }
    }
}

impl Metric<ReboundRow> for ReboundMetric {
    fn value(self, row: &ReboundRow) -> Option<f64> {
        match self {
            ReboundMetric::Ri => row.ri,
            ReboundMetric::P1Pl => row.p1_pl,
            ReboundMetric::P5Pl => row.p5_pl,
            ReboundMetric::D5D1GainRatio => row.d5_d1_gain_ratio,
            ReboundMetric::Rsi14 => row.rsi_14,
        }
    }

    fn header(self) -> &'static str {
        match self {
            ReboundMetric::Ri => "RI",
            ReboundMetric::P1Pl => "P1-PL",
            ReboundMetric::P5Pl => "P5-PL",
            ReboundMetric::D5D1GainRatio => "(D5-D1) Gain (%)",
            ReboundMetric::Rsi14 => "RSI (14)",
        }
    }

    fn display_scale(self) -> f64 {
        match self {
            ReboundMetric::D5D1GainRatio => 100.0,
            _ => 1.0,
        }
    }
}

/// Rejects snapshots whose shape breaks the row invariants: rank >= 1,
/// non-empty symbol, symbols unique within the snapshot.
pub fn validate_snapshot<R: Row>(dataset: DatasetKind, rows: &[R]) -> Result<(), PicksError> {
    let mut seen = HashSet::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if row.rank() == 0 {
            return Err(PicksError::MalformedPayload {
                dataset,
                reason: format!("row {i} has rank 0"),
            });
        }
        let symbol = row.symbol().trim();
        if symbol.is_empty() {
            return Err(PicksError::MalformedPayload {
                dataset,
                reason: format!("row {i} has an empty symbol"),
            });
        }
        if !seen.insert(symbol) {
            return Err(PicksError::MalformedPayload {
                dataset,
                reason: format!("duplicate symbol {symbol}"),
            });
        }
    }
    Ok(())
}
