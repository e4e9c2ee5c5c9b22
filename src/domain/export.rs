//! CSV serialization of a filtered and sorted collection.
//!
//! Pure: rows in, text out. Writing the file is the job of an `ExportPort`.
//! Layout is a header row, a `Mean` row, a `Std` row, then one line per row
//! in input order. Numbers carry two decimals, absent values are empty cells,
//! records end in CRLF and fields are quoted only when they must be.

use crate::domain::error::PicksError;
use crate::domain::row::{
    DatasetKind, Metric, PerfMetric, PerformanceRow, ReboundMetric, ReboundRow, Row,
};
use crate::domain::statistics::{ColumnStats, lookup};
use chrono::NaiveDate;

/// How one export column obtains its cell.
pub enum ColumnKind<R, M> {
    Text(fn(&R) -> String),
    Numeric(M),
}

pub struct ExportColumn<R, M> {
    pub header: &'static str,
    pub kind: ColumnKind<R, M>,
}

impl<R, M: Copy> ExportColumn<R, M> {
    pub fn text(header: &'static str, cell: fn(&R) -> String) -> Self {
        Self {
            header,
            kind: ColumnKind::Text(cell),
        }
    }

    pub fn metric(&self) -> Option<M> {
        match self.kind {
            ColumnKind::Numeric(m) => Some(m),
            ColumnKind::Text(_) => None,
        }
    }
}

impl<R, M: Metric<R>> ExportColumn<R, M> {
    pub fn numeric(metric: M) -> Self {
        Self {
            header: metric.header(),
            kind: ColumnKind::Numeric(metric),
        }
    }
}

fn rank_cell<R: Row>(row: &R) -> String {
    row.rank().to_string()
}

fn symbol_cell<R: Row>(row: &R) -> String {
    row.symbol().to_string()
}

fn name_cell<R: Row>(row: &R) -> String {
    row.name().unwrap_or_default().to_string()
}

fn curve_cell(row: &ReboundRow) -> String {
    row.curve_shape
        .map(|s| s.tag().to_string())
        .unwrap_or_default()
}

/// Rank, Symbol, Name, 1D, 5D, 20D, 60D, RSI.
pub fn performance_columns() -> Vec<ExportColumn<PerformanceRow, PerfMetric>> {
    let mut columns = vec![
        ExportColumn::text("Rank", rank_cell::<PerformanceRow>),
        ExportColumn::text("Symbol", symbol_cell::<PerformanceRow>),
        ExportColumn::text("Name", name_cell::<PerformanceRow>),
    ];
    columns.extend(
        PerfMetric::ALL
            .into_iter()
            .map(ExportColumn::numeric),
    );
    columns
}

/// Rank, Symbol, Name, Curve, RI, P1-PL, P5-PL, gain ratio (%), RSI.
pub fn rebound_columns() -> Vec<ExportColumn<ReboundRow, ReboundMetric>> {
    let mut columns = vec![
        ExportColumn::text("Rank", rank_cell::<ReboundRow>),
        ExportColumn::text("Symbol", symbol_cell::<ReboundRow>),
        ExportColumn::text("Name", name_cell::<ReboundRow>),
        ExportColumn::text("Curve", curve_cell),
    ];
    columns.extend(
        ReboundMetric::ALL
            .into_iter()
            .map(ExportColumn::numeric),
    );
    columns
}

/// Metrics that need summary statistics for `columns`.
pub fn numeric_metrics<R, M: Copy>(columns: &[ExportColumn<R, M>]) -> Vec<M> {
    columns.iter().filter_map(ExportColumn::metric).collect()
}

fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => String::new(),
    }
}

/// Serializes `rows` in the given order. `stats` must come from the raw,
/// unfiltered snapshot; a numeric column without an entry gets blank
/// summary cells.
pub fn to_csv<R, M>(
    rows: &[&R],
    columns: &[ExportColumn<R, M>],
    stats: &[(M, ColumnStats)],
) -> Result<String, PicksError>
where
    M: Metric<R>,
{
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(vec![]);

    wtr.write_record(columns.iter().map(|c| c.header))?;

    let summary = |label: &str, pick: fn(ColumnStats) -> Option<f64>| -> Vec<String> {
        columns
            .iter()
            .enumerate()
            .map(|(i, column)| match column.kind {
                ColumnKind::Numeric(metric) => format_number(
                    lookup(stats, metric)
                        .map(|s| s.scaled(metric.display_scale()))
                        .and_then(pick),
                ),
                ColumnKind::Text(_) if i == 0 => label.to_string(),
                ColumnKind::Text(_) => String::new(),
            })
            .collect()
    };
    wtr.write_record(summary("Mean", |s| s.mean))?;
    wtr.write_record(summary("Std", |s| s.std_dev))?;

    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|column| match &column.kind {
                ColumnKind::Text(cell) => cell(row),
                ColumnKind::Numeric(metric) => {
                    format_number(metric.value(row).map(|v| v * metric.display_scale()))
                }
            })
            .collect();
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().map_err(|e| PicksError::Export {
        reason: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| PicksError::Export {
        reason: e.to_string(),
    })
}

/// `<dataset>-<YYYY-MM-DD>.csv`
pub fn export_filename(dataset: DatasetKind, date: NaiveDate) -> String {
    format!("{}-{}.csv", dataset, date.format("%Y-%m-%d"))
}
