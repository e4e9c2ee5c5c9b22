//! Plain-text rendering of dataset pages and summaries for the terminal.

use crate::domain::format::{
    MISSING, format_curve, format_fixed, format_grouped, format_pct, format_ratio,
    portfolio_sentence,
};
use crate::domain::portfolio::PortfolioSummary;
use crate::domain::row::{
    Metric, PerfMetric, PerformanceRow, ReboundMetric, ReboundRow, ReferenceRow, Row,
};
use crate::domain::sort::{ReboundSortKey, SortDirection};
use crate::domain::statistics::ColumnStats;
use crate::domain::view::DerivedView;

/// Left-aligns text columns and right-aligns numeric ones.
struct Grid {
    headers: Vec<String>,
    numeric: Vec<bool>,
    rows: Vec<Vec<String>>,
}

impl Grid {
    fn new(headers: Vec<String>, numeric: Vec<bool>) -> Self {
        Self {
            headers,
            numeric,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn render(&self) -> String {
        let width = |s: &str| s.chars().count();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(width(cell));
            }
        }

        let line = |cells: &[String]| -> String {
            let padded: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let pad = " ".repeat(widths[i] - width(cell));
                    if self.numeric[i] {
                        format!("{pad}{cell}")
                    } else {
                        format!("{cell}{pad}")
                    }
                })
                .collect();
            padded.join("  ").trim_end().to_string()
        };

        let mut out = line(&self.headers);
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("  "));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        out
    }
}

fn header_with_arrow(label: &str, active: bool, direction: SortDirection) -> String {
    if active {
        format!("{label} {}", direction.arrow())
    } else {
        label.to_string()
    }
}

fn name_or_missing<R: Row>(row: &R) -> String {
    match row.name() {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => MISSING.to_string(),
    }
}

pub fn render_performance_page(
    view: &DerivedView<'_, PerformanceRow>,
    sort: Option<(PerfMetric, SortDirection)>,
    reference: Option<&ReferenceRow>,
) -> String {
    let mut headers = vec!["#".to_string(), "Symbol".to_string(), "Name".to_string()];
    for metric in PerfMetric::ALL {
        let active = sort.is_some_and(|(k, _)| k == metric);
        let dir = sort.map_or(SortDirection::Descending, |(_, d)| d);
        headers.push(header_with_arrow(metric.horizon(), active, dir));
    }
    let mut grid = Grid::new(headers, vec![true, false, false, true, true, true, true, true]);

    if let Some(reference) = reference {
        grid.push(vec![
            String::new(),
            reference.symbol.clone(),
            "benchmark".to_string(),
            format_pct(reference.perf1d),
            format_pct(reference.perf5d),
            format_pct(reference.perf20d),
            format_pct(reference.perf60d),
            MISSING.to_string(),
        ]);
    }

    for row in view.page() {
        grid.push(vec![
            row.rank.to_string(),
            row.symbol.clone(),
            name_or_missing(*row),
            format_pct(row.perf1d),
            format_pct(row.perf5d),
            format_pct(row.perf20d),
            format_pct(row.perf60d),
            format_fixed(row.rsi_14, 1),
        ]);
    }

    finish(grid, view, "performance")
}

pub fn render_rebound_page(
    view: &DerivedView<'_, ReboundRow>,
    sort: Option<(ReboundSortKey, SortDirection)>,
) -> String {
    let dir = sort.map_or(SortDirection::Descending, |(_, d)| d);
    let active = |key: ReboundSortKey| sort.is_some_and(|(k, _)| k == key);
    let mut headers = vec![
        header_with_arrow("#", active(ReboundSortKey::Rank), dir),
        "Symbol".to_string(),
        "Name".to_string(),
        header_with_arrow("Curve", active(ReboundSortKey::CurveShape), dir),
    ];
    for metric in ReboundMetric::ALL {
        headers.push(header_with_arrow(
            metric.header(),
            active(ReboundSortKey::Metric(metric)),
            dir,
        ));
    }
    let mut grid = Grid::new(
        headers,
        vec![true, false, false, false, true, true, true, true, true],
    );

    for row in view.page() {
        grid.push(vec![
            row.rank.to_string(),
            row.symbol.clone(),
            name_or_missing(*row),
            format_curve(row.curve_shape).to_string(),
            format_grouped(row.ri),
            format_fixed(row.p1_pl, 2),
            format_fixed(row.p5_pl, 2),
            format_ratio(row.d5_d1_gain_ratio),
            format_fixed(row.rsi_14, 1),
        ]);
    }

    finish(grid, view, "rebound")
}

/// The table (with any reference row) and the page label are always shown,
/// even when no dataset row matches.
fn finish<R>(grid: Grid, view: &DerivedView<'_, R>, dataset: &str) -> String {
    let mut out = grid.render();
    if view.is_empty() {
        out.push_str(&format!("No {dataset} rows match.\n"));
    }
    out.push_str(&format!(
        "{}  (page {} of {})\n",
        view.window,
        view.page_index + 1,
        view.total_pages
    ));
    out
}

/// Mean and standard deviation per column, scaled like the column is shown.
pub fn render_stats<R, M: Metric<R>>(stats: &[(M, ColumnStats)]) -> String {
    let mut grid = Grid::new(
        vec![
            "Column".to_string(),
            "Count".to_string(),
            "Mean".to_string(),
            "Std".to_string(),
        ],
        vec![false, true, true, true],
    );
    for (metric, column) in stats {
        let scaled = column.scaled(metric.display_scale());
        grid.push(vec![
            metric.header().to_string(),
            scaled.count.to_string(),
            format_fixed(scaled.mean, 2),
            format_fixed(scaled.std_dev, 2),
        ]);
    }
    grid.render()
}

pub fn render_portfolio(summaries: &[(PerfMetric, PortfolioSummary)], notional: f64) -> String {
    let mut out = String::new();
    for (metric, summary) in summaries {
        out.push_str(&portfolio_sentence(metric.horizon(), notional, summary));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::row::{CurveShape, PerformanceRow};
    use crate::domain::sort::SortKey;
    use crate::domain::statistics::compute_stats;
    use crate::domain::view::{DatasetView, ViewState};

    fn perf(rank: u32, symbol: &str, perf1d: Option<f64>) -> PerformanceRow {
        PerformanceRow {
            rank,
            symbol: symbol.into(),
            name: Some(format!("{symbol} Inc")),
            perf1d,
            perf5d: None,
            perf20d: Some(2.0),
            perf60d: Some(-4.5),
            rsi_14: Some(55.55),
        }
    }

    #[test]
    fn performance_page_shows_reference_and_label() {
        let mut view: DatasetView<PerformanceRow, PerfMetric> =
            DatasetView::new(ViewState::default());
        view.replace_rows(vec![perf(1, "AAA", Some(1.0)), perf(2, "BBB", None)]);
        let reference = ReferenceRow {
            symbol: "QQQ".into(),
            perf1d: Some(0.25),
            perf5d: None,
            perf20d: None,
            perf60d: None,
        };
        let derived = view.derive();
        let text = render_performance_page(&derived, None, Some(&reference));
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("#  Symbol"));
        assert!(lines[2].contains("QQQ") && lines[2].contains("+0.25%"));
        assert!(lines[3].contains("AAA Inc") && lines[3].contains("+1.00%"));
        assert!(lines[4].contains("—"));
        assert!(text.contains("1–2 of 2  (page 1 of 1)"));
    }

    #[test]
    fn active_sort_column_gets_arrow() {
        let mut view: DatasetView<PerformanceRow, PerfMetric> =
            DatasetView::new(ViewState::default());
        view.replace_rows(vec![perf(1, "AAA", Some(1.0))]);
        view.toggle_sort(PerfMetric::Perf1d);
        let derived = view.derive();
        let text = render_performance_page(&derived, view.state().sort(), None);
        let arrow = PerfMetric::Perf1d.initial_direction().arrow();
        assert!(text.lines().next().unwrap().contains(&format!("1D {arrow}")));
    }

    #[test]
    fn rebound_page_uses_glyphs() {
        let mut view: DatasetView<ReboundRow, ReboundSortKey> = DatasetView::new(
            ViewState::sorted_by(ReboundSortKey::CurveShape, SortDirection::Ascending),
        );
        view.replace_rows(vec![ReboundRow {
            rank: 1,
            symbol: "ZZ".into(),
            name: None,
            ri: Some(12345.4),
            p1_pl: Some(1.0),
            p5_pl: None,
            d5_d1_gain_ratio: Some(0.05),
            rsi_14: None,
            curve_shape: Some(CurveShape::WayDown),
        }]);
        let derived = view.derive();
        let text = render_rebound_page(&derived, view.state().sort());
        assert!(text.contains("↘"));
        assert!(text.contains("12,345"));
        assert!(text.contains("+5.00%"));
    }

    #[test]
    fn empty_result_says_so() {
        let view: DatasetView<ReboundRow, ReboundSortKey> = DatasetView::new(ViewState::default());
        let derived = view.derive();
        let text = render_rebound_page(&derived, None);
        assert!(text.starts_with("#  Symbol"));
        assert!(text.contains("No rebound rows match.\n"));
        assert!(text.ends_with("0 of 0  (page 1 of 1)\n"));
    }

    #[test]
    fn empty_performance_page_keeps_reference_and_label() {
        let mut view: DatasetView<PerformanceRow, PerfMetric> =
            DatasetView::new(ViewState::default());
        view.replace_rows(vec![perf(1, "AAA", Some(1.0))]);
        view.set_query("zzz");
        let reference = ReferenceRow {
            symbol: "QQQ".into(),
            perf1d: Some(0.25),
            perf5d: Some(1.0),
            perf20d: None,
            perf60d: None,
        };
        let derived = view.derive();
        let text = render_performance_page(&derived, None, Some(&reference));
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[2].contains("QQQ") && lines[2].contains("benchmark"));
        assert_eq!(lines[3], "No performance rows match.");
        assert_eq!(lines[4], "0 of 0  (page 1 of 1)");
    }

    #[test]
    fn stats_table_lists_every_metric() {
        let rows = vec![perf(1, "A", Some(1.0)), perf(2, "B", Some(3.0))];
        let stats = compute_stats(&rows, &PerfMetric::ALL);
        let text = render_stats::<PerformanceRow, _>(&stats);
        assert!(text.contains("1D (%)"));
        assert!(text.contains("2.00"));
        assert!(text.contains("RSI (14)"));
    }
}
