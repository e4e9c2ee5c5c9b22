//! Text formatting for table cells and summary lines.

use crate::domain::portfolio::PortfolioSummary;
use crate::domain::row::CurveShape;

pub const MISSING: &str = "—";

/// Signed percentage with two decimals, e.g. `+1.25%`.
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}{:.2}%", sign(v), v),
        None => MISSING.to_string(),
    }
}

/// A ratio shown as a signed percentage (0.0123 → `+1.23%`).
pub fn format_ratio(value: Option<f64>) -> String {
    format_pct(value.map(|v| v * 100.0))
}

pub fn format_fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => MISSING.to_string(),
    }
}

/// Rounded to an integer with thousands separators, e.g. `1,234,568`.
pub fn format_grouped(value: Option<f64>) -> String {
    let Some(v) = value else {
        return MISSING.to_string();
    };
    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn format_curve(shape: Option<CurveShape>) -> &'static str {
    shape.map(CurveShape::glyph).unwrap_or(MISSING)
}

/// One line of the portfolio summary block.
pub fn portfolio_sentence(horizon: &str, notional: f64, summary: &PortfolioSummary) -> String {
    format!(
        "If you invested USD${notional:.0} for each of the {} stocks, the amount you earn in {horizon} is ${}{:.2} or {}{:.2}%.",
        summary.holdings,
        sign(summary.profit),
        summary.profit,
        sign(summary.pct),
        summary.pct,
    )
}

fn sign(v: f64) -> &'static str {
    if v >= 0.0 { "+" } else { "" }
}
