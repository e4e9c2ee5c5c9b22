//! Decoding of the dashboard API body.
//!
//! Body shape: `{"data": {"perf": [...], "rebound": [...], "qqq": {...}}}`.
//! Each dataset decodes only its own section so a broken section fails that
//! dataset alone.

use crate::domain::error::PicksError;
use crate::domain::row::{
    DatasetKind, PerformanceRow, PerformanceSnapshot, ReboundRow, ReferenceRow, validate_snapshot,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const REFERENCE_SYMBOL: &str = "QQQ";

#[derive(Debug, Default, Deserialize)]
struct BenchmarkPerf {
    #[serde(default)]
    perf1d: Option<f64>,
    #[serde(default)]
    perf5d: Option<f64>,
    #[serde(default)]
    perf20d: Option<f64>,
    #[serde(default)]
    perf60d: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Structured { error: String },
    Message(String),
}

/// True for bodies that look like an HTML page rather than JSON.
pub fn looks_like_html(body: &str) -> bool {
    let head = body.trim_start();
    let lower: String = head.chars().take(16).collect::<String>().to_lowercase();
    lower.starts_with("<!") || lower.starts_with("<html")
}

/// Pulls `detail.error` (or a plain `detail` string) out of an error body.
pub fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        ErrorDetail::Structured { error } => Some(error),
        ErrorDetail::Message(msg) => Some(msg),
    }
}

fn parse_root(dataset: DatasetKind, body: &str) -> Result<Value, PicksError> {
    if looks_like_html(body) {
        return Err(PicksError::HtmlPayload { dataset });
    }
    serde_json::from_str(body).map_err(|e| PicksError::MalformedPayload {
        dataset,
        reason: format!("not valid JSON: {e}"),
    })
}

fn section<'v>(dataset: DatasetKind, root: &'v Value, key: &str) -> Result<&'v Value, PicksError> {
    root.get("data")
        .ok_or_else(|| PicksError::MalformedPayload {
            dataset,
            reason: "missing \"data\" object".into(),
        })?
        .get(key)
        .ok_or_else(|| PicksError::MalformedPayload {
            dataset,
            reason: format!("missing \"data.{key}\""),
        })
}

fn decode_rows<T: DeserializeOwned>(
    dataset: DatasetKind,
    value: &Value,
    key: &str,
) -> Result<Vec<T>, PicksError> {
    Vec::<T>::deserialize(value).map_err(|e| PicksError::MalformedPayload {
        dataset,
        reason: format!("unexpected shape in \"data.{key}\": {e}"),
    })
}

pub fn decode_performance(body: &str) -> Result<PerformanceSnapshot, PicksError> {
    let dataset = DatasetKind::Performance;
    let root = parse_root(dataset, body)?;
    let rows: Vec<PerformanceRow> = decode_rows(dataset, section(dataset, &root, "perf")?, "perf")?;
    validate_snapshot(dataset, &rows)?;

    let reference = match root.get("data").and_then(|d| d.get("qqq")) {
        Some(Value::Null) | None => None,
        Some(value) => {
            let bench = BenchmarkPerf::deserialize(value).map_err(|e| {
                PicksError::MalformedPayload {
                    dataset,
                    reason: format!("unexpected shape in \"data.qqq\": {e}"),
                }
            })?;
            reference_row(bench)
        }
    };

    Ok(PerformanceSnapshot { rows, reference })
}

/// The benchmark counts as present only with a 1D or 5D figure.
fn reference_row(bench: BenchmarkPerf) -> Option<ReferenceRow> {
    if bench.perf1d.is_none() && bench.perf5d.is_none() {
        return None;
    }
    Some(ReferenceRow {
        symbol: REFERENCE_SYMBOL.to_string(),
        perf1d: bench.perf1d,
        perf5d: bench.perf5d,
        perf20d: bench.perf20d,
        perf60d: bench.perf60d,
    })
}

pub fn decode_rebound(body: &str) -> Result<Vec<ReboundRow>, PicksError> {
    let dataset = DatasetKind::Rebound;
    let root = parse_root(dataset, body)?;
    let rows: Vec<ReboundRow> =
        decode_rows(dataset, section(dataset, &root, "rebound")?, "rebound")?;
    validate_snapshot(dataset, &rows)?;
    Ok(rows)
}
