#![allow(dead_code)]

use sctr_picks::domain::error::PicksError;
use sctr_picks::domain::row::{
    CurveShape, DatasetKind, PerformanceRow, PerformanceSnapshot, ReboundRow, ReferenceRow,
};
use sctr_picks::ports::data_port::DataPort;
use sctr_picks::ports::export_port::ExportPort;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;

pub struct MockDataPort {
    pub performance: Vec<PerformanceRow>,
    pub reference: Option<ReferenceRow>,
    pub rebound: Vec<ReboundRow>,
    pub errors: HashMap<DatasetKind, String>,
    pub calls: Cell<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            performance: Vec::new(),
            reference: None,
            rebound: Vec::new(),
            errors: HashMap::new(),
            calls: Cell::new(0),
        }
    }

    pub fn with_performance(mut self, rows: Vec<PerformanceRow>) -> Self {
        self.performance = rows;
        self
    }

    pub fn with_reference(mut self, reference: ReferenceRow) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn with_rebound(mut self, rows: Vec<ReboundRow>) -> Self {
        self.rebound = rows;
        self
    }

    pub fn with_error(mut self, dataset: DatasetKind, reason: &str) -> Self {
        self.errors.insert(dataset, reason.to_string());
        self
    }

    fn check(&self, dataset: DatasetKind) -> Result<(), PicksError> {
        self.calls.set(self.calls.get() + 1);
        match self.errors.get(&dataset) {
            Some(reason) => Err(PicksError::Transport {
                dataset,
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_performance(&self) -> Result<PerformanceSnapshot, PicksError> {
        self.check(DatasetKind::Performance)?;
        Ok(PerformanceSnapshot {
            rows: self.performance.clone(),
            reference: self.reference.clone(),
        })
    }

    fn fetch_rebound(&self) -> Result<Vec<ReboundRow>, PicksError> {
        self.check(DatasetKind::Rebound)?;
        Ok(self.rebound.clone())
    }
}

/// Keeps delivered exports in memory.
#[derive(Default)]
pub struct MemoryExportPort {
    pub files: RefCell<Vec<(String, String)>>,
}

impl ExportPort for MemoryExportPort {
    fn deliver(&self, filename: &str, contents: &[u8]) -> Result<PathBuf, PicksError> {
        self.files.borrow_mut().push((
            filename.to_string(),
            String::from_utf8_lossy(contents).into_owned(),
        ));
        Ok(PathBuf::from(filename))
    }
}

pub fn perf_row(rank: u32, symbol: &str, name: &str) -> PerformanceRow {
    PerformanceRow {
        rank,
        symbol: symbol.to_string(),
        name: if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        },
        perf1d: None,
        perf5d: None,
        perf20d: None,
        perf60d: None,
        rsi_14: None,
    }
}

pub fn perf_with_1d(rank: u32, symbol: &str, perf1d: Option<f64>) -> PerformanceRow {
    PerformanceRow {
        perf1d,
        ..perf_row(rank, symbol, "")
    }
}

pub fn rebound_row(rank: u32, symbol: &str, curve: Option<CurveShape>) -> ReboundRow {
    ReboundRow {
        rank,
        symbol: symbol.to_string(),
        name: None,
        ri: None,
        p1_pl: None,
        p5_pl: None,
        d5_d1_gain_ratio: None,
        rsi_14: None,
        curve_shape: curve,
    }
}

/// `count` rows with distinct symbols `S0001..` and ranks `1..=count`.
pub fn generate_perf_rows(count: usize) -> Vec<PerformanceRow> {
    (0..count)
        .map(|i| PerformanceRow {
            perf1d: Some(i as f64 * 0.1 - 5.0),
            perf60d: Some((i % 7) as f64),
            ..perf_row(i as u32 + 1, &format!("S{:04}", i + 1), &format!("Company {}", i + 1))
        })
        .collect()
}

pub fn symbols(rows: &[&PerformanceRow]) -> Vec<String> {
    rows.iter().map(|r| r.symbol.clone()).collect()
}
