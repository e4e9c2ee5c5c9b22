//! The two dataset views and their refresh lifecycle.
//!
//! Each dataset keeps its own generation counter. A refresh result is applied
//! only if its ticket carries the latest generation for that dataset, so a
//! superseded fetch can never overwrite the state of a newer one.

use crate::domain::error::PicksError;
use crate::domain::export::{
    export_filename, numeric_metrics, performance_columns, rebound_columns, to_csv,
};
use crate::domain::portfolio::{PortfolioSummary, simulate_horizons};
use crate::domain::row::{
    DatasetKind, PerfMetric, PerformanceRow, PerformanceSnapshot, ReboundRow, ReferenceRow, Row,
};
use crate::domain::sort::{PerfSortKey, ReboundSortKey, SortDirection, SortKey};
use crate::domain::statistics::compute_stats;
use crate::domain::view::{DatasetView, ViewState};
use crate::ports::data_port::DataPort;
use crate::ports::export_port::ExportPort;
use chrono::NaiveDate;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    pub dataset: DatasetKind,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    Failed,
    Discarded,
}

#[derive(Debug, Clone)]
pub struct DatasetSlot<R, K> {
    kind: DatasetKind,
    view: DatasetView<R, K>,
    status: LoadStatus,
    generation: u64,
}

impl<R, K> DatasetSlot<R, K>
where
    R: Row,
    K: SortKey<R>,
{
    pub fn new(kind: DatasetKind, state: ViewState<K>) -> Self {
        Self {
            kind,
            view: DatasetView::new(state),
            status: LoadStatus::Idle,
            generation: 0,
        }
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn view(&self) -> &DatasetView<R, K> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut DatasetView<R, K> {
        &mut self.view
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        RefreshTicket {
            dataset: self.kind,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        ticket.dataset == self.kind && ticket.generation == self.generation
    }

    /// Applies a fetched snapshot if `ticket` is still the latest request.
    pub fn complete(&mut self, ticket: RefreshTicket, rows: Vec<R>) -> RefreshOutcome {
        if !self.is_current(ticket) {
            tracing::debug!(
                dataset = %self.kind,
                stale = ticket.generation,
                latest = self.generation,
                "discarding superseded refresh"
            );
            return RefreshOutcome::Discarded;
        }
        tracing::info!(dataset = %self.kind, rows = rows.len(), "snapshot loaded");
        self.view.replace_rows(rows);
        self.status = LoadStatus::Ready;
        RefreshOutcome::Applied
    }

    /// Records a failed refresh. Previously loaded rows stay in place.
    pub fn fail(&mut self, ticket: RefreshTicket, error: &PicksError) -> RefreshOutcome {
        if !self.is_current(ticket) {
            tracing::debug!(dataset = %self.kind, stale = ticket.generation, "discarding superseded failure");
            return RefreshOutcome::Discarded;
        }
        tracing::warn!(dataset = %self.kind, %error, "refresh failed");
        self.status = LoadStatus::Failed(error.to_string());
        RefreshOutcome::Failed
    }

    pub fn apply(&mut self, ticket: RefreshTicket, result: Result<Vec<R>, PicksError>) -> RefreshOutcome {
        match result {
            Ok(rows) => self.complete(ticket, rows),
            Err(e) => self.fail(ticket, &e),
        }
    }
}

pub type PerformanceSlot = DatasetSlot<PerformanceRow, PerfSortKey>;
pub type ReboundSlot = DatasetSlot<ReboundRow, ReboundSortKey>;

/// Both datasets plus the benchmark row. The slots share no state.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub performance: PerformanceSlot,
    pub rebound: ReboundSlot,
    reference: Option<ReferenceRow>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    /// Performance starts unsorted (source rank order); rebound starts sorted
    /// by curve shape, ascending.
    pub fn new() -> Self {
        Self {
            performance: DatasetSlot::new(DatasetKind::Performance, ViewState::default()),
            rebound: DatasetSlot::new(
                DatasetKind::Rebound,
                ViewState::sorted_by(ReboundSortKey::CurveShape, SortDirection::Ascending),
            ),
            reference: None,
        }
    }

    pub fn reference(&self) -> Option<&ReferenceRow> {
        self.reference.as_ref()
    }

    pub fn begin_refresh(&mut self, dataset: DatasetKind) -> RefreshTicket {
        match dataset {
            DatasetKind::Performance => self.performance.begin_refresh(),
            DatasetKind::Rebound => self.rebound.begin_refresh(),
        }
    }

    pub fn apply_performance(
        &mut self,
        ticket: RefreshTicket,
        result: Result<PerformanceSnapshot, PicksError>,
    ) -> RefreshOutcome {
        match result {
            Ok(snapshot) => {
                let outcome = self.performance.complete(ticket, snapshot.rows);
                if outcome == RefreshOutcome::Applied {
                    self.reference = snapshot.reference;
                }
                outcome
            }
            Err(e) => self.performance.fail(ticket, &e),
        }
    }

    pub fn apply_rebound(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<ReboundRow>, PicksError>,
    ) -> RefreshOutcome {
        self.rebound.apply(ticket, result)
    }

    /// Fetches and applies one dataset synchronously.
    pub fn refresh(&mut self, dataset: DatasetKind, port: &dyn DataPort) -> RefreshOutcome {
        let ticket = self.begin_refresh(dataset);
        tracing::debug!(%dataset, generation = ticket.generation, "refresh started");
        match dataset {
            DatasetKind::Performance => self.apply_performance(ticket, port.fetch_performance()),
            DatasetKind::Rebound => self.apply_rebound(ticket, port.fetch_rebound()),
        }
    }

    /// Refreshes both datasets; a failure in one leaves the other untouched.
    pub fn refresh_all(&mut self, port: &dyn DataPort) -> [RefreshOutcome; 2] {
        [
            self.refresh(DatasetKind::Performance, port),
            self.refresh(DatasetKind::Rebound, port),
        ]
    }

    pub fn status(&self, dataset: DatasetKind) -> &LoadStatus {
        match dataset {
            DatasetKind::Performance => self.performance.status(),
            DatasetKind::Rebound => self.rebound.status(),
        }
    }

    /// CSV of the filtered, sorted rows (every page). Summary rows cover the
    /// whole raw snapshot.
    pub fn export_csv(&self, dataset: DatasetKind) -> Result<String, PicksError> {
        match dataset {
            DatasetKind::Performance => {
                let view = self.performance.view();
                let columns = performance_columns();
                let stats = compute_stats(view.rows(), &numeric_metrics(&columns));
                to_csv(&view.ordered(), &columns, &stats)
            }
            DatasetKind::Rebound => {
                let view = self.rebound.view();
                let columns = rebound_columns();
                let stats = compute_stats(view.rows(), &numeric_metrics(&columns));
                to_csv(&view.ordered(), &columns, &stats)
            }
        }
    }

    pub fn export(
        &self,
        dataset: DatasetKind,
        port: &dyn ExportPort,
        date: NaiveDate,
    ) -> Result<PathBuf, PicksError> {
        let csv = self.export_csv(dataset)?;
        port.deliver(&export_filename(dataset, date), csv.as_bytes())
    }

    /// Equal-allocation summaries over the raw performance rows.
    pub fn portfolio(
        &self,
        horizons: &[PerfMetric],
        notional: f64,
    ) -> Vec<(PerfMetric, PortfolioSummary)> {
        simulate_horizons(self.performance.view().rows(), horizons, notional)
    }
}
