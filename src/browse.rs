//! Line-driven browsing session over both datasets.
//!
//! Each dataset keeps its own search, sort and page; `use` only switches which
//! one the following commands act on.

use crate::adapters::text_table::{
    render_performance_page, render_portfolio, render_rebound_page, render_stats,
};
use crate::domain::dashboard::{Dashboard, LoadStatus, RefreshOutcome};
use crate::domain::error::PicksError;
use crate::domain::export::{numeric_metrics, performance_columns, rebound_columns};
use crate::domain::portfolio::DEFAULT_HORIZONS;
use crate::domain::row::{DatasetKind, PerformanceRow, ReboundRow, Row};
use crate::domain::sort::{PerfSortKey, ReboundSortKey, SortDirection, SortKey};
use crate::domain::statistics::compute_stats;
use crate::domain::view::DatasetView;
use crate::ports::data_port::DataPort;
use crate::ports::export_port::ExportPort;
use std::io::{BufRead, Write};

pub const HELP: &str = "\
commands:
  use perf|rebound        switch the active dataset
  search [TEXT]           filter by symbol or name (empty clears)
  sort KEY [asc|desc]     sort by KEY; without a direction, repeat to flip
  sort off                back to source order
  next | prev | page N    move between pages
  refresh [all]           reload the active dataset (or both)
  stats                   column mean and std of the active dataset
  portfolio               equal-allocation summary (performance)
  export                  write the filtered, sorted rows as CSV
  show                    print the current page
  quit
";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Use(DatasetKind),
    Search(String),
    Sort(String, Option<SortDirection>),
    SortOff,
    Next,
    Prev,
    Page(usize),
    Refresh { all: bool },
    Stats,
    Portfolio,
    Export,
    Show,
    Help,
    Quit,
}

fn invalid(name: &str, value: &str) -> PicksError {
    PicksError::InvalidArgument {
        name: name.to_string(),
        value: value.to_string(),
    }
}

pub fn parse_command(line: &str) -> Result<SessionCommand, PicksError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    let command = match word.to_lowercase().as_str() {
        "use" => SessionCommand::Use(rest.parse()?),
        "search" | "/" => SessionCommand::Search(rest.to_string()),
        "sort" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some("off"), None, None) => SessionCommand::SortOff,
                (Some(key), None, None) => SessionCommand::Sort(key.to_string(), None),
                (Some(key), Some(dir), None) => {
                    SessionCommand::Sort(key.to_string(), Some(dir.parse()?))
                }
                _ => return Err(invalid("sort", rest)),
            }
        }
        "next" | "n" => SessionCommand::Next,
        "prev" | "p" => SessionCommand::Prev,
        "page" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => SessionCommand::Page(n),
            _ => return Err(invalid("page", rest)),
        },
        "refresh" => match rest {
            "" => SessionCommand::Refresh { all: false },
            "all" => SessionCommand::Refresh { all: true },
            other => return Err(invalid("refresh", other)),
        },
        "stats" => SessionCommand::Stats,
        "portfolio" => SessionCommand::Portfolio,
        "export" => SessionCommand::Export,
        "show" | "" => SessionCommand::Show,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => return Err(invalid("command", other)),
    };
    Ok(command)
}

pub struct Session<'a> {
    dashboard: Dashboard,
    source: &'a dyn DataPort,
    exporter: &'a dyn ExportPort,
    notional: f64,
    active: DatasetKind,
}

impl<'a> Session<'a> {
    pub fn new(source: &'a dyn DataPort, exporter: &'a dyn ExportPort, notional: f64) -> Self {
        Self {
            dashboard: Dashboard::new(),
            source,
            exporter,
            notional,
            active: DatasetKind::Performance,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn active(&self) -> DatasetKind {
        self.active
    }

    /// Loads both datasets, then reads commands until `quit` or end of input.
    pub fn run<I: BufRead, O: Write>(&mut self, input: I, out: &mut O) -> std::io::Result<()> {
        self.refresh(true, out)?;
        self.show(out)?;
        for line in input.lines() {
            let line = line?;
            let command = match parse_command(&line) {
                Ok(c) => c,
                Err(e) => {
                    writeln!(out, "error: {e} (try `help`)")?;
                    continue;
                }
            };
            if command == SessionCommand::Quit {
                break;
            }
            if let Err(e) = self.execute(command, out)? {
                writeln!(out, "error: {e}")?;
            }
        }
        Ok(())
    }

    /// Outer result is output I/O; inner result is the command's own outcome.
    pub fn execute<O: Write>(
        &mut self,
        command: SessionCommand,
        out: &mut O,
    ) -> std::io::Result<Result<(), PicksError>> {
        match command {
            SessionCommand::Use(kind) => {
                self.active = kind;
                self.show(out)?;
            }
            SessionCommand::Search(query) => {
                match self.active {
                    DatasetKind::Performance => self.dashboard.performance.view_mut().set_query(&query),
                    DatasetKind::Rebound => self.dashboard.rebound.view_mut().set_query(&query),
                }
                self.show(out)?;
            }
            SessionCommand::Sort(key, direction) => {
                if let Err(e) = self.apply_sort(&key, direction) {
                    return Ok(Err(e));
                }
                self.show(out)?;
            }
            SessionCommand::SortOff => {
                match self.active {
                    DatasetKind::Performance => self.dashboard.performance.view_mut().clear_sort(),
                    DatasetKind::Rebound => self.dashboard.rebound.view_mut().clear_sort(),
                }
                self.show(out)?;
            }
            SessionCommand::Next | SessionCommand::Prev | SessionCommand::Page(_) => {
                self.navigate(&command);
                self.show(out)?;
            }
            SessionCommand::Refresh { all } => {
                self.refresh(all, out)?;
                self.show(out)?;
            }
            SessionCommand::Stats => self.stats(out)?,
            SessionCommand::Portfolio => {
                let summaries = self.dashboard.portfolio(&DEFAULT_HORIZONS, self.notional);
                write!(out, "{}", render_portfolio(&summaries, self.notional))?;
            }
            SessionCommand::Export => {
                let today = chrono::Local::now().date_naive();
                match self.dashboard.export(self.active, self.exporter, today) {
                    Ok(path) => writeln!(out, "exported to {}", path.display())?,
                    Err(e) => return Ok(Err(e)),
                }
            }
            SessionCommand::Show => self.show(out)?,
            SessionCommand::Help => write!(out, "{HELP}")?,
            SessionCommand::Quit => {}
        }
        Ok(Ok(()))
    }

    fn apply_sort(&mut self, key: &str, direction: Option<SortDirection>) -> Result<(), PicksError> {
        match self.active {
            DatasetKind::Performance => {
                let key: PerfSortKey = key.parse()?;
                let view = self.dashboard.performance.view_mut();
                match direction {
                    Some(d) => view.set_sort(key, d),
                    None => view.toggle_sort(key),
                }
            }
            DatasetKind::Rebound => {
                let key: ReboundSortKey = key.parse()?;
                let view = self.dashboard.rebound.view_mut();
                match direction {
                    Some(d) => view.set_sort(key, d),
                    None => view.toggle_sort(key),
                }
            }
        }
        Ok(())
    }

    fn navigate(&mut self, command: &SessionCommand) {
        match self.active {
            DatasetKind::Performance => step(self.dashboard.performance.view_mut(), command),
            DatasetKind::Rebound => step(self.dashboard.rebound.view_mut(), command),
        }
    }

    fn refresh<O: Write>(&mut self, all: bool, out: &mut O) -> std::io::Result<()> {
        let kinds = if all {
            vec![DatasetKind::Performance, DatasetKind::Rebound]
        } else {
            vec![self.active]
        };
        for kind in kinds {
            let outcome = self.dashboard.refresh(kind, self.source);
            if outcome == RefreshOutcome::Failed {
                if let LoadStatus::Failed(msg) = self.dashboard.status(kind) {
                    writeln!(out, "error: {msg}")?;
                }
            }
        }
        Ok(())
    }

    fn stats<O: Write>(&self, out: &mut O) -> std::io::Result<()> {
        let text = match self.active {
            DatasetKind::Performance => {
                let metrics = numeric_metrics(&performance_columns());
                let stats = compute_stats(self.dashboard.performance.view().rows(), &metrics);
                render_stats::<PerformanceRow, _>(&stats)
            }
            DatasetKind::Rebound => {
                let metrics = numeric_metrics(&rebound_columns());
                let stats = compute_stats(self.dashboard.rebound.view().rows(), &metrics);
                render_stats::<ReboundRow, _>(&stats)
            }
        };
        write!(out, "{text}")
    }

    fn show<O: Write>(&self, out: &mut O) -> std::io::Result<()> {
        writeln!(out, "[{}]", self.active.label())?;
        if let LoadStatus::Failed(msg) = self.dashboard.status(self.active) {
            writeln!(out, "last refresh failed: {msg}")?;
        }
        let text = match self.active {
            DatasetKind::Performance => {
                let view = self.dashboard.performance.view();
                render_performance_page(&view.derive(), view.state().sort(), self.dashboard.reference())
            }
            DatasetKind::Rebound => {
                let view = self.dashboard.rebound.view();
                render_rebound_page(&view.derive(), view.state().sort())
            }
        };
        write!(out, "{text}")
    }
}

fn step<R: Row, K: SortKey<R>>(view: &mut DatasetView<R, K>, command: &SessionCommand) {
    match command {
        SessionCommand::Next => view.next_page(),
        SessionCommand::Prev => view.prev_page(),
        SessionCommand::Page(n) => view.go_to_page(n.saturating_sub(1)),
        _ => {}
    }
}
