//! End-to-end pipeline tests: worked scenarios, dashboard refresh against a
//! mock source, the browse session and export delivery.

mod common;

use approx::assert_relative_eq;
use common::*;
use sctr_picks::browse::{Session, SessionCommand};
use sctr_picks::domain::dashboard::{Dashboard, LoadStatus, RefreshOutcome};
use sctr_picks::domain::error::PicksError;
use sctr_picks::domain::portfolio::{DEFAULT_NOTIONAL, simulate};
use sctr_picks::domain::row::{CurveShape, DatasetKind, PerfMetric, PerformanceRow, ReferenceRow};
use sctr_picks::domain::sort::{ReboundSortKey, SortDirection};
use sctr_picks::domain::statistics::column_stats;
use sctr_picks::domain::view::{DatasetView, ViewState};
use std::process::ExitCode;

mod scenarios {
    use super::*;

    fn three_rows() -> Vec<PerformanceRow> {
        vec![
            perf_with_1d(1, "AAA", Some(1.0)),
            perf_with_1d(2, "BBB", None),
            perf_with_1d(3, "CCC", Some(-3.0)),
        ]
    }

    #[test]
    fn mean_std_and_sort_over_three_rows() {
        let rows = three_rows();
        let stats = column_stats(&rows, PerfMetric::Perf1d);
        assert_eq!(stats.count, 2);
        assert_relative_eq!(stats.mean.unwrap(), -1.0);
        assert_relative_eq!(stats.std_dev.unwrap(), 8.0_f64.sqrt(), epsilon = 1e-12);

        let mut view: DatasetView<PerformanceRow, PerfMetric> =
            DatasetView::new(ViewState::default());
        view.replace_rows(rows);

        view.set_sort(PerfMetric::Perf1d, SortDirection::Descending);
        let derived = view.derive();
        assert_eq!(symbols(&derived.sorted), vec!["AAA", "CCC", "BBB"]);

        view.set_sort(PerfMetric::Perf1d, SortDirection::Ascending);
        let derived = view.derive();
        assert_eq!(symbols(&derived.sorted), vec!["BBB", "CCC", "AAA"]);
    }

    #[test]
    fn query_shrinking_results_clamps_page() {
        let mut rows = generate_perf_rows(120);
        for row in rows.iter_mut().take(30) {
            row.name = Some(format!("Widget {}", row.rank));
        }
        let mut view: DatasetView<PerformanceRow, PerfMetric> =
            DatasetView::new(ViewState::default());
        view.replace_rows(rows);
        view.go_to_page(2);
        let derived = view.derive();
        assert_eq!(derived.page_index, 2);
        assert_eq!(derived.page().len(), 20);
        assert_eq!(derived.window.to_string(), "101–120 of 120");

        view.set_query("widget");
        let derived = view.derive();
        assert_eq!(derived.sorted.len(), 30);
        assert_eq!(derived.total_pages, 1);
        assert_eq!(derived.page_index, 0);
        assert_eq!(view.state().page_index, 0);
    }

    #[test]
    fn page_index_is_pulled_down_not_reset() {
        let mut rows = generate_perf_rows(200);
        for row in rows.iter_mut().skip(120) {
            row.name = Some("Other".into());
        }
        let mut view: DatasetView<PerformanceRow, PerfMetric> =
            DatasetView::new(ViewState::default());
        view.replace_rows(rows);
        view.go_to_page(3);
        view.set_query("company");
        assert_eq!(view.derive().total_pages, 3);
        assert_eq!(view.state().page_index, 2);
    }

    #[test]
    fn portfolio_over_two_rows() {
        let rows = vec![
            PerformanceRow {
                perf60d: Some(10.0),
                ..perf_row(1, "AAA", "")
            },
            perf_row(2, "BBB", ""),
        ];
        let summary = simulate(&rows, PerfMetric::Perf60d, DEFAULT_NOTIONAL);
        assert_relative_eq!(summary.invested, 200.0);
        assert_relative_eq!(summary.total_value, 210.0);
        assert_relative_eq!(summary.profit, 10.0, epsilon = 1e-9);
        assert_relative_eq!(summary.pct, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_dataset_is_not_an_error() {
        let view: DatasetView<PerformanceRow, PerfMetric> = DatasetView::new(ViewState::default());
        let derived = view.derive();
        assert_eq!(derived.total_pages, 1);
        assert!(derived.page().is_empty());
        assert_eq!(derived.window.to_string(), "0 of 0");
        let stats = column_stats(view.rows(), PerfMetric::Perf5d);
        assert!(stats.mean.is_none() && stats.std_dev.is_none());
    }
}

mod dashboard {
    use super::*;

    fn source() -> MockDataPort {
        MockDataPort::new()
            .with_performance(generate_perf_rows(75))
            .with_reference(ReferenceRow {
                symbol: "QQQ".into(),
                perf1d: Some(0.5),
                perf5d: Some(1.5),
                perf20d: None,
                perf60d: None,
            })
            .with_rebound(vec![
                rebound_row(1, "W", Some(CurveShape::WayDown)),
                rebound_row(2, "N", None),
                rebound_row(3, "V", Some(CurveShape::VShape)),
                rebound_row(4, "A", Some(CurveShape::AShape)),
                rebound_row(5, "U", Some(CurveShape::WayUp)),
            ])
    }

    #[test]
    fn refresh_all_loads_both_datasets() {
        let port = source();
        let mut dash = Dashboard::new();
        assert_eq!(
            dash.refresh_all(&port),
            [RefreshOutcome::Applied, RefreshOutcome::Applied]
        );
        assert_eq!(port.calls.get(), 2);
        assert_eq!(dash.performance.view().rows().len(), 75);
        assert_eq!(dash.reference().map(|r| r.symbol.as_str()), Some("QQQ"));

        let derived = dash.rebound.view().derive();
        let order: Vec<&str> = derived
            .sorted
            .iter()
            .map(|r| r.symbol.as_str())
            .collect();
        assert_eq!(order, vec!["N", "V", "U", "A", "W"]);
    }

    #[test]
    fn one_dataset_failing_leaves_the_other_usable() {
        let port = source().with_error(DatasetKind::Rebound, "connection reset");
        let mut dash = Dashboard::new();
        let outcomes = dash.refresh_all(&port);
        assert_eq!(outcomes, [RefreshOutcome::Applied, RefreshOutcome::Failed]);
        assert_eq!(dash.status(DatasetKind::Performance), &LoadStatus::Ready);
        match dash.status(DatasetKind::Rebound) {
            LoadStatus::Failed(msg) => assert!(msg.contains("connection reset")),
            other => panic!("unexpected status {other:?}"),
        }
        dash.performance.view_mut().next_page();
        assert_eq!(dash.performance.view().derive().page().len(), 25);
    }

    #[test]
    fn refresh_keeps_view_state_and_reclamps() {
        let mut dash = Dashboard::new();
        dash.refresh_all(&source());
        dash.performance.view_mut().go_to_page(1);
        dash.performance.view_mut().toggle_sort(PerfMetric::Perf60d);

        let smaller = MockDataPort::new().with_performance(generate_perf_rows(10));
        dash.refresh(DatasetKind::Performance, &smaller);
        let state = dash.performance.view().state();
        assert_eq!(state.page_index, 0);
        assert_eq!(state.sort_key, Some(PerfMetric::Perf60d));
        assert!(dash.reference().is_none());
    }

    #[test]
    fn export_through_port_names_file_by_date() {
        let mut dash = Dashboard::new();
        dash.refresh_all(&source());
        dash.rebound.view_mut().set_sort(ReboundSortKey::Rank, SortDirection::Descending);

        let exports = MemoryExportPort::default();
        let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        dash.export(DatasetKind::Rebound, &exports, date).unwrap();

        let files = exports.files.borrow();
        assert_eq!(files[0].0, "rebound-2026-10-19.csv");
        let lines: Vec<&str> = files[0].1.split("\r\n").collect();
        assert!(lines[3].starts_with("5,U,,way_up,"));
        assert!(lines[7].starts_with("1,W,,way_down,"));
    }
}

mod session {
    use super::*;

    fn run_session(port: &MockDataPort, exports: &MemoryExportPort, script: &str) -> String {
        let mut session = Session::new(port, exports, 100.0);
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn port() -> MockDataPort {
        MockDataPort::new()
            .with_performance(generate_perf_rows(60))
            .with_rebound(vec![
                rebound_row(1, "S0001", Some(CurveShape::WayUp)),
                rebound_row(2, "ZED", None),
            ])
    }

    #[test]
    fn searches_stay_per_dataset() {
        let port = port();
        let exports = MemoryExportPort::default();
        let mut session = Session::new(&port, &exports, 100.0);
        let mut out = Vec::new();
        session.run("search zed\nuse perf\n".as_bytes(), &mut out).unwrap();
        assert_eq!(session.dashboard().performance.view().state().search_query, "zed");
        assert_eq!(session.dashboard().rebound.view().state().search_query, "");

        let mut out = Vec::new();
        session
            .execute(SessionCommand::Use(DatasetKind::Rebound), &mut out)
            .unwrap()
            .unwrap();
        session
            .execute(SessionCommand::Search("s0001".into()), &mut out)
            .unwrap()
            .unwrap();
        assert_eq!(session.active(), DatasetKind::Rebound);
        assert_eq!(session.dashboard().rebound.view().derive().sorted.len(), 1);
        assert_eq!(session.dashboard().performance.view().state().search_query, "zed");
    }

    #[test]
    fn paging_and_sorting_commands() {
        let port = port();
        let exports = MemoryExportPort::default();
        let text = run_session(&port, &exports, "next\nnext\nsort perf1d\nsort perf1d\nquit\nnext\n");
        assert!(text.contains("51–60 of 60  (page 2 of 2)"));
        assert!(text.contains("1D ↓"));
        assert!(text.contains("1D ↑"));
    }

    #[test]
    fn bad_command_reports_and_continues() {
        let port = port();
        let exports = MemoryExportPort::default();
        let text = run_session(&port, &exports, "dance\nsort volume\nexport\n");
        assert!(text.contains("error: invalid command: \"dance\""));
        assert!(text.contains("error: invalid"));
        assert!(text.contains("exported to performance-"));
        assert_eq!(exports.files.borrow().len(), 1);
    }

    #[test]
    fn failed_refresh_is_shown_but_session_continues() {
        let port = port().with_error(DatasetKind::Performance, "timed out");
        let exports = MemoryExportPort::default();
        let text = run_session(&port, &exports, "use rebound\nportfolio\n");
        assert!(text.contains("error: failed to load performance data: timed out"));
        assert!(text.contains("ZED"));
        assert!(text.contains("the amount you earn in 60D"));
    }
}

mod errors {
    use super::*;

    #[test]
    fn exit_codes_by_error_class() {
        let transport = PicksError::Transport {
            dataset: DatasetKind::Performance,
            reason: "down".into(),
        };
        let html = PicksError::HtmlPayload {
            dataset: DatasetKind::Rebound,
        };
        let arg = PicksError::InvalidArgument {
            name: "page".into(),
            value: "0".into(),
        };
        let code = |e: &PicksError| format!("{:?}", ExitCode::from(e));
        assert_eq!(code(&transport), format!("{:?}", ExitCode::from(3)));
        assert_eq!(code(&html), format!("{:?}", ExitCode::from(4)));
        assert_eq!(code(&arg), format!("{:?}", ExitCode::from(5)));
        assert!(html.is_payload_error());
        assert!(!transport.is_payload_error());
    }
}
