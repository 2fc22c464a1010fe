use std::sync::Once;

use pretty_assertions::assert_eq;
use report_core::{
    update, AppState, Effect, Msg, ProgressSnapshot, ReportProgress, ResultItem, SortColumn,
    SummaryRequest, SummaryRow, TabId, COSMETIC_PROGRESS_CAP,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(report_logging::initialize_for_tests);
}

fn completed_job() -> AppState {
    let (state, _) = update(AppState::new(), Msg::QueryChanged("refunds".to_string()));
    let (state, _) = update(state, Msg::LimitChanged("5".to_string()));
    let (state, _) = update(state, Msg::GenerateClicked);
    let (state, effects) = update(state, Msg::JobStartAcknowledged { message: None });
    let generation = match effects.as_slice() {
        [Effect::StartPolling { generation }] => *generation,
        other => panic!("expected StartPolling, got {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::ProgressReceived {
            generation,
            snapshot: ProgressSnapshot {
                percent: 100,
                results: vec![
                    ResultItem::new("Refunds within 14 days.", 0.5, Some("policy.pdf")),
                    ResultItem::new("Ticket about refunds.", 0.25, Some("tickets.csv")),
                    ResultItem::new("Sale items are final.", 0.125, Some("policy.pdf")),
                ],
                ..ProgressSnapshot::default()
            },
        },
    );
    state
}

fn row(text: &str, file: &str, relevance: f64) -> SummaryRow {
    SummaryRow {
        result_text: text.to_string(),
        file_name: file.to_string(),
        relevance,
    }
}

#[test]
fn summary_is_built_from_rendered_table() {
    init_logging();
    let state = completed_job();
    let (state, effects) = update(state, Msg::SummaryClicked);

    assert_eq!(
        effects,
        vec![Effect::SubmitSummary(SummaryRequest {
            query: "refunds".to_string(),
            rows: vec![
                row("Refunds within 14 days.", "policy.pdf", 0.5),
                row("Sale items are final.", "policy.pdf", 0.125),
                row("Ticket about refunds.", "tickets.csv", 0.25),
            ],
        })]
    );
    let view = state.view();
    assert_eq!(view.tab, TabId::Report);
    assert_eq!(view.report.progress, ReportProgress::Indeterminate { percent: 0 });
}

#[test]
fn summary_uses_edited_query_and_table() {
    init_logging();
    let state = completed_job();
    let (state, _) = update(state, Msg::QueryChanged("refund timing".to_string()));
    let (state, _) = update(
        state,
        Msg::RowRemoved {
            group: 0,
            local_index: 2,
        },
    );
    let (_, effects) = update(state, Msg::SummaryClicked);

    assert_eq!(
        effects,
        vec![Effect::SubmitSummary(SummaryRequest {
            query: "refund timing".to_string(),
            rows: vec![
                row("Refunds within 14 days.", "policy.pdf", 0.5),
                row("Ticket about refunds.", "tickets.csv", 0.25),
            ],
        })]
    );
}

#[test]
fn summary_without_rows_reports_no_data() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::QueryChanged("refunds".to_string()));
    let (state, effects) = update(state, Msg::SummaryClicked);

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.tab, TabId::Query);
    assert_eq!(
        view.validation_error.as_deref(),
        Some("no data available in the table to process")
    );
}

#[test]
fn summary_with_cleared_query_reports_empty_query() {
    init_logging();
    let state = completed_job();
    let (state, _) = update(state, Msg::QueryChanged(String::new()));
    let (state, effects) = update(state, Msg::SummaryClicked);

    assert!(effects.is_empty());
    assert_eq!(state.view().tab, TabId::Records);
    assert_eq!(
        state.view().validation_error.as_deref(),
        Some("please enter a query")
    );
}

#[test]
fn ticks_animate_until_response_arrives() {
    init_logging();
    let (mut state, _) = update(completed_job(), Msg::SummaryClicked);
    for _ in 0..100 {
        let (next, _) = update(state, Msg::Tick);
        state = next;
    }
    assert_eq!(
        state.view().report.progress,
        ReportProgress::Indeterminate {
            percent: COSMETIC_PROGRESS_CAP
        }
    );

    let (mut state, _) = update(
        state,
        Msg::SummaryReady {
            formatted_output: "<h2>Summary</h2><p>Two weeks.</p>".to_string(),
        },
    );
    assert!(state.consume_dirty());
    let report = state.view().report;
    assert_eq!(report.progress, ReportProgress::Complete);
    assert_eq!(
        report.content.as_deref(),
        Some("<h2>Summary</h2><p>Two weeks.</p>")
    );
    assert_eq!(report.error, None);

    let (mut state, _) = update(state, Msg::Tick);
    assert!(!state.consume_dirty());
}

#[test]
fn failure_stays_on_report_tab_with_inline_error() {
    init_logging();
    let (state, _) = update(completed_job(), Msg::SummaryClicked);
    let (state, _) = update(
        state,
        Msg::SummaryFailed {
            error: "Error: model unavailable".to_string(),
        },
    );
    let view = state.view();
    assert_eq!(view.tab, TabId::Report);
    assert_eq!(view.report.error.as_deref(), Some("Error: model unavailable"));
    assert_eq!(view.report.content, None);

    // A retry is allowed after failure.
    let (_, effects) = update(state, Msg::SummaryClicked);
    assert_eq!(effects.len(), 1);
}

#[test]
fn second_summary_while_pending_is_refused() {
    init_logging();
    let (state, _) = update(completed_job(), Msg::SummaryClicked);
    let (state, effects) = update(state, Msg::SummaryClicked);
    assert!(effects.is_empty());
    assert!(state.view().notification.is_some());
}

#[test]
fn expanding_a_row_reveals_full_text() {
    init_logging();
    let state = completed_job();
    let (mut state, _) = update(
        state,
        Msg::RowToggled {
            group: 0,
            local_index: 1,
        },
    );
    assert!(state.consume_dirty());
    let rows = &state.view().records.tables[0].rows;
    assert!(rows[0].expanded);
    assert_eq!(rows[0].full_text.as_deref(), Some("Refunds within 14 days."));
    assert!(!rows[1].expanded);
    assert_eq!(rows[1].full_text, None);

    let (mut state, _) = update(
        state,
        Msg::PageChanged {
            group: 0,
            page: 4,
        },
    );
    // Both rows fit on the first page, so there is nowhere to go.
    assert!(!state.consume_dirty());
}

#[test]
fn no_data_error_shows_on_records_tab_until_user_moves_on() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::QueryChanged("refunds".to_string()));
    let (state, _) = update(state, Msg::TabSelected(TabId::Records));
    let (mut state, effects) = update(state, Msg::SummaryClicked);

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.tab, TabId::Records);
    assert_eq!(
        view.validation_error.as_deref(),
        Some("no data available in the table to process")
    );

    let (state, _) = update(state, Msg::TabSelected(TabId::Query));
    assert_eq!(state.view().validation_error, None);

    let (state, _) = update(state, Msg::SummaryClicked);
    assert!(state.view().validation_error.is_some());
    let (state, _) = update(state, Msg::QueryChanged("refund timing".to_string()));
    assert_eq!(state.view().validation_error, None);
}

#[test]
fn filter_and_sort_change_the_view_but_not_the_summary() {
    init_logging();
    let state = completed_job();
    let (state, _) = update(
        state,
        Msg::SortChanged {
            group: 0,
            column: SortColumn::Relevance,
        },
    );
    let (mut state, _) = update(
        state,
        Msg::FilterChanged {
            group: 0,
            text: "sale".to_string(),
        },
    );
    assert!(state.consume_dirty());

    let table = &state.view().records.tables[0];
    assert_eq!(table.filter, "sale");
    assert_eq!(table.total_rows, 2);
    assert_eq!(table.matching_rows, 1);
    let shown: Vec<_> = table.rows.iter().map(|row| row.local_index).collect();
    assert_eq!(shown, vec![2]);

    let (_, effects) = update(state, Msg::SummaryClicked);
    assert_eq!(
        effects,
        vec![Effect::SubmitSummary(SummaryRequest {
            query: "refunds".to_string(),
            rows: vec![
                row("Refunds within 14 days.", "policy.pdf", 0.5),
                row("Sale items are final.", "policy.pdf", 0.125),
                row("Ticket about refunds.", "tickets.csv", 0.25),
            ],
        })]
    );
}
