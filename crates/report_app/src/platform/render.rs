//! Text rendering of the view model for the terminal.

use std::fmt::Write;

use report_core::{
    AppViewModel, PollerStatus, RecordsView, ReportProgress, ReportView, SortColumn,
    SortDirection, SortOrder, TabId,
};
use report_engine::report_plain_text;

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    render_tabs(&mut out, view.tab);
    if let Some(notification) = &view.notification {
        let _ = writeln!(out, "! {notification}  (type `dismiss` to hide)");
    }
    match view.tab {
        TabId::Query => render_query(&mut out, view),
        TabId::Records => {
            render_validation(&mut out, view);
            render_records(&mut out, view);
        }
        TabId::Report => {
            render_validation(&mut out, view);
            render_report(&mut out, &view.report);
        }
    }
    out
}

fn render_validation(out: &mut String, view: &AppViewModel) {
    if let Some(error) = &view.validation_error {
        let _ = writeln!(out, "Error: {error}");
    }
}

fn sort_label(sort: SortOrder) -> String {
    let column = match sort.column {
        SortColumn::Number => "no",
        SortColumn::Relevance => "relevance",
    };
    let arrow = match sort.direction {
        SortDirection::Ascending => "asc",
        SortDirection::Descending => "desc",
    };
    format!("{column} {arrow}")
}

fn render_tabs(out: &mut String, current: TabId) {
    let labels: Vec<String> = TabId::ALL
        .into_iter()
        .map(|tab| {
            if tab == current {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect();
    let _ = writeln!(out, "{}", labels.join(" "));
}

fn render_query(out: &mut String, view: &AppViewModel) {
    let _ = writeln!(out, "Query: {}", view.query);
    let _ = writeln!(out, "Mode:  {}", view.mode.label());
    if view.mode.requires_limit() {
        let _ = writeln!(out, "Limit: {}", view.limit_input);
    }
    render_validation(out, view);
}

fn render_records(out: &mut String, view: &AppViewModel) {
    match (view.analysis_percent, view.poller) {
        (Some(percent), PollerStatus::Polling) => {
            let _ = writeln!(out, "Analysing... {percent}%");
        }
        (Some(percent), _) => {
            let _ = writeln!(out, "Analysis {percent}%");
        }
        (None, _) => {}
    }
    render_tables(out, &view.records);
}

fn render_tables(out: &mut String, records: &RecordsView) {
    if let Some(summary) = &records.full_summary {
        let _ = writeln!(out, "Summary: {summary}");
    }
    if records.tables.is_empty() && records.orphan_summaries.is_empty() {
        let _ = writeln!(out, "No records.");
        return;
    }
    for (number, table) in records.tables.iter().enumerate() {
        let _ = writeln!(
            out,
            "== {}. {} (page {}/{}, {} rows) ==",
            number + 1,
            table.file_name,
            table.page + 1,
            table.page_count,
            table.total_rows
        );
        if let Some(summary) = &table.summary {
            let _ = writeln!(out, "   {summary}");
        }
        if !table.filter.is_empty() || table.sort != SortOrder::default() {
            let _ = writeln!(
                out,
                "   filter: {:?} ({} of {} rows), sort: {}",
                table.filter,
                table.matching_rows,
                table.total_rows,
                sort_label(table.sort)
            );
        }
        for row in &table.rows {
            let marker = if row.expanded { '-' } else { '+' };
            let _ = writeln!(
                out,
                " {marker} {:>3}  {:>7}  {}",
                row.local_index, row.relevance, row.preview
            );
            if let Some(full_text) = &row.full_text {
                let _ = writeln!(out, "          {full_text}");
            }
        }
    }
    if !records.orphan_summaries.is_empty() {
        let _ = writeln!(out, "Other files:");
        for orphan in &records.orphan_summaries {
            let _ = writeln!(out, "   {}: {}", orphan.file_name, orphan.summary);
        }
    }
}

fn render_report(out: &mut String, report: &ReportView) {
    match report.progress {
        ReportProgress::Hidden => {}
        ReportProgress::Indeterminate { percent } => {
            let _ = writeln!(out, "Generating summary... {percent}%");
        }
        ReportProgress::Complete => {
            let _ = writeln!(out, "Summary complete.");
        }
    }
    if let Some(content) = &report.content {
        let _ = writeln!(out, "{}", report_plain_text(content));
    }
    if let Some(error) = &report.error {
        let _ = writeln!(out, "Error: {error}");
    }
    if report.content.is_none() && report.error.is_none() && report.progress == ReportProgress::Hidden
    {
        let _ = writeln!(out, "No report yet.");
    }
}
