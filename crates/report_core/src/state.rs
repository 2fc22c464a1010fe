use crate::view_model::{AppViewModel, RecordsView, ReportView, RowView, TableView};
use crate::{
    GroupTable, JobMode, PollerState, ProgressSnapshot, RecordsTable, ReportState, TabState,
    ValidationError, DEFAULT_PAGE_SIZE,
};

/// The whole client state. Each concern is owned by one field and only
/// `update` writes to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    tab: TabState,
    query_input: String,
    mode: JobMode,
    limit_input: String,
    validation_error: Option<ValidationError>,
    start_pending: bool,
    analysis_percent: Option<u8>,
    poller: PollerState,
    records: RecordsTable,
    report: ReportState,
    notification: Option<String>,
    page_size: usize,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            tab: TabState::new(),
            query_input: String::new(),
            mode: JobMode::default(),
            limit_input: String::new(),
            validation_error: None,
            start_pending: false,
            analysis_percent: None,
            poller: PollerState::default(),
            records: RecordsTable::empty(page_size),
            report: ReportState::default(),
            notification: None,
            page_size,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            tab: self.tab.current(),
            query: self.query_input.clone(),
            mode: self.mode,
            limit_input: self.limit_input.clone(),
            validation_error: self.validation_error.as_ref().map(ToString::to_string),
            analysis_percent: self.analysis_percent,
            poller: self.poller.status(),
            records: records_view(&self.records),
            report: ReportView {
                progress: self.report.progress(),
                content: self.report.content().map(ToOwned::to_owned),
                error: self.report.error().map(ToOwned::to_owned),
            },
            notification: self.notification.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn poller(&self) -> &PollerState {
        &self.poller
    }

    pub fn records(&self) -> &RecordsTable {
        &self.records
    }

    pub fn report(&self) -> &ReportState {
        &self.report
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn tab_mut(&mut self) -> &mut TabState {
        &mut self.tab
    }

    pub(crate) fn poller_mut(&mut self) -> &mut PollerState {
        &mut self.poller
    }

    pub(crate) fn records_mut(&mut self) -> &mut RecordsTable {
        &mut self.records
    }

    pub(crate) fn report_mut(&mut self) -> &mut ReportState {
        &mut self.report
    }

    pub(crate) fn query_input(&self) -> &str {
        &self.query_input
    }

    pub(crate) fn mode(&self) -> JobMode {
        self.mode
    }

    pub(crate) fn limit_input(&self) -> &str {
        &self.limit_input
    }

    pub(crate) fn set_query_input(&mut self, query: String) -> bool {
        replace_if_changed(&mut self.query_input, query)
    }

    pub(crate) fn set_mode(&mut self, mode: JobMode) -> bool {
        replace_if_changed(&mut self.mode, mode)
    }

    pub(crate) fn set_limit_input(&mut self, limit: String) -> bool {
        replace_if_changed(&mut self.limit_input, limit)
    }

    pub(crate) fn set_validation_error(&mut self, error: Option<ValidationError>) -> bool {
        replace_if_changed(&mut self.validation_error, error)
    }

    pub(crate) fn is_start_pending(&self) -> bool {
        self.start_pending
    }

    pub(crate) fn set_start_pending(&mut self, pending: bool) {
        self.start_pending = pending;
    }

    pub(crate) fn set_analysis_percent(&mut self, percent: Option<u8>) -> bool {
        replace_if_changed(&mut self.analysis_percent, percent)
    }

    /// Forget the previous job's output before a new one starts.
    pub(crate) fn reset_for_new_job(&mut self) {
        self.analysis_percent = Some(0);
        self.records = RecordsTable::empty(self.page_size);
        self.notification = None;
    }

    pub(crate) fn show_snapshot_results(&mut self, snapshot: &ProgressSnapshot) {
        self.records = RecordsTable::from_snapshot(snapshot, self.page_size);
    }

    pub(crate) fn set_notification(&mut self, notification: Option<String>) -> bool {
        replace_if_changed(&mut self.notification, notification)
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn records_view(records: &RecordsTable) -> RecordsView {
    let page_size = records.page_size();
    RecordsView {
        full_summary: records.full_summary.clone(),
        tables: records
            .groups()
            .iter()
            .map(|group| table_view(group, page_size))
            .collect(),
        orphan_summaries: records.orphan_summaries.clone(),
        total_rows: records.row_count(),
    }
}

fn table_view(group: &GroupTable, page_size: usize) -> TableView {
    TableView {
        file_name: group.file_name.clone(),
        summary: group.summary.clone(),
        page: group.page(),
        page_count: group.page_count(page_size),
        total_rows: group.rows().len(),
        matching_rows: group.visible_rows().len(),
        filter: group.filter().to_string(),
        sort: group.sort(),
        rows: group
            .page_rows(page_size)
            .iter()
            .map(|row| {
                let expanded = group.is_expanded(row.local_index);
                RowView {
                    local_index: row.local_index,
                    preview: row.preview.clone(),
                    relevance: row.relevance_display.clone(),
                    expanded,
                    full_text: expanded.then(|| row.text().to_string()),
                }
            })
            .collect(),
    }
}
