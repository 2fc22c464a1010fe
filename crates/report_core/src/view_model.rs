use crate::{FileSummary, JobMode, PollerStatus, ReportProgress, SortOrder, TabId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub tab: TabId,
    pub query: String,
    pub mode: JobMode,
    pub limit_input: String,
    pub validation_error: Option<String>,
    /// `None` while the progress bar is hidden.
    pub analysis_percent: Option<u8>,
    pub poller: PollerStatus,
    pub records: RecordsView,
    pub report: ReportView,
    pub notification: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordsView {
    pub full_summary: Option<String>,
    pub tables: Vec<TableView>,
    pub orphan_summaries: Vec<FileSummary>,
    pub total_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub file_name: String,
    pub summary: Option<String>,
    /// 0-based.
    pub page: usize,
    pub page_count: usize,
    pub total_rows: usize,
    /// Rows passing the filter, across all pages.
    pub matching_rows: usize,
    pub filter: String,
    pub sort: SortOrder,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub local_index: usize,
    pub preview: String,
    pub relevance: String,
    pub expanded: bool,
    /// Present only while the row is expanded.
    pub full_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportView {
    pub progress: ReportProgress,
    pub content: Option<String>,
    pub error: Option<String>,
}
