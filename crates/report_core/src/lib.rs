//! Report core: pure state machine, results projection and view-model helpers.
mod effect;
mod error;
mod job;
mod msg;
mod poller;
mod projector;
mod snapshot;
mod state;
mod summary;
mod tab;
mod table;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::ValidationError;
pub use job::{Job, JobMode, JobRequestBuilder};
pub use msg::Msg;
pub use poller::{PollGeneration, PollerState, PollerStatus};
pub use projector::{flatten, preview, project, FileGroup, GroupedItem, PREVIEW_WORDS, TRUNCATION_MARKER};
pub use snapshot::{FileSummary, ProgressSnapshot, ResultItem, MAX_PERCENT, UNKNOWN_FILE_NAME};
pub use state::AppState;
pub use summary::{
    ReportProgress, ReportState, SummaryRequest, SummaryRequestBuilder, SummaryRow,
    COSMETIC_PROGRESS_CAP,
};
pub use tab::{TabId, TabState};
pub use table::{
    format_relevance, parse_relevance, GroupTable, RecordsTable, SortColumn, SortDirection,
    SortOrder, TableRow, DEFAULT_PAGE_SIZE, NO_FILE_SUMMARY,
};
pub use update::update;
pub use view_model::{AppViewModel, RecordsView, ReportView, RowView, TableView};
