//! Report engine: HTTP client, progress polling and report export.
mod api;
mod engine;
mod export;
mod persist;
mod poller;
mod types;
mod wire;

pub use api::{ClientSettings, ReportApi, ReqwestReportApi};
pub use engine::EngineHandle;
pub use export::{export_report, report_plain_text, ExportError, ExportSummary};
pub use persist::{PersistError, ReportWriter};
pub use poller::{ChannelEventSink, EventSink, ProgressPoller};
pub use types::{ApiError, EngineError, EngineEvent, FailureKind, StartAck, SummaryOutcome};
