use std::fmt;

use report_core::{PollGeneration, ProgressSnapshot};

/// Server acknowledgement of a start request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StartAck {
    pub message: Option<String>,
}

/// What the summary service answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Ready { formatted_output: String },
    Rejected { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    JobStarted {
        result: Result<StartAck, ApiError>,
    },
    Progress {
        generation: PollGeneration,
        result: Result<ProgressSnapshot, ApiError>,
    },
    SummaryCompleted {
        result: Result<SummaryOutcome, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
