pub const MAX_PERCENT: u8 = 100;
pub const UNKNOWN_FILE_NAME: &str = "Unknown";

/// One scored match returned by the analysis job.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub text: String,
    pub relevance: f64,
    pub file_name: Option<String>,
}

impl ResultItem {
    pub fn new(text: impl Into<String>, relevance: f64, file_name: Option<&str>) -> Self {
        Self {
            text: text.into(),
            relevance,
            file_name: file_name.map(ToOwned::to_owned),
        }
    }

    /// Attribution used for grouping; blank names count as absent.
    pub fn file_name_or_unknown(&self) -> &str {
        self.file_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_FILE_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub file_name: String,
    pub summary: String,
}

/// One poll response. Each snapshot replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressSnapshot {
    pub percent: u8,
    pub full_summary: Option<String>,
    pub file_summaries: Vec<FileSummary>,
    pub results: Vec<ResultItem>,
}

impl ProgressSnapshot {
    pub fn in_progress(percent: u8) -> Self {
        Self {
            percent,
            ..Self::default()
        }
    }

    pub fn terminal(&self) -> bool {
        self.percent == MAX_PERCENT
    }
}
