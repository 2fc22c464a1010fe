use crate::table::parse_relevance;
use crate::{RecordsTable, ValidationError};

/// Ceiling for the cosmetic summary progress while the request is in flight.
pub const COSMETIC_PROGRESS_CAP: u8 = 90;
const COSMETIC_STEP: u8 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub result_text: String,
    pub file_name: String,
    pub relevance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRequest {
    pub query: String,
    pub rows: Vec<SummaryRow>,
}

pub struct SummaryRequestBuilder;

impl SummaryRequestBuilder {
    /// Reads the rendered Records table, not the raw poll snapshot, so any
    /// rows the user removed are left out.
    pub fn build(query_input: &str, table: &RecordsTable) -> Result<SummaryRequest, ValidationError> {
        let query = query_input.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if table.is_empty() {
            return Err(ValidationError::NoData);
        }

        let mut rows = Vec::with_capacity(table.row_count());
        for group in table.groups() {
            for row in group.rows() {
                let relevance = parse_relevance(&row.relevance_display).ok_or_else(|| {
                    ValidationError::MalformedRelevance {
                        file_name: group.file_name.clone(),
                        local_index: row.local_index,
                        value: row.relevance_display.clone(),
                    }
                })?;
                rows.push(SummaryRow {
                    result_text: row.text().to_string(),
                    file_name: group.file_name.clone(),
                    relevance,
                });
            }
        }

        Ok(SummaryRequest {
            query: query.to_string(),
            rows,
        })
    }
}

/// Cosmetic progress shown while a summary is generated. It advances on UI
/// ticks and is unrelated to request latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportProgress {
    #[default]
    Hidden,
    Indeterminate {
        percent: u8,
    },
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportState {
    progress: ReportProgress,
    content: Option<String>,
    error: Option<String>,
}

impl ReportState {
    pub fn progress(&self) -> ReportProgress {
        self.progress
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.progress, ReportProgress::Indeterminate { .. })
    }

    pub(crate) fn begin(&mut self) {
        self.progress = ReportProgress::Indeterminate { percent: 0 };
        self.content = None;
        self.error = None;
    }

    /// One animation step; `false` once the cap is reached or nothing is pending.
    pub(crate) fn advance(&mut self) -> bool {
        match self.progress {
            ReportProgress::Indeterminate { percent } if percent < COSMETIC_PROGRESS_CAP => {
                self.progress = ReportProgress::Indeterminate {
                    percent: percent.saturating_add(COSMETIC_STEP).min(COSMETIC_PROGRESS_CAP),
                };
                true
            }
            _ => false,
        }
    }

    pub(crate) fn succeed(&mut self, formatted_output: String) {
        self.progress = ReportProgress::Complete;
        self.content = Some(formatted_output);
        self.error = None;
    }

    pub(crate) fn fail(&mut self, error: String) {
        self.progress = ReportProgress::Complete;
        self.content = None;
        self.error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{ReportProgress, ReportState, SummaryRequestBuilder, SummaryRow, COSMETIC_PROGRESS_CAP};
    use crate::{ProgressSnapshot, RecordsTable, ResultItem, ValidationError};

    fn table(results: Vec<ResultItem>) -> RecordsTable {
        RecordsTable::from_snapshot(
            &ProgressSnapshot {
                percent: 100,
                results,
                ..ProgressSnapshot::default()
            },
            10,
        )
    }

    #[test]
    fn builds_rows_from_rendered_table() {
        let long = (1..=30).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let table = table(vec![
            ResultItem::new(long.clone(), 0.875, Some("a.pdf")),
            ResultItem::new("short", 0.25, None),
        ]);

        let request = SummaryRequestBuilder::build("  refunds ", &table).unwrap();
        assert_eq!(request.query, "refunds");
        assert_eq!(
            request.rows,
            vec![
                SummaryRow {
                    result_text: long,
                    file_name: "a.pdf".to_string(),
                    relevance: 0.875,
                },
                SummaryRow {
                    result_text: "short".to_string(),
                    file_name: "Unknown".to_string(),
                    relevance: 0.25,
                },
            ]
        );
    }

    #[test]
    fn removed_rows_are_not_sent() {
        let mut table = table(vec![
            ResultItem::new("keep", 0.5, Some("a")),
            ResultItem::new("drop", 0.5, Some("a")),
        ]);
        table.remove_row(0, 2);
        let request = SummaryRequestBuilder::build("q", &table).unwrap();
        let texts: Vec<_> = request.rows.iter().map(|r| r.result_text.as_str()).collect();
        assert_eq!(texts, vec!["keep"]);
    }

    #[test]
    fn empty_query_checked_before_table() {
        assert_eq!(
            SummaryRequestBuilder::build("   ", &RecordsTable::default()),
            Err(ValidationError::EmptyQuery)
        );
        assert_eq!(
            SummaryRequestBuilder::build("q", &RecordsTable::default()),
            Err(ValidationError::NoData)
        );
    }

    #[test]
    fn cosmetic_progress_stops_at_cap_until_completed() {
        let mut report = ReportState::default();
        assert!(!report.advance());
        report.begin();
        assert!(report.is_pending());
        let mut steps = 0;
        while report.advance() {
            steps += 1;
        }
        assert!(steps > 0);
        assert_eq!(
            report.progress(),
            ReportProgress::Indeterminate {
                percent: COSMETIC_PROGRESS_CAP
            }
        );
        report.succeed("<p>done</p>".to_string());
        assert_eq!(report.progress(), ReportProgress::Complete);
        assert_eq!(report.content(), Some("<p>done</p>"));
        assert!(!report.advance());
    }
}
