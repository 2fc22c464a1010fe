//! JSON shapes exchanged with the analysis server and their validation into
//! core types. Nothing loosely typed gets past this module.

use report_core::{
    FileSummary, Job, ProgressSnapshot, ResultItem, SummaryRequest, MAX_PERCENT,
};
use report_logging::report_warn;
use serde::{Deserialize, Serialize};

use crate::{ApiError, FailureKind, StartAck, SummaryOutcome};

#[derive(Debug, Serialize)]
pub(crate) struct StartAnalysisBody<'a> {
    query: &'a str,
    #[serde(rename = "useLLM")]
    use_llm: bool,
    #[serde(rename = "resultLimit", skip_serializing_if = "Option::is_none")]
    result_limit: Option<u32>,
}

impl<'a> From<&'a Job> for StartAnalysisBody<'a> {
    fn from(job: &'a Job) -> Self {
        Self {
            query: &job.query,
            use_llm: job.mode.uses_llm(),
            result_limit: job.result_limit,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartAnalysisReply {
    #[serde(default)]
    message: Option<String>,
}

impl From<StartAnalysisReply> for StartAck {
    fn from(reply: StartAnalysisReply) -> Self {
        StartAck {
            message: reply.message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressReply {
    progress: i64,
    #[serde(default)]
    results: Option<Vec<WireResult>>,
    #[serde(default)]
    full_summary: Option<String>,
    #[serde(default)]
    file_summaries: Option<Vec<String>>,
    #[serde(default)]
    file_names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct WireResult {
    result: String,
    relevance: f64,
    #[serde(default)]
    file_name: Option<String>,
}

impl ProgressReply {
    pub(crate) fn into_snapshot(self) -> Result<ProgressSnapshot, ApiError> {
        let percent = u8::try_from(self.progress)
            .ok()
            .filter(|percent| *percent <= MAX_PERCENT)
            .ok_or_else(|| decode_error(format!("progress {} outside 0..=100", self.progress)))?;

        let summaries = self.file_summaries.unwrap_or_default();
        let names = self.file_names.unwrap_or_default();
        if summaries.len() != names.len() {
            return Err(decode_error(format!(
                "{} file summaries for {} file names",
                summaries.len(),
                names.len()
            )));
        }
        let file_summaries = names
            .into_iter()
            .zip(summaries)
            .map(|(file_name, summary)| FileSummary { file_name, summary })
            .collect();

        let results = self
            .results
            .unwrap_or_default()
            .into_iter()
            .map(WireResult::into_item)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProgressSnapshot {
            percent,
            full_summary: self.full_summary,
            file_summaries,
            results,
        })
    }
}

impl WireResult {
    fn into_item(self) -> Result<ResultItem, ApiError> {
        if !self.relevance.is_finite() {
            return Err(decode_error(format!("relevance {} is not finite", self.relevance)));
        }
        let relevance = if (0.0..=1.0).contains(&self.relevance) {
            self.relevance
        } else {
            report_warn!("Clamping relevance {} into [0, 1]", self.relevance);
            self.relevance.clamp(0.0, 1.0)
        };
        Ok(ResultItem {
            text: self.result,
            relevance,
            file_name: self.file_name.filter(|name| !name.trim().is_empty()),
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SummaryBody<'a> {
    query: &'a str,
    data: Vec<SummaryDatum<'a>>,
}

#[derive(Debug, Serialize)]
struct SummaryDatum<'a> {
    result: &'a str,
    file_name: &'a str,
    relevance: f64,
}

impl<'a> From<&'a SummaryRequest> for SummaryBody<'a> {
    fn from(request: &'a SummaryRequest) -> Self {
        Self {
            query: &request.query,
            data: request
                .rows
                .iter()
                .map(|row| SummaryDatum {
                    result: &row.result_text,
                    file_name: &row.file_name,
                    relevance: row.relevance,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryReply {
    success: bool,
    #[serde(default)]
    formatted_output: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl SummaryReply {
    pub(crate) fn into_outcome(self) -> Result<SummaryOutcome, ApiError> {
        match (self.success, self.formatted_output) {
            (true, Some(formatted_output)) => Ok(SummaryOutcome::Ready { formatted_output }),
            (true, None) => Err(decode_error("success reply without formatted_output")),
            (false, _) => Ok(SummaryOutcome::Rejected {
                error: self
                    .error
                    .unwrap_or_else(|| "summary generation failed".to_string()),
            }),
        }
    }
}

pub(crate) fn decode_error(message: impl Into<String>) -> ApiError {
    ApiError::new(FailureKind::Decode, message)
}
