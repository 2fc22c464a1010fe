use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobMode {
    /// Similarity search only; the result limit is required.
    #[default]
    PureSimilarity,
    /// Similarity search followed by server-side summaries; no limit is sent.
    SimilarityPlusSummarize,
}

impl JobMode {
    pub fn from_use_llm(use_llm: bool) -> Self {
        if use_llm {
            JobMode::SimilarityPlusSummarize
        } else {
            JobMode::PureSimilarity
        }
    }

    pub fn uses_llm(self) -> bool {
        matches!(self, JobMode::SimilarityPlusSummarize)
    }

    pub fn requires_limit(self) -> bool {
        matches!(self, JobMode::PureSimilarity)
    }

    pub fn label(self) -> &'static str {
        match self {
            JobMode::PureSimilarity => "Pure Similarity Mode",
            JobMode::SimilarityPlusSummarize => "Similarity + Summarize Mode",
        }
    }
}

/// A validated analysis request. Only [`JobRequestBuilder`] produces these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub query: String,
    pub mode: JobMode,
    pub result_limit: Option<u32>,
}

pub struct JobRequestBuilder;

impl JobRequestBuilder {
    /// Validates raw form input. The query is checked first so an empty query
    /// always reports `EmptyQuery`, whatever the mode.
    pub fn build(raw_query: &str, mode: JobMode, raw_limit: &str) -> Result<Job, ValidationError> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }

        let result_limit = if mode.requires_limit() {
            Some(parse_limit(raw_limit)?)
        } else {
            None
        };

        Ok(Job {
            query: query.to_string(),
            mode,
            result_limit,
        })
    }
}

fn parse_limit(raw: &str) -> Result<u32, ValidationError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidLimit)?;
    if value <= 0 {
        return Err(ValidationError::InvalidLimit);
    }
    u32::try_from(value).map_err(|_| ValidationError::InvalidLimit)
}
