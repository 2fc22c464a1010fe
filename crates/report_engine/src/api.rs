use std::time::Duration;

use report_core::{Job, ProgressSnapshot, SummaryRequest};
use report_logging::report_debug;
use serde::de::DeserializeOwned;
use url::Url;

use crate::wire::{
    decode_error, ProgressReply, StartAnalysisBody, StartAnalysisReply, SummaryBody, SummaryReply,
};
use crate::{ApiError, FailureKind, StartAck, SummaryOutcome};

const START_ANALYSIS_PATH: &str = "start_analysis";
const PROGRESS_PATH: &str = "get_progress";
const SUMMARY_PATH: &str = "generate_summary";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub poll_interval: Duration,
    pub connect_timeout: Duration,
    /// Whole-request timeout. `None` lets a slow server keep a request open.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            poll_interval: Duration::from_millis(500),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// The three calls the client makes against the analysis server.
#[async_trait::async_trait]
pub trait ReportApi: Send + Sync {
    async fn start_analysis(&self, job: &Job) -> Result<StartAck, ApiError>;

    async fn poll_progress(&self) -> Result<ProgressSnapshot, ApiError>;

    async fn generate_summary(&self, request: &SummaryRequest) -> Result<SummaryOutcome, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestReportApi {
    client: reqwest::Client,
    start_url: Url,
    progress_url: Url,
    summary_url: Url,
}

impl ReqwestReportApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let base = parse_base_url(&settings.base_url)?;
        let endpoint = |path: &str| {
            base.join(path)
                .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
        };

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            start_url: endpoint(START_ANALYSIS_PATH)?,
            progress_url: endpoint(PROGRESS_PATH)?,
            summary_url: endpoint(SUMMARY_PATH)?,
        })
    }
}

#[async_trait::async_trait]
impl ReportApi for ReqwestReportApi {
    async fn start_analysis(&self, job: &Job) -> Result<StartAck, ApiError> {
        let response = self
            .client
            .post(self.start_url.clone())
            .json(&StartAnalysisBody::from(job))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let reply: StartAnalysisReply = read_json(response).await?;
        Ok(reply.into())
    }

    async fn poll_progress(&self) -> Result<ProgressSnapshot, ApiError> {
        let response = self
            .client
            .get(self.progress_url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let reply: ProgressReply = read_json(response).await?;
        reply.into_snapshot()
    }

    async fn generate_summary(&self, request: &SummaryRequest) -> Result<SummaryOutcome, ApiError> {
        let response = self
            .client
            .post(self.summary_url.clone())
            .json(&SummaryBody::from(request))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let reply: SummaryReply = read_json(response).await?;
        reply.into_outcome()
    }
}

/// Endpoint paths are joined onto the base, so the base must end in `/`.
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut base =
        Url::parse(raw.trim()).map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(ApiError::new(
            FailureKind::InvalidUrl,
            format!("{raw} cannot be used as a base url"),
        ));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let url = response.url().clone();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    report_debug!("{} bytes from {}", body.len(), url);
    serde_json::from_slice(&body).map_err(|err| decode_error(err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return decode_error(err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::parse_base_url;
    use crate::FailureKind;

    #[test]
    fn base_url_gains_trailing_slash() {
        let base = parse_base_url("http://host:5000/app").unwrap();
        assert_eq!(base.as_str(), "http://host:5000/app/");
        assert_eq!(
            base.join("get_progress").unwrap().as_str(),
            "http://host:5000/app/get_progress"
        );
    }

    #[test]
    fn garbage_base_url_is_rejected() {
        assert_eq!(
            parse_base_url("not a url").unwrap_err().kind,
            FailureKind::InvalidUrl
        );
        assert_eq!(
            parse_base_url("mailto:someone@example.com").unwrap_err().kind,
            FailureKind::InvalidUrl
        );
    }
}
