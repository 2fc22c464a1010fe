//! Optional RON configuration file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use report_engine::ClientSettings;
use report_logging::{parse_level, report_info, report_warn};
use serde::Deserialize;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILENAME: &str = "report_client.ron";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub page_size: usize,
    pub log_level: String,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            poll_interval_ms: client.poll_interval.as_millis() as u64,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.map(|timeout| timeout.as_secs()),
            page_size: report_core::DEFAULT_PAGE_SIZE,
            log_level: "info".to_string(),
            log_destination: LogDestination::File,
        }
    }
}

impl AppConfig {
    /// Loads `explicit`, or `report_client.ron` from the working directory.
    ///
    /// A missing default file yields defaults; a missing explicit file or a
    /// file that does not parse is an error.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        report_info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn level_filter(&self) -> LevelFilter {
        parse_level(&self.log_level).unwrap_or_else(|| {
            report_warn!("Unknown log level {:?}; using info", self.log_level);
            LevelFilter::Info
        })
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}
