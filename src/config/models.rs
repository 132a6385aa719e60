use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::{PeriodRange, UrlTemplate};
use crate::transport::HttpConfig;

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://d37ci6vzurychx.cloudfront.net/trip-data/yellow_tripdata_{year}-{month}.parquet";
pub const DEFAULT_START_YEAR: u16 = 2009;
pub const DEFAULT_END_YEAR: u16 = 2021;
pub const DEFAULT_WORKERS: usize = 100;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to download
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_url_template")]
    pub url_template: String,
    #[serde(default = "default_start_year")]
    pub start_year: u16,
    #[serde(default = "default_end_year")]
    pub end_year: u16,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
            start_year: default_start_year(),
            end_year: default_end_year(),
        }
    }
}

impl SourceConfig {
    pub fn range(&self) -> PeriodRange {
        PeriodRange::new(self.start_year, self.end_year)
    }

    pub fn template(&self) -> UrlTemplate {
        UrlTemplate::new(self.url_template.clone())
    }

    /// Every URL to fetch, in production order
    pub fn urls(&self) -> impl Iterator<Item = String> + Send + use<> {
        self.template().urls(self.range())
    }
}

/// Worker pool sizing
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Slots per handoff before a push suspends
    #[serde(default = "default_handoff_capacity")]
    pub handoff_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            handoff_capacity: default_handoff_capacity(),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Zero disables the whole-request timeout
    #[serde(default)]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: 0,
            user_agent: default_user_agent(),
        }
    }
}

impl HttpSettings {
    pub fn to_http_config(&self) -> HttpConfig {
        HttpConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: (self.request_timeout_secs > 0)
                .then(|| Duration::from_secs(self.request_timeout_secs)),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Where downloaded files land
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_url_template() -> String {
    DEFAULT_URL_TEMPLATE.to_string()
}

fn default_start_year() -> u16 {
    DEFAULT_START_YEAR
}

fn default_end_year() -> u16 {
    DEFAULT_END_YEAR
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_handoff_capacity() -> usize {
    1
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    HttpConfig::default().user_agent
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
