use std::{fs, path::Path, time::Duration};

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// The API version requested in the `Accept` header.
pub const API_VERSION: &str = "5.6";

#[derive(Debug, Clone, Builder)]
pub struct Config {
    /// Log label.
    #[builder(into, default = String::from("edgegw"))]
    pub(crate) label: String,

    /// Session token sent as `x-vcloud-authorization`.
    #[builder(into)]
    pub(crate) token: String,

    #[builder(into, default = String::from(API_VERSION))]
    pub(crate) api_version: String,

    /// Per request timeout.
    #[builder(default = Duration::from_secs(30))]
    pub(crate) timeout: Duration,

    #[builder(default)]
    pub(crate) https_only: bool,

    /// Print every configuration document we submit to stdout.
    #[builder(default)]
    pub(crate) dump_xml: bool,

    /// Delay between attempts while the gateway is busy.
    #[builder(default = Duration::from_secs(3))]
    pub(crate) retry_delay: Duration,

    /// Max. number of attempts while the gateway is busy.
    #[builder(default = 60)]
    pub(crate) max_attempts: u32,

    /// Delay between successive task status requests.
    #[builder(default = Duration::from_secs(3))]
    pub(crate) task_poll_interval: Duration,
}

impl Config {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn dump_xml(&self) -> bool {
        self.dump_xml
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_delay, self.max_attempts)
    }

    pub fn task_poll_interval(&self) -> Duration {
        self.task_poll_interval
    }
}

/// File representation of a [`Config`].
///
/// ```toml
/// label = "prod"
/// api_version = "5.6"
/// dump_xml = false
/// timeout_secs = 30
///
/// [retry]
/// delay_secs = 3
/// max_attempts = 60
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub label: Option<String>,
    pub token: Option<String>,
    pub api_version: Option<String>,
    #[serde(default)]
    pub https_only: bool,
    #[serde(default)]
    pub dump_xml: bool,
    pub timeout_secs: Option<u64>,
    pub task_poll_secs: Option<u64>,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    pub delay_secs: Option<u64>,
    pub max_attempts: Option<u32>,
}

impl ClientConfig {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Self::read_string(&s)
    }

    pub fn read_string(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Turn this into a [`Config`].
    ///
    /// A `token` given here takes precedence over the one in the file.
    pub fn into_config(self, token: Option<String>) -> Result<Config, ConfigError> {
        let Some(token) = token.or(self.token) else {
            return Err(ConfigError::MissingToken);
        };
        let c = Config::builder()
            .token(token)
            .maybe_label(self.label)
            .maybe_api_version(self.api_version)
            .https_only(self.https_only)
            .dump_xml(self.dump_xml)
            .maybe_timeout(self.timeout_secs.map(Duration::from_secs))
            .maybe_task_poll_interval(self.task_poll_secs.map(Duration::from_secs))
            .maybe_retry_delay(self.retry.delay_secs.map(Duration::from_secs))
            .maybe_max_attempts(self.retry.max_attempts)
            .build();
        Ok(c)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("no session token configured")]
    MissingToken,
}
