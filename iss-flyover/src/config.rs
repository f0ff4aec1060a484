use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// IP echo service, must answer `{"ip": "..."}`
    #[serde(default = "default_ip_lookup")]
    pub ip_lookup: String,

    /// Geolocation base URL, the IP is appended as a path segment
    #[serde(default = "default_geolocation")]
    pub geolocation: String,

    /// Flyover prediction URL, `lat`/`lon` are appended as query parameters
    #[serde(default = "default_flyover")]
    pub flyover: String,
}

fn default_ip_lookup() -> String {
    "https://api.ipify.org?format=json".to_string()
}

fn default_geolocation() -> String {
    "https://ipwho.is".to_string()
}

fn default_flyover() -> String {
    "https://iss-flyover.herokuapp.com/json/".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            ip_lookup: default_ip_lookup(),
            geolocation: default_geolocation(),
            flyover: default_flyover(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlyoverConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Exit non-zero when the pipeline fails
    #[serde(default)]
    pub exit_code_on_failure: bool,

    /// Overall per-request timeout; unset keeps the HTTP client default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub endpoints: EndpointConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for FlyoverConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            exit_code_on_failure: false,
            request_timeout_secs: None,
            endpoints: EndpointConfig::default(),
        }
    }
}

impl FlyoverConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: FlyoverConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
