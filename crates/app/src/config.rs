//! Client configuration
//!
//! Read from `worduel.toml` in the platform config directory, or from the
//! file named by `WORDUEL_CONFIG`. A missing file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use worduel_net::{SolutionEncoding, DEFAULT_ENDPOINT};

pub const CONFIG_FILE: &str = "worduel.toml";
pub const CONFIG_ENV: &str = "WORDUEL_CONFIG";
pub const ENDPOINT_ENV: &str = "WORDUEL_ENDPOINT";

const MIN_POLL_INTERVAL_MS: u64 = 250;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error("Could not determine {0} directory")]
    NoProjectDir(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// GraphQL endpoint of the duel service
    pub endpoint: String,
    /// How often the open duel or game is re-fetched
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    pub solution_encoding: SolutionEncoding,
    /// Where the identity database lives; platform data dir when unset
    pub data_dir: Option<PathBuf>,
    /// Used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            poll_interval_ms: 2500,
            request_timeout_ms: 10_000,
            solution_encoding: SolutionEncoding::Plain,
            data_dir: None,
            log_filter: "worduel=info".to_string(),
        }
    }
}

impl Config {
    /// Locate, read and validate the configuration
    pub fn load() -> Result<Self, ConfigError> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => project_dirs()?.config_dir().join(CONFIG_FILE),
        };

        let mut config = if path.exists() {
            Self::from_path(&path)?
        } else {
            Self::default()
        };

        config.override_endpoint(std::env::var(ENDPOINT_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn override_endpoint(&mut self, endpoint: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "endpoint '{}' must be an http(s) URL",
                self.endpoint
            )));
        }
        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(ConfigError::Invalid(format!(
                "poll_interval_ms must be at least {}",
                MIN_POLL_INTERVAL_MS
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("request_timeout_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("dev", "worduel", "worduel").ok_or(ConfigError::NoProjectDir("home"))
}
