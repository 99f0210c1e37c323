//! Configuration module for the `mercato` command.
//!
//! Handles loading configuration from the TOML file and the secret override
//! supplied on the command line or through the environment.

pub mod file;

use crate::config::file::FileConfig;
use mercato_sdk::{Environment, ReqwestClient, Transport};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("consumer secret missing: set api.consumer_secret or MERCATO_CONSUMER_SECRET")]
    MissingSecret,

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to build transport: {0}")]
    Transport(#[from] mercato_sdk::Error),
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub environment: Environment,
    pub base_url: Option<Url>,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
}

impl LoadedConfig {
    /// Build the authenticated transport described by this configuration.
    pub fn into_transport(self) -> Result<Transport, ConfigError> {
        let mut http = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        let mut builder = Transport::builder(self.consumer_key, self.consumer_secret)
            .environment(self.environment)
            .http_client(ReqwestClient::with_http_client(http.build()?));
        if let Some(base_url) = self.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(builder.build()?)
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    secret_override: Option<String>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, secret_override: Option<String>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            secret_override,
        }
    }

    /// Read the TOML file, apply the secret override and validate.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let file_config: FileConfig = toml::from_str(&config_content)?;
        self.resolve(file_config)
    }

    fn resolve(&self, file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
        let api = file_config.api;

        let consumer_secret = self
            .secret_override
            .clone()
            .or(api.consumer_secret)
            .ok_or(ConfigError::MissingSecret)?;

        if api.consumer_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api.consumer_key is empty".to_string(),
            ));
        }
        if consumer_secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if let Some(base_url) = &api.base_url {
            if !matches!(base_url.scheme(), "http" | "https") {
                return Err(ConfigError::ValidationError(format!(
                    "api.base_url has unsupported scheme {}",
                    base_url.scheme()
                )));
            }
        }
        if api.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "api.timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(LoadedConfig {
            environment: api.environment,
            base_url: api.base_url,
            consumer_key: api.consumer_key,
            consumer_secret,
            user_agent: api.user_agent,
            timeout: api.timeout_secs.map(Duration::from_secs),
        })
    }
}
