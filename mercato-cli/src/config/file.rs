//! TOML file configuration structures.
//!
//! These structs directly map to the `mercato.toml` file format.

use mercato_sdk::Environment;
use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub api: ApiConfig,
}

/// API connection section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Hosted deployment to talk to. Ignored when `base_url` is set.
    #[serde(default)]
    pub environment: Environment,
    /// Custom API root.
    pub base_url: Option<Url>,
    pub consumer_key: String,
    /// May be left out when supplied through `MERCATO_CONSUMER_SECRET`.
    pub consumer_secret: Option<String>,
    pub user_agent: Option<String>,
    /// Request timeout applied to the underlying HTTP client.
    pub timeout_secs: Option<u64>,
}
