//! Remote prayer times source configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the HTTP prayer times source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LptConfig {
    /// Endpoint base URL. Required for fetching but not for startup.
    pub api_url: Option<String>,
    /// API credential sent as the `key` query parameter.
    pub api_key: Option<String>,
    /// City passed to the provider.
    pub city: String,
    /// Upper bound for one request, headers and body included, in seconds.
    pub timeout_secs: u64,
}

impl LptConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LptConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            city: "london".to_string(),
            timeout_secs: 10,
        }
    }
}
