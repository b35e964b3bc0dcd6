//! HTTP client for the remote prayer times API.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Url;

use prayerbridge_app::ports::PrayerTimesSource;
use prayerbridge_domain::error::{ConfigError, FetchError};
use prayerbridge_domain::timetable::RawTimetable;

use crate::config::LptConfig;

const REDACTED: &str = "***";

/// Prayer times source backed by a single bounded HTTP request.
#[derive(Debug, Clone)]
pub struct LptClient {
    http: reqwest::Client,
    config: LptConfig,
    timeout: Duration,
}

impl LptClient {
    /// Build a client from configuration.
    ///
    /// Missing credentials are not an error here; every fetch reports them.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: LptConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| FetchError::Transport(Box::new(err)))?;
        Ok(Self {
            http,
            timeout: config.timeout(),
            config,
        })
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full request URL for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Config`] when the key or URL is missing (the key
    /// is checked first) and [`FetchError::Transport`] when the URL does not
    /// parse.
    pub fn request_url(&self, date: NaiveDate) -> Result<Url, FetchError> {
        let (base, key) = self.endpoint()?;
        self.build_url(base, key, date)
    }

    fn endpoint(&self) -> Result<(&str, &str), FetchError> {
        let key = required(self.config.api_key.as_deref(), "LPT_API_KEY")?;
        let base = required(self.config.api_url.as_deref(), "LPT_API_URL")?;
        Ok((base, key))
    }

    fn build_url(&self, base: &str, key: &str, date: NaiveDate) -> Result<Url, FetchError> {
        let date = date.format("%Y-%m-%d").to_string();
        Url::parse_with_params(
            base,
            &[
                ("format", "json"),
                ("key", key),
                ("city", self.config.city.as_str()),
                ("24hours", "true"),
                ("date", date.as_str()),
            ],
        )
        .map_err(|err| FetchError::Transport(Box::new(err)))
    }

    async fn request(&self, url: Url) -> Result<RawTimetable, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(Box::new(err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(Box::new(err)))?;
        serde_json::from_slice(&body).map_err(|err| FetchError::MalformedBody(Box::new(err)))
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, FetchError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingSetting { name }.into()),
    }
}

impl PrayerTimesSource for LptClient {
    async fn fetch(&self, date: NaiveDate) -> Result<RawTimetable, FetchError> {
        let (base, key) = self.endpoint()?;
        let url = self.build_url(base, key, date)?;
        let redacted = self.build_url(base, REDACTED, date)?;
        tracing::info!(url = %redacted, "fetching prayer times");

        match tokio::time::timeout(self.timeout, self.request(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                after: self.timeout,
            }),
        }
    }
}
