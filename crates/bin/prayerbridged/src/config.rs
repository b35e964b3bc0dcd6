//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `prayerbridge.toml` in the working directory, or at the path in
//! `PRAYERBRIDGE_CONFIG`. Every field has a default so the file is optional.
//! Environment variables take precedence over file values; numeric
//! variables that fail to parse are ignored.

use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;

use prayerbridge_adapter_lpt::LptConfig;
use prayerbridge_app::daily_trigger::DailyTrigger;
use prayerbridge_app::schedule_engine::ScheduleSettings;
use prayerbridge_domain::bridge::BridgeInfo;
use prayerbridge_domain::offset::OffsetConfig;
use prayerbridge_domain::prayer::PrayerKey;

const DEFAULT_PATH: &str = "prayerbridge.toml";

/// Offsets beyond a full day in either direction are rejected.
const MAX_OFFSET_MINUTES: i64 = 24 * 60;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timezone, daily refresh and pulse timing.
    pub schedule: ScheduleConfig,
    /// Per-prayer offsets in minutes.
    pub offsets: OffsetConfig,
    /// Remote prayer times source.
    pub source: LptConfig,
    /// Published bridge identity.
    pub bridge: BridgeConfig,
    /// HTTP API listener.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Scheduling configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// IANA timezone name used for "today" and for trigger instants.
    pub timezone: String,
    /// Cron expression for the daily refresh.
    pub daily_fetch_cron: String,
    /// How long a switch stays on per pulse.
    pub pulse_seconds: u64,
    /// Delay between failed planning attempts.
    pub retry_minutes: u64,
}

/// Bridge identity fields.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub username: String,
    pub pin: String,
    pub port: u16,
    pub manufacturer: String,
    pub serial_number: String,
    pub model: String,
    pub firmware: String,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Serve the status/control API.
    pub enabled: bool,
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the file (if present), apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if a setting is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("PRAYERBRIDGE_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.into());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(val) = env("TIMEZONE") {
            self.schedule.timezone = val;
        }
        if let Some(val) = env("CRON_SPEC_FETCH") {
            self.schedule.daily_fetch_cron = val;
        }
        override_parsed(&env, "SWITCH_PULSE_SECONDS", &mut self.schedule.pulse_seconds);
        override_parsed(&env, "RETRY_FETCH_MINUTES", &mut self.schedule.retry_minutes);

        for prayer in PrayerKey::ALL {
            let name = format!("{}_OFFSET_MINUTES", prayer.as_str().to_uppercase());
            if let Some(minutes) = env(&name).and_then(|val| val.trim().parse().ok()) {
                self.offsets.set(prayer, minutes);
            }
        }

        if let Some(val) = env("LPT_API_URL") {
            self.source.api_url = Some(val);
        }
        if let Some(val) = env("LPT_API_KEY") {
            self.source.api_key = Some(val);
        }
        if let Some(val) = env("LPT_CITY") {
            self.source.city = val;
        }

        if let Some(val) = env("HAP_USERNAME") {
            self.bridge.username = val;
        }
        if let Some(val) = env("HAP_PIN") {
            self.bridge.pin = val;
        }
        override_parsed(&env, "HAP_PORT", &mut self.bridge.port);
        if let Some(val) = env("BRIDGE_MANUFACTURER") {
            self.bridge.manufacturer = val;
        }
        if let Some(val) = env("BRIDGE_SERIAL_NUMBER") {
            self.bridge.serial_number = val;
        }
        if let Some(val) = env("BRIDGE_MODEL") {
            self.bridge.model = val;
        }
        if let Some(val) = env("BRIDGE_FIRMWARE") {
            self.bridge.firmware = val;
        }

        if let Some(val) = env("PRAYERBRIDGE_HOST") {
            self.server.host = val;
        }
        override_parsed(&env, "PRAYERBRIDGE_PORT", &mut self.server.port);
        if let Some(val) = env("PRAYERBRIDGE_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }

        if let Some(val) = env("PRAYERBRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = env("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.timezone()?;
        self.daily_trigger()?;
        if self.schedule.pulse_seconds == 0 {
            return Err(ConfigError::Validation(
                "pulse_seconds must be non-zero".to_string(),
            ));
        }
        if self.schedule.retry_minutes == 0 {
            return Err(ConfigError::Validation(
                "retry_minutes must be non-zero".to_string(),
            ));
        }
        for prayer in PrayerKey::ALL {
            let minutes = self.offsets.get(prayer);
            if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&minutes) {
                return Err(ConfigError::Validation(format!(
                    "{prayer} offset of {minutes} minutes exceeds {MAX_OFFSET_MINUTES}"
                )));
            }
        }
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Configured timezone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an unknown IANA name.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        Tz::from_str(self.schedule.timezone.trim()).map_err(|_| {
            ConfigError::Validation(format!("unknown timezone `{}`", self.schedule.timezone))
        })
    }

    /// Daily refresh trigger in the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an unknown timezone or a
    /// malformed cron expression.
    pub fn daily_trigger(&self) -> Result<DailyTrigger, ConfigError> {
        let expression = &self.schedule.daily_fetch_cron;
        DailyTrigger::parse(expression, self.timezone()?).map_err(|err| {
            ConfigError::Validation(format!("invalid cron expression `{expression}`: {err}"))
        })
    }

    /// Settings for the schedule engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an unknown timezone.
    pub fn schedule_settings(&self) -> Result<ScheduleSettings, ConfigError> {
        Ok(ScheduleSettings {
            timezone: self.timezone()?,
            offsets: self.offsets,
            pulse_duration: Duration::from_secs(self.schedule.pulse_seconds),
        })
    }

    #[must_use]
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.retry_minutes.saturating_mul(60))
    }

    /// Bridge identity with configured overrides applied.
    #[must_use]
    pub fn bridge_info(&self) -> BridgeInfo {
        BridgeInfo {
            username: self.bridge.username.clone(),
            pin: self.bridge.pin.clone(),
            port: self.bridge.port,
            manufacturer: self.bridge.manufacturer.clone(),
            serial_number: self.bridge.serial_number.clone(),
            model: self.bridge.model.clone(),
            firmware: self.bridge.firmware.clone(),
            ..BridgeInfo::default()
        }
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn override_parsed<T: FromStr>(env: impl Fn(&str) -> Option<String>, name: &str, target: &mut T) {
    if let Some(value) = env(name).and_then(|val| val.trim().parse().ok()) {
        *target = value;
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: "Europe/London".to_string(),
            daily_fetch_cron: "1 0 * * *".to_string(),
            pulse_seconds: 30,
            retry_minutes: 10,
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        let info = BridgeInfo::default();
        Self {
            username: info.username,
            pin: info.pin,
            port: info.port,
            manufacturer: info.manufacturer,
            serial_number: info.serial_number,
            model: info.model,
            firmware: info.firmware,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "prayerbridged=info,prayerbridge=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.schedule.timezone, "Europe/London");
        assert_eq!(config.schedule.daily_fetch_cron, "1 0 * * *");
        assert_eq!(config.schedule.pulse_seconds, 30);
        assert_eq!(config.retry_interval(), Duration::from_secs(600));
        assert_eq!(config.offsets.fajr, 45);
        assert_eq!(config.source.city, "london");
        assert_eq!(config.source.api_key, None);
        assert_eq!(config.bridge.pin, "012-34-567");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert!(config.server.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.schedule.pulse_seconds, 30);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [schedule]
            timezone = 'Asia/Karachi'
            daily_fetch_cron = '5 1 * * *'
            pulse_seconds = 10
            retry_minutes = 2

            [offsets]
            fajr = 30
            isha = -5

            [source]
            api_url = 'https://example.com/times'
            api_key = 'secret'
            city = 'leeds'
            timeout_secs = 4

            [bridge]
            pin = '111-22-333'
            port = 51900

            [server]
            enabled = false
            host = '127.0.0.1'
            port = 9090

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.timezone().unwrap(), chrono_tz::Asia::Karachi);
        assert_eq!(config.schedule.daily_fetch_cron, "5 1 * * *");
        assert_eq!(config.schedule.pulse_seconds, 10);
        assert_eq!(config.retry_interval(), Duration::from_secs(120));
        assert_eq!(config.offsets.fajr, 30);
        assert_eq!(config.offsets.dhuhr, 0);
        assert_eq!(config.offsets.isha, -5);
        assert_eq!(config.source.api_url.as_deref(), Some("https://example.com/times"));
        assert_eq!(config.source.timeout_secs, 4);
        assert_eq!(config.bridge.pin, "111-22-333");
        assert_eq!(config.bridge.port, 51900);
        assert_eq!(config.bridge.model, "HomeKit-Prayer-Bridge");
        assert!(!config.server.enabled);
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(env_of(&[
            ("TIMEZONE", "Europe/Paris"),
            ("CRON_SPEC_FETCH", "0 2 * * *"),
            ("SWITCH_PULSE_SECONDS", "5"),
            ("RETRY_FETCH_MINUTES", "1"),
            ("FAJR_OFFSET_MINUTES", "20"),
            ("MAGHRIB_OFFSET_MINUTES", "-10"),
            ("LPT_API_URL", "https://example.com"),
            ("LPT_API_KEY", "k"),
            ("LPT_CITY", "birmingham"),
            ("HAP_PIN", "999-88-777"),
            ("HAP_PORT", "51999"),
            ("BRIDGE_SERIAL_NUMBER", "PB-0042"),
            ("PRAYERBRIDGE_BIND", "127.0.0.1:9000"),
            ("PRAYERBRIDGE_LOG", "trace"),
        ]));

        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::Paris);
        assert_eq!(config.schedule.daily_fetch_cron, "0 2 * * *");
        assert_eq!(config.schedule.pulse_seconds, 5);
        assert_eq!(config.schedule.retry_minutes, 1);
        assert_eq!(config.offsets.fajr, 20);
        assert_eq!(config.offsets.maghrib, -10);
        assert_eq!(config.source.api_key.as_deref(), Some("k"));
        assert_eq!(config.source.city, "birmingham");
        let info = config.bridge_info();
        assert_eq!(info.pin, "999-88-777");
        assert_eq!(info.port, 51999);
        assert_eq!(info.serial_number, "PB-0042");
        assert_eq!(info.name, "Prayer Bridge");
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_prefer_rust_log_over_own_filter_variable() {
        let mut config = Config::default();
        config.apply_env_overrides(env_of(&[
            ("PRAYERBRIDGE_LOG", "debug"),
            ("RUST_LOG", "warn"),
        ]));
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_ignore_unparsable_numeric_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(env_of(&[
            ("SWITCH_PULSE_SECONDS", "soon"),
            ("ISHA_OFFSET_MINUTES", "ten"),
            ("PRAYERBRIDGE_PORT", "-1"),
        ]));
        assert_eq!(config.schedule.pulse_seconds, 30);
        assert_eq!(config.offsets.isha, 0);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn should_reject_unknown_timezone() {
        let mut config = Config::default();
        config.schedule.timezone = "Mars/Olympus".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_malformed_cron() {
        let mut config = Config::default();
        config.schedule.daily_fetch_cron = "every day".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_durations_and_port() {
        let mut config = Config::default();
        config.schedule.pulse_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.schedule.retry_minutes = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_offsets_beyond_a_day() {
        let mut config = Config::default();
        config.apply_env_overrides(env_of(&[("FAJR_OFFSET_MINUTES", "4611686018427387903")]));
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = Config::default();
        config.apply_env_overrides(env_of(&[("ISHA_OFFSET_MINUTES", "-1441")]));
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.apply_env_overrides(env_of(&[("ASR_OFFSET_MINUTES", "-9223372036854775808")]));
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.apply_env_overrides(env_of(&[("ISHA_OFFSET_MINUTES", "-1440")]));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_saturate_huge_retry_interval() {
        let mut config = Config::default();
        config.apply_env_overrides(env_of(&[(
            "RETRY_FETCH_MINUTES",
            "18446744073709551615",
        )]));
        assert!(config.validate().is_ok());
        assert_eq!(config.retry_interval(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn should_accept_missing_api_credentials() {
        let config = Config::default();
        assert!(config.source.api_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_build_schedule_settings() {
        let mut config = Config::default();
        config.schedule.pulse_seconds = 12;
        let settings = config.schedule_settings().unwrap();
        assert_eq!(settings.timezone, chrono_tz::Europe::London);
        assert_eq!(settings.offsets.fajr, 45);
        assert_eq!(settings.pulse_duration, Duration::from_secs(12));
    }
}
