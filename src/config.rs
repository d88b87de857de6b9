//! Configuration loaded from `timetable.toml` and the environment.

use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use fundu::{DurationParser, TimeUnit};
use serde::{Deserialize, Deserializer};

use crate::sedna::DEFAULT_BASE_URL;

/// Optional file merged before the environment.
pub const CONFIG_FILE: &str = "timetable.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base level for the `timetable` target (`trace`..`error`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding `mselect.jsp` and `mplanif.jsp`.
    #[serde(default = "default_sedna_base_url")]
    pub sedna_base_url: String,
    /// Minimum spacing between portal requests; `0` disables it.
    #[serde(
        default = "default_request_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub request_interval: Duration,
    #[serde(
        default = "default_request_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub request_timeout: Duration,
    /// `jours` used when a schedule request does not name one.
    #[serde(default = "default_day_window")]
    pub default_day_window: u32,
    #[serde(
        default = "default_shutdown_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub shutdown_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            port: default_port(),
            sedna_base_url: default_sedna_base_url(),
            request_interval: default_request_interval(),
            request_timeout: default_request_timeout(),
            default_day_window: default_day_window(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

impl Config {
    /// `timetable.toml` if present, then environment variables on top.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::raw())
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_sedna_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_day_window() -> u32 {
    7
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(8)
}

/// Bare integers are seconds; strings may carry a unit (`500ms`, `1s`, `2m`).
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DurationValue {
        Seconds(u64),
        Text(String),
    }

    match DurationValue::deserialize(deserializer)? {
        DurationValue::Seconds(seconds) => Ok(Duration::from_secs(seconds)),
        DurationValue::Text(text) => parse_duration(&text).map_err(D::Error::custom),
    }
}

pub fn parse_duration(text: &str) -> Result<Duration, String> {
    let parser = DurationParser::with_time_units(&[
        TimeUnit::MilliSecond,
        TimeUnit::Second,
        TimeUnit::Minute,
    ]);
    let parsed = parser
        .parse(text.trim())
        .map_err(|e| format!("invalid duration '{text}': {e}"))?;
    parsed
        .try_into()
        .map_err(|e| format!("duration '{text}' out of range: {e}"))
}
