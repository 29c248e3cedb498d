//! Exporter configuration from environment variables

use std::time::Duration;

pub const DEFAULT_ALERTMANAGER_URL: &str = "http://localhost:9093/api/v1/alerts";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(15);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Exporter configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ExporterConfig {
    pub alertmanager_url: String,
    pub host: String,
    pub port: u16,
    pub update_interval: Duration,
    pub fetch_timeout: Duration,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            alertmanager_url: DEFAULT_ALERTMANAGER_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl ExporterConfig {
    /// Load configuration from the process environment
    /// ALERTMANAGER_URL=http://localhost:9093/api/v1/alerts
    /// EXPORTER_HOST=0.0.0.0
    /// EXPORTER_PORT=8080
    /// UPDATE_INTERVAL=15
    /// FETCH_TIMEOUT=10
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Empty values count as unset;
    /// unparsable numbers fall back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let alertmanager_url =
            get("ALERTMANAGER_URL").unwrap_or_else(|| DEFAULT_ALERTMANAGER_URL.to_string());
        let host = get("EXPORTER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get("EXPORTER_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid EXPORTER_PORT {:?}, using default {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let update_interval = match get("UPDATE_INTERVAL") {
            Some(raw) => parse_seconds(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    "Invalid update interval {:?}, using default {:?}",
                    raw,
                    DEFAULT_UPDATE_INTERVAL
                );
                DEFAULT_UPDATE_INTERVAL
            }),
            None => DEFAULT_UPDATE_INTERVAL,
        };

        let fetch_timeout = match get("FETCH_TIMEOUT") {
            Some(raw) => parse_seconds(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    "Invalid fetch timeout {:?}, using default {:?}",
                    raw,
                    DEFAULT_FETCH_TIMEOUT
                );
                DEFAULT_FETCH_TIMEOUT
            }),
            None => DEFAULT_FETCH_TIMEOUT,
        };

        Self {
            alertmanager_url,
            host,
            port,
            update_interval,
            fetch_timeout,
        }
    }

    /// Parse the upstream URL. Failure here is fatal at startup.
    pub fn validate(&self) -> Result<reqwest::Url, ConfigError> {
        let url = reqwest::Url::parse(&self.alertmanager_url).map_err(|e| {
            ConfigError::InvalidUrl {
                url: self.alertmanager_url.clone(),
                reason: e.to_string(),
            }
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Shortest interval or timeout accepted from the environment
const MIN_DURATION: Duration = Duration::from_millis(1);

/// A bare number of seconds, read the way Go's `time.ParseDuration` reads the
/// value with an `s` appended: `15`, `2.5`, `1m30` (90s), `1h0m5` all work.
/// Negative values and anything under `MIN_DURATION` are rejected.
fn parse_seconds(raw: &str) -> Option<Duration> {
    let duration = parse_duration(&format!("{}s", raw.trim()))?;
    (duration >= MIN_DURATION).then_some(duration)
}

/// Sequence of `<decimal><unit>` terms, units `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`
fn parse_duration(input: &str) -> Option<Duration> {
    let mut rest = input.strip_prefix('+').unwrap_or(input);
    if rest.is_empty() || rest.starts_with('-') {
        return None;
    }

    let mut nanos = 0.0_f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if !number.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }
        let value: f64 = number.parse().ok()?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let scale = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return None,
        };

        nanos += value * scale;
        rest = next;
    }

    nanos.is_finite().then(|| Duration::from_nanos(nanos as u64))
}

/// Fatal startup configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid Alertmanager URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported Alertmanager URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}
