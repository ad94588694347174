//! Runtime configuration
//!
//! Everything is read once at startup: `paybridge.toml` (optional) first, then
//! environment variables on top. The resulting [`Config`] is immutable and shared
//! with every request handler behind an `Arc`.
//!
//! Empty values count as unset, so `RAZORPAY_SECRET=` behaves exactly like a missing
//! variable. Absent optional settings are not a startup error; the route or handler
//! that needs them reports `ConfigMissing` instead.

use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use url::Url;

/// Optional configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "paybridge.toml";

/// Public base URL the providers call back into
pub const DEFAULT_PUBLIC_URL: &str = "https://paymentq.vercel.app";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Environment variables read verbatim as text (tokens, secrets, links, addresses)
const TEXT_ENV_KEYS: &[&str] = &[
    "BOT_TOKEN",
    "BOT_USERNAME",
    "SAMPLE_FILE_URL",
    "RAZORPAY_PAYMENT_LINK",
    "FULL_FILE_LINK",
    "RAZORPAY_SECRET",
    "PUBLIC_URL",
    "BIND_ADDRESS",
    "TELEGRAM_API_URL",
    "RAZORPAY_API_URL",
];

/// Environment variables parsed as numbers
const NUMERIC_ENV_KEYS: &[&str] = &[
    "PORT",
    "HTTP_TIMEOUT_SECS",
    "HTTP_CONNECT_TIMEOUT_SECS",
    "REQUEST_TIMEOUT_SECS",
    "RETRY_MAX_TIMES",
    "RETRY_MIN_DELAY_MS",
    "RETRY_MAX_DELAY_MS",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Source(#[from] Box<figment::Error>),

    #[error("invalid URL in {key}: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid bind address: {0}")]
    InvalidBindAddress(String),
}

/// Timeouts for outbound HTTP calls (Telegram, Razorpay, sample file host)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

/// Bounds for retrying transient outbound failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    /// Retries after the first attempt; 0 disables retrying
    pub max_times: usize,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

/// Fully resolved configuration.
#[derive(Debug)]
pub struct Config {
    pub bot_token: Option<SecretString>,
    /// Bot username without the leading `@`, used to filter `/cmd@OtherBot`
    pub bot_username: Option<String>,
    pub sample_file_url: Option<Url>,
    pub payment_link: Option<String>,
    pub full_file_link: Option<String>,
    pub razorpay_secret: Option<SecretString>,
    pub public_url: Url,
    pub bind_address: SocketAddr,
    pub telegram_api_url: Url,
    pub razorpay_api_url: Url,
    pub http: HttpSettings,
    /// Upper bound for handling one inbound request
    pub request_timeout: Duration,
    pub retry: RetrySettings,
}

impl Config {
    /// Loads `paybridge.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Provider stack used by [`Config::load`]; the environment wins over the file.
    ///
    /// `Env` types its values, which would turn a secret like `0123456` into the
    /// number `123456`. Text keys therefore bypass it and are merged as plain strings.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::raw().only(NUMERIC_ENV_KEYS))
            .merge(Serialized::defaults(text_env()))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let raw: RawConfig = figment.extract().map_err(Box::new)?;
        raw.resolve()
    }

    /// URL Telegram should POST updates to
    pub fn telegram_webhook_url(&self) -> Result<Url, url::ParseError> {
        self.public_url.join("webhook")
    }

    /// URL Razorpay should POST payment events to
    pub fn razorpay_webhook_url(&self) -> Result<Url, url::ParseError> {
        self.public_url.join("webhook/razorpay")
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    bot_token: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    bot_username: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    sample_file_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    razorpay_payment_link: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    full_file_link: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    razorpay_secret: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    public_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    bind_address: Option<String>,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default, deserialize_with = "lenient_string")]
    telegram_api_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    razorpay_api_url: Option<String>,
    #[serde(default = "default_http_timeout_secs")]
    http_timeout_secs: u64,
    #[serde(default = "default_http_connect_timeout_secs")]
    http_connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
    #[serde(default = "default_retry_max_times")]
    retry_max_times: usize,
    #[serde(default = "default_retry_min_delay_ms")]
    retry_min_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    retry_max_delay_ms: u64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_http_timeout_secs() -> u64 {
    15
}

fn default_http_connect_timeout_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_retry_max_times() -> usize {
    3
}

fn default_retry_min_delay_ms() -> u64 {
    200
}

fn default_retry_max_delay_ms() -> u64 {
    2_000
}

/// Text keys present in the environment, lowercased to match the config fields.
/// Values that are not valid UTF-8 are skipped.
fn text_env() -> BTreeMap<String, String> {
    TEXT_ENV_KEYS
        .iter()
        .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_lowercase(), value)))
        .collect()
}

impl RawConfig {
    fn resolve(self) -> Result<Config, ConfigError> {
        let bind_ip: IpAddr = self
            .bind_address
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDRESS)
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.bind_address.clone().unwrap_or_default()))?;

        let min_delay = Duration::from_millis(self.retry_min_delay_ms);

        Ok(Config {
            bot_token: self.bot_token.map(SecretString::from),
            bot_username: self
                .bot_username
                .map(|name| name.trim_start_matches('@').to_owned())
                .filter(|name| !name.is_empty()),
            sample_file_url: self
                .sample_file_url
                .as_deref()
                .map(|raw| parse_url("SAMPLE_FILE_URL", raw))
                .transpose()?,
            payment_link: self.razorpay_payment_link,
            full_file_link: self.full_file_link,
            razorpay_secret: self.razorpay_secret.map(SecretString::from),
            public_url: parse_base_url("PUBLIC_URL", self.public_url.as_deref().unwrap_or(DEFAULT_PUBLIC_URL))?,
            bind_address: SocketAddr::new(bind_ip, self.port),
            telegram_api_url: parse_url(
                "TELEGRAM_API_URL",
                self.telegram_api_url.as_deref().unwrap_or(DEFAULT_TELEGRAM_API_URL),
            )?,
            razorpay_api_url: parse_url(
                "RAZORPAY_API_URL",
                self.razorpay_api_url.as_deref().unwrap_or(DEFAULT_RAZORPAY_API_URL),
            )?,
            http: HttpSettings {
                timeout: Duration::from_secs(self.http_timeout_secs),
                connect_timeout: Duration::from_secs(self.http_connect_timeout_secs),
            },
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            retry: RetrySettings {
                max_times: self.retry_max_times,
                min_delay,
                max_delay: Duration::from_millis(self.retry_max_delay_ms).max(min_delay),
            },
        })
    }
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { key, source })
}

/// Like [`parse_url`], but guarantees a trailing slash so `join` appends instead of
/// replacing the last path segment.
fn parse_base_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    if raw.ends_with('/') {
        parse_url(key, raw)
    } else {
        parse_url(key, &format!("{raw}/"))
    }
}

/// Accepts any scalar as a string and maps blank values to `None`.
///
/// A bare number in `paybridge.toml` arrives as an integer; this turns it back into
/// text. Non-blank values are kept exactly, surrounding whitespace included.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Flag(bool),
    }

    let value = Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Signed(n) => n.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Flag(b) => b.to_string(),
    });

    Ok(value.filter(|s| !s.trim().is_empty()))
}
