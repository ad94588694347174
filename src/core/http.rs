use reqwest::Client;
use url::Url;

use crate::core::config::HttpSettings;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Builds the shared outbound client. Every call to a provider goes through it, so
/// none of them can hang past the configured timeouts.
pub fn build_client(settings: &HttpSettings) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(settings.timeout)
        .connect_timeout(settings.connect_timeout)
        .build()
}

/// Appends `path` to `base`.
///
/// Plain string concatenation, because `Url::join` would read `bot123:ABC/...` as a
/// URL with scheme `bot123`.
pub fn api_endpoint(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}
