//! Logging initialization and startup diagnostics
//!
//! Output goes to stderr through `tracing-subscriber`. The filter comes from `RUST_LOG`
//! and falls back to `info` for this crate. Records emitted by dependencies through the
//! `log` facade (teloxide, reqwest internals) are bridged in by the subscriber.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;

const DEFAULT_FILTER: &str = "paybridge=info,tower_http=info,warn";

/// Installs the global subscriber. Fails if one is already set.
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs which settings are present. Secret values are never printed.
pub fn log_startup_configuration(config: &Config) {
    tracing::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    tracing::info!("Configuration");
    tracing::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    tracing::info!("Listening on: {}", config.bind_address);
    tracing::info!("Public URL: {}", config.public_url);
    tracing::info!("Telegram API: {}", config.telegram_api_url);
    tracing::info!("Razorpay API: {}", config.razorpay_api_url);

    report("BOT_TOKEN", config.bot_token.is_some());
    report("RAZORPAY_SECRET", config.razorpay_secret.is_some());
    report("SAMPLE_FILE_URL", config.sample_file_url.is_some());
    report("RAZORPAY_PAYMENT_LINK", config.payment_link.is_some());
    report("FULL_FILE_LINK", config.full_file_link.is_some());

    match &config.bot_username {
        Some(name) => tracing::info!("Bot username: @{}", name),
        None => tracing::info!("Bot username: not set, addressed commands accepted for any bot"),
    }
}

fn report(key: &str, present: bool) {
    if present {
        tracing::info!("{}: set", key);
    } else {
        tracing::warn!("{}: not set, dependent features will answer with an error", key);
    }
}
