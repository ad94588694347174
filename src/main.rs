use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;

use paybridge::cli::{Cli, Commands};
use paybridge::core::logging::{init_logging, log_startup_configuration};
use paybridge::core::Config;
use paybridge::telegram::setup_bot_commands;
use paybridge::web::{self, setup, AppState};

/// Main entry point
///
/// Parses CLI arguments and dispatches to the selected subcommand.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    init_logging()?;

    let config = Config::load()?;
    log_startup_configuration(&config);

    let state = Arc::new(AppState::new(config)?);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(state).await,
        Commands::RegisterWebhooks => register_webhooks(&state).await,
    }
}

async fn run_server(state: Arc<AppState>) -> Result<()> {
    if let Some(bot) = &state.bot {
        match setup_bot_commands(bot).await {
            Ok(()) => tracing::info!("Bot commands published"),
            Err(e) => tracing::warn!("Failed to publish bot commands: {}", e),
        }
    }

    web::serve(state).await
}

/// Runs both registrations even if the first one fails, then reports.
async fn register_webhooks(state: &AppState) -> Result<()> {
    let telegram = setup::register_telegram(state).await;
    if let Err(e) = &telegram {
        tracing::error!("Telegram webhook setup failed: {}", e);
    }

    let razorpay = setup::register_razorpay(state).await;
    match &razorpay {
        Ok(id) => tracing::info!(webhook_id = %id, "Razorpay webhook setup ok"),
        Err(e) => tracing::error!("Razorpay webhook setup failed: {}", e),
    }

    match (telegram, razorpay) {
        (Ok(()), Ok(_)) => {
            tracing::info!("All webhooks registered");
            Ok(())
        }
        _ => anyhow::bail!("webhook registration failed"),
    }
}
