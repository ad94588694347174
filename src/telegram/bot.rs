//! Bot instance creation and the command set
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Publishing the command list to Telegram

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use url::Url;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "show the welcome message")]
    Start,
    #[command(description = "get a sample file")]
    Sample,
    #[command(description = "get the payment link for the full file")]
    Buy,
}

/// Creates a Bot instance that talks to `api_url` through the shared `http` client.
pub fn create_bot(token: &SecretString, api_url: Url, http: Client) -> Bot {
    tracing::debug!("Using Bot API URL: {}", api_url);
    Bot::with_client(token.expose_secret(), http).set_api_url(api_url)
}

/// Sets up bot commands in Telegram UI
///
/// # Returns
/// * `Ok(())` - Commands set successfully
/// * `Err(RequestError)` - Failed to set commands
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}
