//! Telegram bot integration and handlers

pub mod bot;
pub mod handlers;
pub mod messages;
pub mod sample;
pub mod update;
pub mod webhook;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{dispatch, HandlerDeps};
pub use update::BotEvent;
pub use webhook::register_webhook;
