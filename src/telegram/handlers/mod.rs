//! Update handlers
//!
//! Each webhook request carries one update. It is classified into a [`BotEvent`] and
//! dispatched here; every handler makes at most one Telegram call.

pub mod commands;
pub mod payments;
pub mod types;

pub use types::HandlerDeps;

use crate::core::AppResult;
use crate::telegram::bot::Command;
use crate::telegram::update::BotEvent;

pub async fn dispatch(deps: &HandlerDeps, event: BotEvent) -> AppResult<()> {
    match event {
        BotEvent::Command { chat_id, command } => {
            tracing::info!(chat_id = chat_id.0, ?command, "Handling command");
            match command {
                Command::Start => commands::handle_start(deps, chat_id).await,
                Command::Sample => commands::handle_sample(deps, chat_id).await,
                Command::Buy => commands::handle_buy(deps, chat_id).await,
            }
        }
        BotEvent::PreCheckout(query) => payments::handle_pre_checkout(deps, query).await,
        BotEvent::SuccessfulPayment { chat_id } => payments::handle_successful_payment(deps, chat_id).await,
        BotEvent::Ignored => {
            tracing::debug!("Ignoring update");
            Ok(())
        }
    }
}
