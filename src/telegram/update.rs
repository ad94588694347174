//! Classifies incoming Telegram updates into the events this bot reacts to.

use teloxide::types::{ChatId, Message, PreCheckoutQuery, Update, UpdateKind};
use teloxide::utils::command::BotCommands;

use crate::telegram::bot::Command;

#[derive(Debug, Clone)]
pub enum BotEvent {
    Command { chat_id: ChatId, command: Command },
    PreCheckout(PreCheckoutQuery),
    SuccessfulPayment { chat_id: ChatId },
    /// Plain text, unknown commands, edits, and every other update kind
    Ignored,
}

impl BotEvent {
    /// `bot_username` (without `@`) filters out commands addressed to other bots.
    pub fn from_update(update: Update, bot_username: Option<&str>) -> Self {
        match update.kind {
            UpdateKind::Message(msg) => Self::from_message(&msg, bot_username),
            UpdateKind::PreCheckoutQuery(query) => BotEvent::PreCheckout(query),
            _ => BotEvent::Ignored,
        }
    }

    fn from_message(msg: &Message, bot_username: Option<&str>) -> Self {
        if msg.successful_payment().is_some() {
            return BotEvent::SuccessfulPayment { chat_id: msg.chat.id };
        }

        match msg.text().and_then(|text| parse_command(text, bot_username)) {
            Some(command) => BotEvent::Command {
                chat_id: msg.chat.id,
                command,
            },
            None => BotEvent::Ignored,
        }
    }
}

/// Parses `/name`, `/name@bot` and `/name args...`. Command names are matched
/// case-insensitively; arguments are ignored.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Option<Command> {
    let token = text.split_whitespace().next()?;
    if !token.starts_with('/') {
        return None;
    }

    let (name, mention) = match token.split_once('@') {
        Some((name, mention)) => (name, Some(mention)),
        None => (token, None),
    };

    if let (Some(mention), Some(username)) = (mention, bot_username) {
        if !mention.eq_ignore_ascii_case(username) {
            return None;
        }
    }

    Command::parse(&name.to_lowercase(), "").ok()
}
